// SPDX-License-Identifier: MPL-2.0
//! Where `settings.toml` and the durable key-value store (`state.cbor`) live.
//!
//! Both directories resolve in the same order:
//! 1. explicit override passed by the caller (tests, embedders)
//! 2. `--config-dir` / `--data-dir` given on the command line
//! 3. `FOLIO_CONFIG_DIR` / `FOLIO_DATA_DIR` (ignored when empty)
//! 4. the platform directory from `dirs`, with [`APP_NAME`] appended

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name used under the platform config/data roots.
pub const APP_NAME: &str = "Folio";

pub const ENV_DATA_DIR: &str = "FOLIO_DATA_DIR";
pub const ENV_CONFIG_DIR: &str = "FOLIO_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the directories passed on the command line.
///
/// Call once at startup, before anything resolves a path. Later calls are
/// ignored.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    let data_set = CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_ok();
    let config_set = CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_ok();
    if !(data_set && config_set) {
        tracing::warn!("path overrides already initialized; ignoring new values");
    }
}

/// Directory holding the durable key-value store.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        override_path,
        &CLI_DATA_DIR,
        ENV_DATA_DIR,
        dirs::data_dir(),
    )
}

/// Directory holding `settings.toml`.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        override_path,
        &CLI_CONFIG_DIR,
        ENV_CONFIG_DIR,
        dirs::config_dir(),
    )
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform_root: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform_root.map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn platform_default_appends_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_DATA_DIR);

        if let Some(path) = get_app_data_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn override_path_takes_precedence() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/env/config");

        let override_path = PathBuf::from("/override/config");
        let result = get_app_config_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn env_var_overrides_platform_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/test/data/dir");

        assert_eq!(get_app_data_dir(), Some(PathBuf::from("/test/data/dir")));

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn resolve_falls_through_to_platform_root() {
        let cli = OnceLock::new();
        let result = resolve(
            None,
            &cli,
            "FOLIO_TEST_UNSET_VARIABLE",
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(result, Some(PathBuf::from("/platform").join(APP_NAME)));
    }

    #[test]
    fn resolve_prefers_cli_over_env() {
        let cli = OnceLock::new();
        cli.set(Some(PathBuf::from("/from/cli"))).unwrap();
        let result = resolve(None, &cli, "PATH", Some(PathBuf::from("/platform")));
        assert_eq!(result, Some(PathBuf::from("/from/cli")));
    }
}
