// SPDX-License-Identifier: MPL-2.0
use folio::app::{App, Flags, ResumeFormat};
use folio::contact::{service_slug, ContactForm};
use folio::download::{trigger_download, DownloadOptions, DownloadStatus, HttpFrameHost};
use folio::i18n::Params;
use folio::theming::ThemeMode;
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
folio - portfolio site core

USAGE:
  folio [--lang CODE] [--config-dir DIR] [--data-dir DIR] <COMMAND>

COMMANDS:
  translate <key> [name=value ...]   Print a translation
  language [<code>]                  Show or switch the language (en, ar)
  theme [light|dark|system|toggle]   Show or change the theme
  download [<url>] [--format pdf|docx] [--timeout-ms N] [--no-fallback] [--out DIR]
                                     Download the resume (or any URL)
  contact --name N --email E --service S --message M
                                     Send a message through the contact form
";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let flags = match parse_flags(&mut args) {
        Ok(flags) => flags,
        Err(err) => return usage_error(err),
    };
    let command = match args.subcommand() {
        Ok(Some(command)) => command,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::FAILURE;
        }
        Err(err) => return usage_error(err),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let app = App::new(flags).await;
        if let Some(warning) = app.config_warning() {
            eprintln!("{warning}");
        }

        match command.as_str() {
            "translate" => translate(&app, args),
            "language" => language(&app, args).await,
            "theme" => theme(&app, args),
            "download" => download(&app, args).await,
            "contact" => contact(&app, args).await,
            other => usage_error(format!("unknown command: {other}")),
        }
    })
}

fn parse_flags(args: &mut pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    Ok(Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
    })
}

fn usage_error(err: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {err}\n\n{HELP}");
    ExitCode::FAILURE
}

/// Remaining positional arguments as UTF-8 strings.
fn free_args(args: pico_args::Arguments) -> Result<Vec<String>, String> {
    args.finish()
        .into_iter()
        .map(|arg: OsString| {
            arg.into_string()
                .map_err(|arg| format!("argument is not valid UTF-8: {arg:?}"))
        })
        .collect()
}

fn translate(app: &App, args: pico_args::Arguments) -> ExitCode {
    let mut rest = match free_args(args) {
        Ok(rest) => rest.into_iter(),
        Err(err) => return usage_error(err),
    };
    let Some(key) = rest.next() else {
        return usage_error("translate needs a key");
    };

    let mut params = Params::new();
    for pair in rest {
        match pair.split_once('=') {
            Some((name, value)) => params.insert(name, value),
            None => return usage_error(format!("expected name=value, got {pair}")),
        }
    }

    let params = (!params.is_empty()).then_some(&params);
    match app.i18n.t(&key, params) {
        serde_json::Value::String(text) => println!("{text}"),
        other => println!("{other:#}"),
    }
    ExitCode::SUCCESS
}

async fn language(app: &App, args: pico_args::Arguments) -> ExitCode {
    let rest = match free_args(args) {
        Ok(rest) => rest,
        Err(err) => return usage_error(err),
    };

    if let Some(code) = rest.first() {
        if let Err(err) = app.i18n.set_language_code(code).await {
            eprintln!("language switch aborted: {err}");
            return ExitCode::FAILURE;
        }
    }

    let document = app.i18n.document();
    let params = Params::new()
        .with("language", document.lang().native_name())
        .with("dir", document.dir());
    println!("{}", app.i18n.tr_with("language.current", &params));
    println!("lang={} dir={}", document.lang(), document.dir());
    ExitCode::SUCCESS
}

fn theme(app: &App, args: pico_args::Arguments) -> ExitCode {
    let rest = match free_args(args) {
        Ok(rest) => rest,
        Err(err) => return usage_error(err),
    };

    match rest.first().map(String::as_str) {
        None => {}
        Some("toggle") => {
            app.theme.toggle();
        }
        Some(mode) => match mode.parse::<ThemeMode>() {
            Ok(mode) => app.theme.set_mode(mode),
            Err(err) => return usage_error(err),
        },
    }

    let mode = app.theme.mode();
    let system_is_dark = ThemeMode::System.is_dark();
    let effective = if mode.is_dark_given(system_is_dark) {
        "theme.dark"
    } else {
        "theme.light"
    };
    println!(
        "{} ({})",
        app.i18n.tr(&format!("theme.{}", mode.as_str())),
        app.i18n.tr(effective)
    );
    println!("{}", app.i18n.tr(mode.toggle_label_key(system_is_dark)));
    ExitCode::SUCCESS
}

async fn download(app: &App, mut args: pico_args::Arguments) -> ExitCode {
    let parsed = (|| -> Result<_, pico_args::Error> {
        Ok((
            args.opt_value_from_str::<_, ResumeFormat>("--format")?,
            args.opt_value_from_str::<_, u64>("--timeout-ms")?,
            args.contains("--no-fallback"),
            args.opt_value_from_str::<_, String>("--out")?,
        ))
    })();
    let (format, timeout_ms, no_fallback, out) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return usage_error(err),
    };
    let rest = match free_args(args) {
        Ok(rest) => rest,
        Err(err) => return usage_error(err),
    };

    let url = match rest.first() {
        Some(url) => url.clone(),
        None => format.unwrap_or(ResumeFormat::Pdf).url(&app.config).to_string(),
    };

    let host = match out {
        Some(dir) => HttpFrameHost::new(dir),
        None => HttpFrameHost::with_default_destination(),
    };
    let host = match host {
        Ok(host) => Arc::new(host),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut download_config = app.config.download.clone();
    if let Some(ms) = timeout_ms {
        download_config.timeout_ms = ms;
    }
    let fallback = download_config.fallback_navigate && !no_fallback;
    let timeout: Duration = download_config.timeout();

    let i18n = app.i18n.clone();
    let options = DownloadOptions::default()
        .timeout(timeout)
        .fallback_navigate(fallback)
        .on_status_change(move |status| {
            let key = match status {
                DownloadStatus::Error if !fallback => "download.errorNoFallback",
                other => other.i18n_key(),
            };
            println!("{}", i18n.tr(key));
        });

    let outcome = trigger_download(host.clone(), &url, options).await;

    for path in host.finish_transfers().await {
        println!("{}", path.display());
    }
    for target in host.navigations() {
        println!(
            "{}",
            app.i18n.tr_with("download.fallback", &Params::new().with("url", target))
        );
    }

    if outcome.status() == DownloadStatus::Done {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn contact(app: &App, mut args: pico_args::Arguments) -> ExitCode {
    let parsed = (|| -> Result<_, pico_args::Error> {
        Ok(ContactForm::new(
            args.value_from_str::<_, String>("--name")?,
            args.value_from_str::<_, String>("--email")?,
            service_slug(&args.value_from_str::<_, String>("--service")?),
            args.value_from_str::<_, String>("--message")?,
        ))
    })();
    let fields = match parsed {
        Ok(fields) => fields,
        Err(err) => return usage_error(err),
    };

    let mut state = match app.contact_form() {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    state.form = fields;

    println!("{}", app.i18n.tr("contact.sending"));
    let texts = app.i18n.snapshot();
    let status = state.submit(&texts).await;
    println!("{}", status.message);
    if let Some(detail) = &status.detail {
        eprintln!("{detail}");
    }

    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
