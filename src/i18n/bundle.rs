// SPDX-License-Identifier: MPL-2.0
//! Translation bundles: one JSON document per language.

use super::language::Language;
use crate::error::{Error, Result};
use futures_util::future::{self, BoxFuture, FutureExt};
use rust_embed::RustEmbed;
use serde_json::Value;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Something that can produce the translation bundle of a language.
///
/// Loading is asynchronous so a shell may fetch bundles over the network.
pub trait BundleSource: Send + Sync + 'static {
    fn load(&self, language: Language) -> BoxFuture<'static, Result<Value>>;
}

/// Bundles compiled into the binary from `assets/i18n/<code>.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundles;

impl EmbeddedBundles {
    pub fn load_now(language: Language) -> Result<Value> {
        let filename = format!("{}.json", language.code());
        let file = Asset::get(&filename)
            .ok_or_else(|| Error::Translation(format!("no bundle named {filename}")))?;
        parse_bundle(&file.data)
    }
}

impl BundleSource for EmbeddedBundles {
    fn load(&self, language: Language) -> BoxFuture<'static, Result<Value>> {
        future::ready(Self::load_now(language)).boxed()
    }
}

/// Parses a bundle, which must be a JSON object at the top level.
pub fn parse_bundle(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(Error::Translation(
            "bundle root must be an object".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_an_embedded_bundle() {
        for language in Language::ALL {
            let bundle = EmbeddedBundles::load_now(language).expect("bundle should parse");
            assert!(bundle.get("contact").is_some(), "{language} lacks contact");
        }
    }

    #[test]
    fn bundles_share_top_level_sections() {
        let en = EmbeddedBundles::load_now(Language::En).unwrap();
        let ar = EmbeddedBundles::load_now(Language::Ar).unwrap();
        let en_keys: Vec<_> = en.as_object().unwrap().keys().collect();
        let ar_keys: Vec<_> = ar.as_object().unwrap().keys().collect();
        assert_eq!(en_keys, ar_keys);
    }

    #[test]
    fn parse_bundle_rejects_non_object_roots() {
        assert!(matches!(parse_bundle(b"[1, 2]"), Err(Error::Translation(_))));
        assert!(matches!(parse_bundle(b"{ broken"), Err(Error::Translation(_))));
        assert!(parse_bundle(br#"{"nav": {"home": "Home"}}"#).is_ok());
    }

    #[tokio::test]
    async fn embedded_source_loads_asynchronously() {
        let bundle = EmbeddedBundles.load(Language::Ar).await.unwrap();
        assert!(bundle.is_object());
    }
}
