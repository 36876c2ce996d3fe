// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! The site ships in English and Arabic. Translations are nested JSON bundles
//! addressed with dot paths (`"contact.errorMessage"`), and Arabic switches
//! the document to right-to-left.
//!
//! # Features
//!
//! - Language restored from the durable store at startup (English by default)
//! - Bundles embedded in the binary, loaded asynchronously on demand
//! - Runtime switching with an English fallback when a bundle fails
//! - Missing keys degrade to the key string

pub mod bundle;
pub mod context;
pub mod language;
pub mod lookup;

pub use bundle::{BundleSource, EmbeddedBundles};
pub use context::{LanguageContext, LanguageState, LoadPhase};
pub use language::{Direction, DocumentAttributes, Language};
pub use lookup::Params;
