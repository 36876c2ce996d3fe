// SPDX-License-Identifier: MPL-2.0
//! `folio` is the core of a bilingual (English/Arabic) portfolio site.
//!
//! It provides the site-wide language context with right-to-left support,
//! a theme preference, a fire-and-forget file download trigger with a
//! navigation fallback, and contact form delivery through EmailJS.

pub mod app;
pub mod config;
pub mod contact;
pub mod download;
pub mod error;
pub mod i18n;
pub mod theming;
