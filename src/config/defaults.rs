// SPDX-License-Identifier: MPL-2.0
//! Default values for every configuration setting.
//!
//! These are the values the site ships with; `settings.toml` and the
//! environment override them.

// ==========================================================================
// Contact (EmailJS)
// ==========================================================================

/// EmailJS REST endpoint used to deliver contact-form submissions.
pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub const DEFAULT_EMAILJS_SERVICE_ID: &str = "service_qco4okh";

pub const DEFAULT_EMAILJS_TEMPLATE_ID: &str = "template_55bmak5";

pub const DEFAULT_EMAILJS_PUBLIC_KEY: &str = "l4jkIrJ8dO0l7IIHQ";

/// Recipient name filled into every email template.
pub const DEFAULT_CONTACT_TO_NAME: &str = "Ahmed Tamer";

// ==========================================================================
// Resume
// ==========================================================================

pub const DEFAULT_RESUME_LINK_PDF: &str =
    "https://docs.google.com/document/d/1VfRZjbZdR1-BnIt4uKoZ8PoVa2bjSaHI/export?format=pdf";

pub const DEFAULT_RESUME_LINK_DOCX: &str =
    "https://docs.google.com/document/d/1VfRZjbZdR1-BnIt4uKoZ8PoVa2bjSaHI/export?format=docx";

// ==========================================================================
// Download trigger
// ==========================================================================

/// How long to wait for the embedded context before assuming the download
/// started. Attachment responses often never report a load.
pub const DEFAULT_DOWNLOAD_TIMEOUT_MS: u64 = 12_000;

/// Minimum accepted download timeout.
pub const MIN_DOWNLOAD_TIMEOUT_MS: u64 = 100;

/// Maximum accepted download timeout.
pub const MAX_DOWNLOAD_TIMEOUT_MS: u64 = 120_000;

// ==========================================================================
// Environment variable names
// ==========================================================================

pub const ENV_EMAILJS_SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
pub const ENV_EMAILJS_TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
pub const ENV_EMAILJS_PUBLIC_KEY: &str = "EMAILJS_PUBLIC_KEY";
pub const ENV_RESUME_LINK_PDF: &str = "RESUME_LINK_PDF";
pub const ENV_RESUME_LINK_DOCX: &str = "RESUME_LINK_DOCX";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_within_bounds() {
        assert!(DEFAULT_DOWNLOAD_TIMEOUT_MS >= MIN_DOWNLOAD_TIMEOUT_MS);
        assert!(DEFAULT_DOWNLOAD_TIMEOUT_MS <= MAX_DOWNLOAD_TIMEOUT_MS);
    }

    #[test]
    fn resume_links_point_to_document_exports() {
        assert!(DEFAULT_RESUME_LINK_PDF.ends_with("format=pdf"));
        assert!(DEFAULT_RESUME_LINK_DOCX.ends_with("format=docx"));
    }
}
