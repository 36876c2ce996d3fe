// SPDX-License-Identifier: MPL-2.0
//! Contact form fields and the parameters handed to the email template.

use serde::{Deserialize, Serialize};

/// The four fields of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Every field is required and the email must at least contain an `@`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let filled = |field: &str| !field.trim().is_empty();
        filled(&self.name)
            && filled(&self.email)
            && filled(&self.service)
            && filled(&self.message)
            && self.email.contains('@')
    }

    /// Builds the template parameters, addressing the message to `to_name`.
    pub fn template_params(&self, to_name: &str) -> TemplateParams {
        TemplateParams {
            from_name: self.name.clone(),
            from_email: self.email.clone(),
            service_type: self.service.clone(),
            message: self.message.clone(),
            to_name: to_name.to_string(),
        }
    }
}

/// Value submitted for a service option label: lowercase with every run of
/// whitespace replaced by a single `-` ("Web Development" -> "web-development").
pub fn service_slug(option: &str) -> String {
    let mut slug = String::with_capacity(option.len());
    let mut in_whitespace = false;
    for c in option.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    slug
}

/// Variables the email template is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub service_type: String,
    pub message: String,
    pub to_name: String,
}
