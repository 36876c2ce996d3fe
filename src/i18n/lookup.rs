// SPDX-License-Identifier: MPL-2.0
//! Dot-path lookup into a translation bundle with `{name}` substitution.
//!
//! A missing key is never an error: the key itself is returned so the page
//! still renders something readable.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Named substitution parameters for [`translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Walks `translations` along the dot-separated `key`.
///
/// Objects are entered by member name and arrays by decimal index, so
/// `"experience.items.0.title"` reaches into a list of entries.
pub fn lookup<'a>(translations: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(translations, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Resolves `key`, substituting `params` into string values.
///
/// - missing path: the key, as a string
/// - string: placeholders replaced; unknown or empty ones stay verbatim
/// - anything else (lists, nested sections): returned untouched
pub fn translate(translations: &Value, key: &str, params: Option<&Params>) -> Value {
    match lookup(translations, key) {
        None => {
            tracing::debug!(key, "missing translation");
            Value::String(key.to_string())
        }
        Some(Value::String(text)) => Value::String(match params {
            Some(params) => interpolate(text, params),
            None => text.clone(),
        }),
        Some(other) => other.clone(),
    }
}

/// Replaces every `{name}` in `text` that has a matching, non-empty parameter.
pub fn interpolate(text: &str, params: &Params) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// String form of [`translate`]; the key when the value is not a string.
pub fn tr(translations: &Value, key: &str, params: Option<&Params>) -> String {
    match translate(translations, key, params) {
        Value::String(text) => text,
        _ => key.to_string(),
    }
}

/// The string items of a list value; empty when `key` is not a list.
pub fn tr_list(translations: &Value, key: &str) -> Vec<String> {
    match lookup(translations, key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle() -> Value {
        json!({
            "a": { "x": "leaf" },
            "x": { "y": "Hi {name}" },
            "contact": {
                "errorMessage": "Failed to send message.",
                "serviceOptions": ["Mobile App", "Web App"],
                "greeting": "{greeting}, {name}! You have {count} new {unit_2}"
            },
            "experience": {
                "items": [ { "title": "Flutter Developer" } ]
            }
        })
    }

    #[test]
    fn missing_segment_returns_key_verbatim() {
        assert_eq!(translate(&bundle(), "a.b.c", None), json!("a.b.c"));
        assert_eq!(translate(&bundle(), "nope", None), json!("nope"));
    }

    #[test]
    fn descending_into_a_string_is_a_miss() {
        assert_eq!(translate(&bundle(), "a.x.deeper", None), json!("a.x.deeper"));
    }

    #[test]
    fn nested_string_resolves() {
        assert_eq!(
            tr(&bundle(), "contact.errorMessage", None),
            "Failed to send message."
        );
    }

    #[test]
    fn parameters_are_substituted() {
        let params = Params::new().with("name", "Sam");
        assert_eq!(translate(&bundle(), "x.y", Some(&params)), json!("Hi Sam"));
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let params = Params::new().with("other", "value");
        assert_eq!(translate(&bundle(), "x.y", Some(&params)), json!("Hi {name}"));
        assert_eq!(translate(&bundle(), "x.y", None), json!("Hi {name}"));
    }

    #[test]
    fn empty_values_leave_placeholder_in_place() {
        let params = Params::new().with("name", "");
        assert_eq!(tr(&bundle(), "x.y", Some(&params)), "Hi {name}");
    }

    #[test]
    fn numbers_use_their_display_form() {
        let params: Params = [("greeting", "Hello"), ("name", "Sam")]
            .into_iter()
            .collect::<Params>()
            .with("count", 3);
        assert_eq!(
            tr(&bundle(), "contact.greeting", Some(&params)),
            "Hello, Sam! You have 3 new {unit_2}"
        );
    }

    #[test]
    fn non_string_values_are_returned_untouched() {
        let params = Params::new().with("name", "Sam");
        assert_eq!(
            translate(&bundle(), "contact.serviceOptions", Some(&params)),
            json!(["Mobile App", "Web App"])
        );
        assert_eq!(tr(&bundle(), "contact.serviceOptions", None), "contact.serviceOptions");
    }

    #[test]
    fn array_segments_index_into_lists() {
        assert_eq!(
            tr(&bundle(), "experience.items.0.title", None),
            "Flutter Developer"
        );
        assert_eq!(
            tr(&bundle(), "experience.items.7.title", None),
            "experience.items.7.title"
        );
    }

    #[test]
    fn tr_list_guards_against_non_lists() {
        assert_eq!(
            tr_list(&bundle(), "contact.serviceOptions"),
            vec!["Mobile App".to_string(), "Web App".to_string()]
        );
        assert!(tr_list(&bundle(), "contact.errorMessage").is_empty());
        assert!(tr_list(&json!({}), "contact.serviceOptions").is_empty());
    }

    #[test]
    fn braces_without_identifier_are_left_alone() {
        let params = Params::new().with("name", "Sam");
        assert_eq!(interpolate("{} {name} { name }", &params), "{} Sam { name }");
    }
}
