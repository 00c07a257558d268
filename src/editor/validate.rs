//! Built-in validators per field kind. Empty input is always valid so that
//! clearing an item's text can still delete it.

use std::sync::LazyLock;

use regex::Regex;

use super::session::Validation;
use crate::model::FieldKind;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{4,17}$").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?([a-z0-9-]+\.)+[a-z]{2,}(:[0-9]{1,5})?(/\S*)?$").unwrap()
});

pub fn email(text: &str) -> Validation {
    if text.is_empty() || EMAIL_RE.is_match(text) {
        Validation::valid()
    } else {
        Validation::invalid(format!("Invalid email address: {}", text))
    }
}

pub fn phone(text: &str) -> Validation {
    let compact: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    if text.is_empty() || PHONE_RE.is_match(&compact) {
        Validation::valid()
    } else {
        Validation::invalid(format!("Invalid phone number: {}", text))
    }
}

pub fn url(text: &str) -> Validation {
    if text.is_empty() || URL_RE.is_match(text) {
        Validation::valid()
    } else {
        Validation::invalid(format!("Invalid URL: {}", text))
    }
}

/// The validator for a kind, if it has one. Array items accept any text.
pub fn for_kind(kind: FieldKind) -> Option<fn(&str) -> Validation> {
    match kind {
        FieldKind::Emails => Some(email),
        FieldKind::Phones => Some(phone),
        FieldKind::Links => Some(url),
        FieldKind::Array => None,
    }
}
