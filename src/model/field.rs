use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editor::{EditableText, EditorError};

/// The item shapes a multi-item field can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Emails,
    Phones,
    Links,
    Array,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Emails,
        FieldKind::Phones,
        FieldKind::Links,
        FieldKind::Array,
    ];

    /// Tag used in record files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Emails => "emails",
            FieldKind::Phones => "phones",
            FieldKind::Links => "links",
            FieldKind::Array => "array",
        }
    }

    /// Placeholder shown in an empty input
    pub fn placeholder(self) -> &'static str {
        match self {
            FieldKind::Emails => "Email",
            FieldKind::Phones => "Phone",
            FieldKind::Links => "URL",
            FieldKind::Array => "Value",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EditorError::UnsupportedItemShape(s.to_string()))
    }
}

/// A phone number split into its calling code and local number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    /// Country calling code including the `+` (e.g. `+33`), may be empty
    #[serde(default)]
    pub calling_code: String,
    pub number: String,
}

/// A URL with an optional display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(default)]
    pub label: String,
    pub url: String,
}

/// The typed items of one field. Position 0 is the primary item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Emails(Vec<String>),
    Phones(Vec<PhoneRecord>),
    Links(Vec<LinkRecord>),
    Array(Vec<String>),
}

impl FieldValue {
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Emails => FieldValue::Emails(Vec::new()),
            FieldKind::Phones => FieldValue::Phones(Vec::new()),
            FieldKind::Links => FieldValue::Links(Vec::new()),
            FieldKind::Array => FieldValue::Array(Vec::new()),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Emails(_) => FieldKind::Emails,
            FieldValue::Phones(_) => FieldKind::Phones,
            FieldValue::Links(_) => FieldKind::Links,
            FieldValue::Array(_) => FieldKind::Array,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValue::Emails(items) | FieldValue::Array(items) => items.len(),
            FieldValue::Phones(items) => items.len(),
            FieldValue::Links(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One display line per item, in list order
    pub fn display_items(&self) -> Vec<String> {
        match self {
            FieldValue::Emails(items) | FieldValue::Array(items) => {
                items.iter().map(EditableText::display_text).collect()
            }
            FieldValue::Phones(items) => items.iter().map(EditableText::display_text).collect(),
            FieldValue::Links(items) => items.iter().map(EditableText::display_text).collect(),
        }
    }

    /// The items as a JSON array, for `--json` output
    pub fn items_json(&self) -> serde_json::Value {
        let result = match self {
            FieldValue::Emails(items) | FieldValue::Array(items) => serde_json::to_value(items),
            FieldValue::Phones(items) => serde_json::to_value(items),
            FieldValue::Links(items) => serde_json::to_value(items),
        };
        result.unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_parse() {
        for kind in FieldKind::ALL {
            assert_eq!(kind.as_str().parse::<FieldKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_tag_is_unsupported() {
        let err = "currency".parse::<FieldKind>().unwrap_err();
        assert!(matches!(err, EditorError::UnsupportedItemShape(ref tag) if tag == "currency"));
    }

    #[test]
    fn display_items_per_kind() {
        let phones = FieldValue::Phones(vec![
            PhoneRecord {
                calling_code: "+33".into(),
                number: "612345678".into(),
            },
            PhoneRecord {
                calling_code: String::new(),
                number: "5550100".into(),
            },
        ]);
        assert_eq!(phones.display_items(), vec!["+33 612345678", "5550100"]);

        let links = FieldValue::Links(vec![LinkRecord {
            label: "Site".into(),
            url: "https://acme.test".into(),
        }]);
        assert_eq!(links.display_items(), vec!["Site (https://acme.test)"]);
    }

    #[test]
    fn empty_value_matches_kind() {
        for kind in FieldKind::ALL {
            let value = FieldValue::empty(kind);
            assert_eq!(value.kind(), kind);
            assert!(value.is_empty());
        }
    }

    #[test]
    fn items_json_uses_record_shape() {
        let phones = FieldValue::Phones(vec![PhoneRecord {
            calling_code: "+1".into(),
            number: "5550100".into(),
        }]);
        assert_eq!(
            phones.items_json(),
            serde_json::json!([{ "calling_code": "+1", "number": "5550100" }])
        );
    }
}
