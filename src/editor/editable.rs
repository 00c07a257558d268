use crate::model::{LinkRecord, PhoneRecord};

/// Projection between an item and the single line of text it is edited as.
///
/// Every item type a field can hold implements this, so there is no
/// runtime lookup of "how do I edit this shape".
pub trait EditableText: Sized {
    /// Text placed in the input when an existing item is edited
    fn to_editable_text(&self) -> String;

    /// Default formatter: build an item from trimmed, non-empty input
    fn from_editable_text(text: &str) -> Self;

    /// One-line form for lists
    fn display_text(&self) -> String {
        self.to_editable_text()
    }
}

impl EditableText for String {
    fn to_editable_text(&self) -> String {
        self.clone()
    }

    fn from_editable_text(text: &str) -> Self {
        text.to_string()
    }
}

impl EditableText for PhoneRecord {
    /// Calling code and number joined with a space, so the text parses back
    /// into the same record
    fn to_editable_text(&self) -> String {
        if self.calling_code.is_empty() {
            self.number.clone()
        } else {
            format!("{} {}", self.calling_code, self.number)
        }
    }

    fn from_editable_text(text: &str) -> Self {
        parse_phone(text, "")
    }
}

impl EditableText for LinkRecord {
    fn to_editable_text(&self) -> String {
        self.url.clone()
    }

    fn from_editable_text(text: &str) -> Self {
        LinkRecord {
            label: String::new(),
            url: text.to_string(),
        }
    }

    fn display_text(&self) -> String {
        if self.label.is_empty() {
            self.url.clone()
        } else {
            format!("{} ({})", self.label, self.url)
        }
    }
}

/// Phone formatter that applies `default_calling_code` to numbers typed
/// without a `+` prefix
pub fn phone_formatter(default_calling_code: String) -> impl Fn(&str) -> PhoneRecord {
    move |text| parse_phone(text, &default_calling_code)
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '(' | ')')
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| !is_separator(*c)).collect()
}

/// `+CC rest` splits at the first separator after the calling code.
/// Without a `+`, the whole input is the local number.
fn parse_phone(text: &str, default_calling_code: &str) -> PhoneRecord {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('+') {
        if let Some(split) = rest.find(is_separator) {
            return PhoneRecord {
                calling_code: format!("+{}", &rest[..split]),
                number: digits_only(&rest[split..]),
            };
        }
        return PhoneRecord {
            calling_code: String::new(),
            number: format!("+{}", digits_only(rest)),
        };
    }
    PhoneRecord {
        calling_code: default_calling_code.to_string(),
        number: digits_only(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(cc: &str, number: &str) -> PhoneRecord {
        PhoneRecord {
            calling_code: cc.into(),
            number: number.into(),
        }
    }

    #[test]
    fn string_projection_is_identity() {
        let s = "ceo@acme.test".to_string();
        assert_eq!(s.to_editable_text(), s);
        assert_eq!(String::from_editable_text("x y"), "x y");
    }

    #[test]
    fn phone_projection_parses_back() {
        let original = phone("+33", "612345678");
        let text = original.to_editable_text();
        assert_eq!(text, "+33 612345678");
        assert_eq!(PhoneRecord::from_editable_text(&text), original);
    }

    #[test]
    fn phone_separators_are_dropped_from_number() {
        assert_eq!(
            PhoneRecord::from_editable_text("+1 (555) 010-0199"),
            phone("+1", "5550100199")
        );
    }

    #[test]
    fn phone_without_separator_keeps_plus_in_number() {
        assert_eq!(
            PhoneRecord::from_editable_text("+33612345678"),
            phone("", "+33612345678")
        );
    }

    #[test]
    fn phone_formatter_applies_default_calling_code() {
        let format = phone_formatter("+44".into());
        assert_eq!(format("020 7946 0018"), phone("+44", "02079460018"));
        assert_eq!(format("+33 6 12"), phone("+33", "612"));
    }

    #[test]
    fn link_projection_edits_url_only() {
        let link = LinkRecord {
            label: "Site".into(),
            url: "https://acme.test".into(),
        };
        assert_eq!(link.to_editable_text(), "https://acme.test");
        let rebuilt = LinkRecord::from_editable_text("https://acme.test");
        assert_eq!(rebuilt.url, link.url);
        assert!(rebuilt.label.is_empty());
    }
}
