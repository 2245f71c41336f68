//! Contact field extraction from event descriptions.
//!
//! Descriptions are free text; the booking form writes the contact as
//! labelled lines:
//!
//! ```text
//! Name: Jane Doe
//! Phone: 555-1234
//! ```
//!
//! Labels are the literal, case-sensitive tokens `Name:` and `Phone:` and
//! may appear anywhere in a line. The value is the rest of that line,
//! trimmed. The first occurrence of each label wins. No format validation
//! is applied to either value.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ExtractedFields;

// The capture stops at the line break so an empty label never swallows the
// following line.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Name:([^\r\n]*)").expect("NAME_PATTERN should compile - this is a bug")
});
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Phone:([^\r\n]*)").expect("PHONE_PATTERN should compile - this is a bug")
});

/// Extract the `Name:` and `Phone:` values from an event description.
///
/// Returns both fields as `None` for a missing or empty description. Each
/// field is extracted independently.
pub fn extract_contact_fields(text: Option<&str>) -> ExtractedFields {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return ExtractedFields::default();
    };

    ExtractedFields {
        name: capture_label(&NAME_PATTERN, text),
        phone: capture_label(&PHONE_PATTERN, text),
    }
}

fn capture_label(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}
