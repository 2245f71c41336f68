//! Contact record extracted from an event description.

use serde::{Deserialize, Serialize};

/// Contact forwarded to the webhook. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: String,
    phone: String,
}

impl Contact {
    /// Build a contact; returns `None` when either field is blank.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_string();
        let phone = phone.into().trim().to_string();
        if name.is_empty() || phone.is_empty() {
            return None;
        }
        Some(Self { name, phone })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Raw result of the field extractor. Fields are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl ExtractedFields {
    /// Returns a contact only when both fields are present and non-empty.
    pub fn into_contact(self) -> Option<Contact> {
        match (self.name, self.phone) {
            (Some(name), Some(phone)) => Contact::new(name, phone),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.name) && filled(&self.phone)
    }
}
