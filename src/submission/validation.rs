use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::NewSubmission;

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_MESSAGE_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Raw contact form fields as posted. Missing fields read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    pub fn from_value(raw: Value) -> Result<Self, String> {
        serde_json::from_value(raw).map_err(|e| format!("Invalid form fields: {e}"))
    }
}

/// Field name -> message, for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// A trimmed form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ValidForm {
    pub fn into_submission(self, timestamp: i64) -> NewSubmission {
        NewSubmission {
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            timestamp,
        }
    }
}

/// Trim every field and check name length, email shape and message length.
/// All failures are collected, not just the first.
pub fn validate(form: &ContactForm) -> Result<ValidForm, FieldErrors> {
    let valid = ValidForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        subject: form.subject.trim().to_string(),
        message: form.message.trim().to_string(),
    };

    let mut errors = FieldErrors::default();

    if valid.name.chars().count() < MIN_NAME_LEN {
        errors.add("name", "Name must be at least 2 characters long");
    }
    if !EMAIL_RE.is_match(&valid.email) {
        errors.add("email", "Please enter a valid email address");
    }
    if valid.message.chars().count() < MIN_MESSAGE_LEN {
        errors.add("message", "Message must be at least 10 characters long");
    }

    if errors.is_empty() {
        Ok(valid)
    } else {
        Err(errors)
    }
}
