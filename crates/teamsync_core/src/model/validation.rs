//! Required-field checks and label normalization.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Draft validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    MissingField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Normalizes skills/tags into an ordered set.
///
/// Entries are trimmed, blanks dropped, and later duplicates removed so the
/// first occurrence keeps its position.
pub fn normalize_label_set<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut labels: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() || labels.iter().any(|existing| existing == trimmed) {
            continue;
        }
        labels.push(trimmed.to_string());
    }
    labels
}
