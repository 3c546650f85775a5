//! Community post form and its validation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FieldErrors, ValidationError};

/// Minimum title length, in characters, after trimming.
pub const TITLE_MIN_CHARS: usize = 5;

/// Minimum content length, in characters, after trimming.
pub const CONTENT_MIN_CHARS: usize = 10;

/// Raw values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPostForm {
    pub title: String,
    pub content: String,
}

/// A post form that passed validation, with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCommunityPost {
    pub title: String,
    pub content: String,
}

impl CommunityPostForm {
    pub fn validate(&self) -> Result<ValidCommunityPost, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = errors.check(min_chars("title", &self.title, TITLE_MIN_CHARS));
        let content = errors.check(min_chars("content", &self.content, CONTENT_MIN_CHARS));

        match (title, content) {
            (Some(title), Some(content)) => Ok(ValidCommunityPost { title, content }),
            _ => Err(errors),
        }
    }
}

fn min_chars(field: &str, raw: &str, min: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len < min {
        return Err(ValidationError::too_short(field, min, len));
    }
    Ok(trimmed.to_string())
}
