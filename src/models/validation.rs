use thiserror::Error;

use crate::models::{SnippetLanguage, Tags};

/// Raw form input for a new or edited snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetFields {
    pub title: String,
    pub lang: String,
    pub tags: String,
    pub content: String,
}

impl SnippetFields {
    pub fn new(
        title: impl Into<String>,
        lang: impl Into<String>,
        tags: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            lang: lang.into(),
            tags: tags.into(),
            content: content.into(),
        }
    }
}

/// Fields that passed validation, in their canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub title: String,
    pub lang: SnippetLanguage,
    pub tags: Tags,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("content must not be empty")]
    EmptyContent,
}

/// Checks the title, then the content, and normalizes the tags.
/// Content is kept verbatim since whitespace is significant there.
pub fn validate_for_save(fields: &SnippetFields) -> Result<ValidatedFields, ValidationError> {
    let title = fields.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if fields.content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    Ok(ValidatedFields {
        title: title.to_string(),
        lang: SnippetLanguage::from(fields.lang.as_str()),
        tags: Tags::parse(&fields.tags),
        content: fields.content.clone(),
    })
}
