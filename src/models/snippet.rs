use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

use crate::models::validation::ValidatedFields;

/// Opaque snippet identifier. Ids read back from storage are kept verbatim,
/// freshly generated ones are UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl SnippetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SnippetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SnippetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Language tag of a snippet. The set is open: anything that is not a
/// well-known tag is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnippetLanguage {
    JavaScript,
    TypeScript,
    HTML,
    CSS,
    Python,
    Rust,
    Bash,
    Json,
    Plain,
    Other(String),
}

impl SnippetLanguage {
    /// Tag string as it appears in storage and in the language filter
    pub fn as_str(&self) -> &str {
        match self {
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::TypeScript => "ts",
            SnippetLanguage::HTML => "html",
            SnippetLanguage::CSS => "css",
            SnippetLanguage::Python => "python",
            SnippetLanguage::Rust => "rust",
            SnippetLanguage::Bash => "bash",
            SnippetLanguage::Json => "json",
            SnippetLanguage::Plain => "plain",
            SnippetLanguage::Other(tag) => tag,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::TypeScript => "TypeScript",
            SnippetLanguage::HTML => "HTML",
            SnippetLanguage::CSS => "CSS",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::Rust => "Rust",
            SnippetLanguage::Bash => "Bash",
            SnippetLanguage::Json => "JSON",
            SnippetLanguage::Plain => "Plain text",
            SnippetLanguage::Other(tag) => tag,
        }
    }

    /// File extension used when a snippet is written out as a file.
    /// Only the web languages get their own extension, the rest are plain text.
    pub fn file_extension(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::HTML => "html",
            SnippetLanguage::CSS => "css",
            _ => "txt",
        }
    }

    /// All well-known tags, in the order a language picker would offer them
    pub fn known() -> [SnippetLanguage; 9] {
        [
            SnippetLanguage::JavaScript,
            SnippetLanguage::TypeScript,
            SnippetLanguage::HTML,
            SnippetLanguage::CSS,
            SnippetLanguage::Python,
            SnippetLanguage::Rust,
            SnippetLanguage::Bash,
            SnippetLanguage::Json,
            SnippetLanguage::Plain,
        ]
    }
}

impl From<&str> for SnippetLanguage {
    fn from(tag: &str) -> Self {
        match tag {
            "js" => SnippetLanguage::JavaScript,
            "ts" => SnippetLanguage::TypeScript,
            "html" => SnippetLanguage::HTML,
            "css" => SnippetLanguage::CSS,
            "python" => SnippetLanguage::Python,
            "rust" => SnippetLanguage::Rust,
            "bash" => SnippetLanguage::Bash,
            "json" => SnippetLanguage::Json,
            "plain" => SnippetLanguage::Plain,
            _ => SnippetLanguage::Other(tag.to_string()),
        }
    }
}

impl From<String> for SnippetLanguage {
    fn from(tag: String) -> Self {
        match SnippetLanguage::from(tag.as_str()) {
            SnippetLanguage::Other(_) => SnippetLanguage::Other(tag),
            known => known,
        }
    }
}

impl From<SnippetLanguage> for String {
    fn from(lang: SnippetLanguage) -> Self {
        match lang {
            SnippetLanguage::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered tag list. Entries are trimmed and never empty; duplicates are kept
/// in the order they were typed. Stored as one comma-joined string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Normalizes raw comma-separated input
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical storage form, e.g. `a,b,b`
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older vaults may hold `null` here
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|raw| Tags::parse(&raw)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub lang: SnippetLanguage,
    #[serde(default)]
    pub tags: Tags,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    pub fn new(id: SnippetId, fields: ValidatedFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            lang: fields.lang,
            tags: fields.tags,
            content: fields.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field. `updated_at` never moves backwards,
    /// even if the clock does.
    pub fn apply_edit(&mut self, fields: ValidatedFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.lang = fields.lang;
        self.tags = fields.tags;
        self.content = fields.content;
        self.updated_at = now.max(self.updated_at).max(self.created_at);
    }
}
