use crate::models::Snippet;

/// Computes the visible list for a search text and language filter.
///
/// The language filter is an exact match on the tag and is skipped when
/// blank. The search text is trimmed and matched case-insensitively as a
/// substring of the title, the joined tags or the content; blank text
/// matches everything. Order follows `snippets`.
pub fn filter<'a>(
    snippets: &'a [Snippet],
    search_text: &str,
    lang_filter: &str,
) -> Vec<&'a Snippet> {
    let query = search_text.trim().to_lowercase();

    snippets
        .iter()
        .filter(|snippet| lang_filter.is_empty() || snippet.lang.as_str() == lang_filter)
        .filter(|snippet| query.is_empty() || matches_query(snippet, &query))
        .collect()
}

/// `query` must already be lowercased
fn matches_query(snippet: &Snippet, query: &str) -> bool {
    snippet.title.to_lowercase().contains(query)
        || snippet.tags.joined().to_lowercase().contains(query)
        || snippet.content.to_lowercase().contains(query)
}

/// Which field a search hit came from, for display next to the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Tags,
    Content,
}

impl MatchField {
    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Tags => "tags",
            MatchField::Content => "content",
        }
    }
}

/// First field that matches the search text, checked in title, tags, content
/// order. `None` for a blank search.
pub fn match_field(snippet: &Snippet, search_text: &str) -> Option<MatchField> {
    let query = search_text.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    if snippet.title.to_lowercase().contains(&query) {
        Some(MatchField::Title)
    } else if snippet.tags.joined().to_lowercase().contains(&query) {
        Some(MatchField::Tags)
    } else if snippet.content.to_lowercase().contains(&query) {
        Some(MatchField::Content)
    } else {
        None
    }
}

/// First content line containing the search text, as `Line N: ...`
pub fn match_context(snippet: &Snippet, search_text: &str) -> Option<String> {
    let query = search_text.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    snippet
        .content
        .lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(&query))
        .map(|(i, line)| format!("Line {}: {}", i + 1, line.trim()))
}
