use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::{Options, bar};
use crate::error::StoreError;
use crate::models::store::{Clock, IdGenerator};
use crate::models::{KeyValueSlot, Snippet, SnippetFields, SnippetId, ValidationError};
use crate::search;
use crate::session::Session;

/// Lists snippets matching the query and language filter, newest first
pub fn list_snippets<S, C, G>(session: &mut Session<S, C, G>, query: &str, lang: &str)
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    session.set_search_text(query);
    session.set_lang_filter(lang);
    let visible = session.visible();

    if visible.is_empty() {
        if session.store().is_empty() {
            println!("{}  No snippets saved yet.", bar());
        } else {
            println!("{}  No snippets match the current filter.", bar());
        }
        return;
    }

    println!(
        "{}  {} of {} snippets:",
        bar(),
        visible.len(),
        session.store().len()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, snippet) in visible.iter().enumerate() {
        let tags = if snippet.tags.is_empty() {
            "no tags".to_string()
        } else {
            snippet.tags.iter().collect::<Vec<_>>().join(", ")
        };

        println!(
            "{}  {}. {} {}",
            bar(),
            (idx + 1).to_string().bright_yellow(),
            snippet.title.bright_white().bold(),
            format!("[{}]", snippet.lang.as_str().to_uppercase()).bright_green()
        );
        println!("{}     {}: {}", bar(), "Tags".bright_blue(), tags);
        if let Some(field) = search::match_field(snippet, query) {
            let context = search::match_context(snippet, query)
                .filter(|_| field == search::MatchField::Content)
                .map(|line| format!(" ({})", line))
                .unwrap_or_default();
            println!(
                "{}     {}: {}{}",
                bar(),
                "Match".bright_cyan(),
                field.label(),
                context
            );
        }
        println!("{}     {}: {}", bar(), "ID".bright_black(), snippet.id);

        if idx < visible.len() - 1 {
            println!("{}  {}", bar(), "─".repeat(40).bright_black());
        }
    }
}

/// Finds a snippet by exact id, then exact title, then partial title
pub fn resolve_snippet<'a>(snippets: &'a [Snippet], name_or_id: &str) -> Option<&'a Snippet> {
    if let Some(snippet) = snippets.iter().find(|s| s.id.as_str() == name_or_id) {
        return Some(snippet);
    }

    let name = name_or_id.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    snippets
        .iter()
        .find(|s| s.title.to_lowercase() == name)
        .or_else(|| snippets.iter().find(|s| s.title.to_lowercase().contains(&name)))
}

/// Shows the content of a specific snippet by ID or title
pub fn show_snippet<S, C, G>(session: &mut Session<S, C, G>, name_or_id: &str) -> Result<()>
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    let Some(id) = resolve_snippet(session.store().get_all(), name_or_id).map(|s| s.id.clone())
    else {
        println!("{}  No snippet found matching: {}", bar(), name_or_id);
        print_available(session.store().get_all());
        return Ok(());
    };

    session.select(&id)?;
    if let Some(snippet) = session.active() {
        display_snippet_content(snippet);
    }
    Ok(())
}

/// Saves a new snippet. Content comes from `--content` or, failing that, stdin.
pub fn add_snippet<S, C, G>(session: &mut Session<S, C, G>, opts: &Options) -> Result<()>
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    // Fail before blocking on stdin
    let title = opts.flag("title").unwrap_or_default();
    if title.trim().is_empty() {
        return Err(StoreError::from(ValidationError::EmptyTitle).into());
    }

    let content = match opts.flag("content") {
        Some(content) => content.to_string(),
        None => read_stdin()?,
    };
    let fields = SnippetFields::new(
        title,
        opts.flag("lang").unwrap_or("js"),
        opts.flag("tags").unwrap_or_default(),
        content,
    );

    let created = session.save_new(&fields)?;
    println!(
        "{}  {} {}",
        bar(),
        "Snippet saved".bright_green(),
        created.title.bold()
    );
    println!("{}  {}: {}", bar(), "ID".bright_black(), created.id);
    Ok(())
}

/// Edits an existing snippet; flags that are not given keep their current value
pub fn edit_snippet<S, C, G>(session: &mut Session<S, C, G>, id: &str, opts: &Options) -> Result<()>
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    let id = SnippetId::new(id);
    let current = session.store().get_by_id(&id).cloned();
    let Some(current) = current else {
        println!("{}  Snippet not found with ID: {}", bar(), id);
        return Ok(());
    };

    let fields = SnippetFields::new(
        opts.flag("title").unwrap_or(current.title.as_str()),
        opts.flag("lang").unwrap_or(current.lang.as_str()),
        opts.flag("tags")
            .map(str::to_string)
            .unwrap_or_else(|| current.tags.joined()),
        opts.flag("content").unwrap_or(current.content.as_str()),
    );

    let updated = session.save_edit(&id, &fields)?;
    println!(
        "{}  {} {}",
        bar(),
        "Snippet updated".bright_green(),
        updated.title.bold()
    );
    Ok(())
}

/// Deletes a snippet by exact id. Deleting an unknown id is not an error.
pub fn delete_snippet<S, C, G>(session: &mut Session<S, C, G>, id: &str) -> Result<()>
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    match session.delete(&SnippetId::new(id))? {
        Some(removed) => println!(
            "{}  {} {}",
            bar(),
            "Snippet deleted".bright_green(),
            removed.title.bold()
        ),
        None => println!("{}  Nothing to delete for ID: {}", bar(), id),
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        println!(
            "{}  Reading snippet content from stdin, finish with Ctrl-D",
            bar()
        );
    }
    io::read_to_string(stdin).context("Failed to read snippet content from stdin")
}

/// Helper function to display snippet content
fn display_snippet_content(snippet: &Snippet) {
    println!(
        "{}  {} {}",
        bar(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold()
    );
    println!("{}", "─".repeat(60).bright_magenta());

    println!(
        "{}  {}: {} (.{})",
        bar(),
        "Language".bright_yellow(),
        snippet.lang.display_name(),
        snippet.lang.file_extension()
    );
    if !snippet.tags.is_empty() {
        println!("{}  {}: {}", bar(), "Tags".bright_blue(), snippet.tags);
    }
    println!(
        "{}  {}: {}",
        bar(),
        "Saved".bright_cyan(),
        snippet.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("{}  {}: {}", bar(), "ID".bright_black(), snippet.id);
    println!("{}", "─".repeat(60).bright_magenta());

    // Content is printed verbatim, only the margin is added
    for line in snippet.content.lines() {
        println!("{}  {}", bar(), line);
    }
}

/// Lists a handful of snippet titles to help the user
fn print_available(snippets: &[Snippet]) {
    if snippets.is_empty() {
        return;
    }

    println!("{}  Available snippets:", bar());
    println!("{}", "─".repeat(60).bright_magenta());

    for (idx, snippet) in snippets.iter().enumerate().take(10) {
        println!(
            "{}  {}. {}",
            bar(),
            (idx + 1).to_string().yellow(),
            snippet.title.bright_white()
        );
    }

    if snippets.len() > 10 {
        println!("{}  ... and {} more", bar(), snippets.len() - 10);
    }
}
