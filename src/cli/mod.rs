//! CLI Module for snippet-vault
//! Dispatches `snippet-vault <COMMAND> [ARGS]` onto a session over the
//! configured snippet slot.

pub mod commands;

use std::collections::HashMap;

use anyhow::{Result, bail};
use colored::{ColoredString, Colorize};

use crate::models::{KeyValueSlot, SnippetLanguage};
use crate::models::store::{Clock, IdGenerator};
use crate::session::Session;

/// Left margin used on every output line
pub(crate) fn bar() -> ColoredString {
    "┃".bright_magenta()
}

/// Executes CLI commands based on the provided arguments
pub fn execute_cli<S, C, G>(args: &[String], session: &mut Session<S, C, G>) -> Result<()>
where
    S: KeyValueSlot,
    C: Clock,
    G: IdGenerator,
{
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let rest = &args[1..];
    match args[0].as_str() {
        "list" | "ls" => {
            let opts = Options::parse(rest, &["lang"])?;
            commands::list_snippets(
                session,
                &opts.positional.join(" "),
                opts.flag("lang").unwrap_or_default(),
            );
        }
        "show" | "view" | "cat" => {
            let opts = Options::parse(rest, &[])?;
            if opts.positional.is_empty() {
                println!("{}  Error: Missing snippet title or ID", bar());
                println!("{}  Usage: snippet-vault show <TITLE_OR_ID>", bar());
                return Ok(());
            }
            commands::show_snippet(session, &opts.positional.join(" "))?;
        }
        "add" | "new" => {
            let opts = Options::parse(rest, &["title", "lang", "tags", "content"])?;
            commands::add_snippet(session, &opts)?;
        }
        "edit" => {
            let opts = Options::parse(rest, &["title", "lang", "tags", "content"])?;
            let Some(id) = opts.positional.first() else {
                println!("{}  Error: Missing snippet ID", bar());
                println!(
                    "{}  Usage: snippet-vault edit <ID> [--title T] [--lang L] [--tags a,b] [--content C]",
                    bar()
                );
                return Ok(());
            };
            commands::edit_snippet(session, id, &opts)?;
        }
        "delete" | "rm" => {
            let opts = Options::parse(rest, &[])?;
            let Some(id) = opts.positional.first() else {
                println!("{}  Error: Missing snippet ID", bar());
                println!("{}  Usage: snippet-vault delete <ID>", bar());
                return Ok(());
            };
            commands::delete_snippet(session, id)?;
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        _ => {
            println!("{}  Unknown command: {}", bar(), args[0]);

            print_help();
        }
    }

    Ok(())
}

/// Positional arguments plus `--name value` / `--name=value` flags, with `--`
/// ending flag parsing
#[derive(Debug, Default)]
pub struct Options {
    pub positional: Vec<String>,
    flags: HashMap<String, String>,
}

impl Options {
    pub fn parse(args: &[String], allowed: &[&str]) -> Result<Self> {
        let mut opts = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            // Everything after a bare `--` is positional
            if arg == "--" {
                opts.positional.extend(iter.cloned());
                break;
            }

            let Some(flag) = arg.strip_prefix("--") else {
                opts.positional.push(arg.clone());
                continue;
            };

            let (name, value) = match flag.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => match iter.next() {
                    Some(value) => (flag.to_string(), value.clone()),
                    None => bail!("Missing value for --{}", flag),
                },
            };

            if !allowed.contains(&name.as_str()) {
                bail!("Unknown option --{}", name);
            }
            opts.flags.insert(name, value);
        }

        Ok(opts)
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }
}

/// Prints the help message with available commands
fn print_help() {
    println!("{}  {}", bar(), "SNIPPET VAULT".bold());

    println!("{}  {}", bar(), "USAGE:".bright_yellow());
    println!("{}  snippet-vault [COMMAND] [ARGS]", bar());
    println!("{}  {}", bar(), "COMMANDS:".bright_yellow());

    let commands = [
        ("list, ls [QUERY]", "List snippets, newest first, optionally filtered"),
        ("list --lang <LANG>", "Only list snippets with this exact language tag"),
        ("show, view <TITLE|ID>", "Display a snippet (partial title works)"),
        ("add --title <T> ...", "Save a new snippet; content is read from stdin"),
        ("edit <ID> --title <T> ...", "Change fields of an existing snippet"),
        ("delete, rm <ID>", "Delete a snippet"),
        ("help", "Display this help message"),
    ];
    for (usage, description) in commands {
        println!("{}  {:<27} {}", bar(), usage.bright_white(), description);
    }

    let known: Vec<String> = SnippetLanguage::known()
        .iter()
        .map(|lang| lang.as_str().to_string())
        .collect();
    println!("{}  {}", bar(), "LANGUAGES:".bright_yellow());
    println!("{}  {} (any other tag is accepted as-is)", bar(), known.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_in_both_forms() {
        let opts = Options::parse(
            &args(&["hello", "--lang", "css", "--tags=a,b", "world"]),
            &["lang", "tags"],
        )
        .unwrap();
        assert_eq!(opts.positional, vec!["hello", "world"]);
        assert_eq!(opts.flag("lang"), Some("css"));
        assert_eq!(opts.flag("tags"), Some("a,b"));
        assert_eq!(opts.flag("title"), None);
    }

    #[test]
    fn double_dash_ends_flag_parsing() {
        let opts = Options::parse(
            &args(&["--lang", "js", "--", "--verbose", "--lang=css"]),
            &["lang"],
        )
        .unwrap();
        assert_eq!(opts.positional, vec!["--verbose", "--lang=css"]);
        assert_eq!(opts.flag("lang"), Some("js"));
    }

    #[test]
    fn rejects_unknown_and_dangling_flags() {
        assert!(Options::parse(&args(&["--color", "red"]), &["lang"]).is_err());
        assert!(Options::parse(&args(&["--lang"]), &["lang"]).is_err());
    }
}
