//! snippet-vault - personal code snippet store
//!
//! Keeps a small collection of titled, language-tagged snippets in a single
//! JSON slot under the user's data directory, and exposes list, show, add,
//! edit and delete from the command line.

use color_eyre::Result;
use color_eyre::eyre::eyre;
use snippet_vault::cli;
use snippet_vault::config::Config;
use snippet_vault::models::{FileSlots, SnippetRepository, SnippetStore};
use snippet_vault::session::Session;
use tracing_subscriber::EnvFilter;

/// Application entry point and initialization
fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load().map_err(|e| eyre!("{e:#}"))?;
    init_tracing(&config.log_level);
    tracing::debug!(data_dir = %config.data_dir.display(), slot = %config.slot_key, "Opening vault");

    let repository =
        SnippetRepository::with_key(FileSlots::new(&config.data_dir), config.slot_key.clone());
    let mut session = Session::open(SnippetStore::open(repository));

    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::execute_cli(&args, &mut session).map_err(|e| eyre!("{e:#}"))?;

    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
