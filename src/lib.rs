//! snippet-vault - a small personal store of code snippets
//!
//! The store keeps snippets newest-first, validates every save, and writes the
//! whole collection to a single durable slot after each change. Around it sit
//! a pure search filter and a single-snippet selection.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod selection;
pub mod session;

pub use error::{Result, StorageError, StoreError};
pub use models::{
    FileSlots, KeyValueSlot, MemorySlots, Snippet, SnippetFields, SnippetId, SnippetLanguage,
    SnippetRepository, SnippetStore, Tags, ValidationError,
};
pub use search::filter;
pub use selection::{Selection, SelectionState};
pub use session::Session;
