//! Session orchestration.
//!
//! Wires the store, the selection and the list filters together the way an
//! interactive front end drives them: saving selects the saved snippet and
//! deleting the active snippet clears the selection.

use tracing::debug;

use crate::error::Result;
use crate::models::store::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::models::{KeyValueSlot, Snippet, SnippetFields, SnippetId, SnippetStore};
use crate::search;
use crate::selection::{Selection, SelectionState};

pub struct Session<S, C = SystemClock, G = UuidGenerator> {
    store: SnippetStore<S, C, G>,
    selection: SelectionState,
    search_text: String,
    lang_filter: String,
}

impl<S: KeyValueSlot, C: Clock, G: IdGenerator> Session<S, C, G> {
    /// Starts a session over `store`, opening the first snippet if there is one
    pub fn open(store: SnippetStore<S, C, G>) -> Self {
        let selection = match store.get_all().first() {
            Some(first) => SelectionState::selected(first.id.clone()),
            None => SelectionState::new(),
        };

        Self {
            store,
            selection,
            search_text: String::new(),
            lang_filter: String::new(),
        }
    }

    pub fn store(&self) -> &SnippetStore<S, C, G> {
        &self.store
    }

    pub fn into_store(self) -> SnippetStore<S, C, G> {
        self.store
    }

    pub fn selection(&self) -> &Selection {
        self.selection.current()
    }

    pub fn active(&self) -> Option<&Snippet> {
        self.selection.active(&self.store)
    }

    pub fn select(&mut self, id: &SnippetId) -> Result<()> {
        self.selection.select(&self.store, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_lang_filter(&mut self, lang: impl Into<String>) {
        self.lang_filter = lang.into();
    }

    pub fn lang_filter(&self) -> &str {
        &self.lang_filter
    }

    /// Snippets matching the current search text and language filter
    pub fn visible(&self) -> Vec<&Snippet> {
        search::filter(self.store.get_all(), &self.search_text, &self.lang_filter)
    }

    pub fn save_new(&mut self, fields: &SnippetFields) -> Result<Snippet> {
        let created = self.store.create(fields)?;
        self.selection.select(&self.store, &created.id)?;
        Ok(created)
    }

    pub fn save_edit(&mut self, id: &SnippetId, fields: &SnippetFields) -> Result<Snippet> {
        let updated = self.store.update(id, fields)?;
        self.selection.select(&self.store, &updated.id)?;
        Ok(updated)
    }

    /// Deletes `id` and drops the selection if it pointed there
    pub fn delete(&mut self, id: &SnippetId) -> Result<Option<Snippet>> {
        let removed = self.store.delete(id)?;
        if self.selection.is_selected(id) {
            debug!(id = %id, "Active snippet deleted, clearing selection");
            self.selection.clear();
        }
        Ok(removed)
    }

    /// Deletes the active snippet; a no-op without a selection
    pub fn delete_active(&mut self) -> Result<Option<Snippet>> {
        match self.selection.current().clone() {
            Selection::Selected(id) => self.delete(&id),
            Selection::NoSelection => Ok(None),
        }
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear_all()?;
        self.selection.clear();
        Ok(())
    }
}
