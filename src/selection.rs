//! Tracks which snippet, if any, is open in the detail view.

use crate::error::{Result, StoreError};
use crate::models::store::{Clock, IdGenerator, SnippetStore};
use crate::models::{KeyValueSlot, Snippet, SnippetId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected(SnippetId),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Selection,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out on `id`; the caller guarantees the store holds it
    pub(crate) fn selected(id: SnippetId) -> Self {
        Self {
            current: Selection::Selected(id),
        }
    }

    /// Selects `id` if the store holds it; otherwise the state is unchanged
    pub fn select<S, C, G>(&mut self, store: &SnippetStore<S, C, G>, id: &SnippetId) -> Result<()>
    where
        S: KeyValueSlot,
        C: Clock,
        G: IdGenerator,
    {
        if !store.contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.current = Selection::Selected(id.clone());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.current = Selection::NoSelection;
    }

    pub fn current(&self) -> &Selection {
        &self.current
    }

    pub fn is_selected(&self, id: &SnippetId) -> bool {
        matches!(&self.current, Selection::Selected(active) if active == id)
    }

    /// The selected snippet as currently held by `store`
    pub fn active<'a, S, C, G>(&self, store: &'a SnippetStore<S, C, G>) -> Option<&'a Snippet>
    where
        S: KeyValueSlot,
        C: Clock,
        G: IdGenerator,
    {
        match &self.current {
            Selection::Selected(id) => store.get_by_id(id),
            Selection::NoSelection => None,
        }
    }
}
