use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::models::storage::{KeyValueSlot, SnippetRepository};
use crate::models::{Snippet, SnippetFields, SnippetId, validate_for_save};

/// How many fresh ids are tried before `create` gives up.
pub const MAX_ID_ATTEMPTS: usize = 16;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait IdGenerator {
    fn next_id(&mut self) -> SnippetId;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> SnippetId {
        SnippetId::generate()
    }
}

/// Owner of the snippet collection. Every successful mutation is written
/// through to the repository before it returns; if the write fails the
/// in-memory change is rolled back.
///
/// The collection is kept newest-first: `create` inserts at the front and
/// `update` never moves an entry.
pub struct SnippetStore<S, C = SystemClock, G = UuidGenerator> {
    repository: SnippetRepository<S>,
    snippets: Vec<Snippet>,
    clock: C,
    ids: G,
}

impl<S: KeyValueSlot> SnippetStore<S> {
    /// Opens a store over whatever the repository currently holds
    pub fn open(repository: SnippetRepository<S>) -> Self {
        Self::with_collaborators(repository, SystemClock, UuidGenerator)
    }
}

impl<S: KeyValueSlot, C: Clock, G: IdGenerator> SnippetStore<S, C, G> {
    pub fn with_collaborators(repository: SnippetRepository<S>, clock: C, ids: G) -> Self {
        let snippets = repository.load();
        Self {
            repository,
            snippets,
            clock,
            ids,
        }
    }

    pub fn create(&mut self, fields: &SnippetFields) -> Result<Snippet> {
        let validated = validate_for_save(fields)?;
        let id = self.fresh_id()?;
        let snippet = Snippet::new(id, validated, self.clock.now());

        self.snippets.insert(0, snippet.clone());
        if let Err(e) = self.persist() {
            self.snippets.remove(0);
            return Err(e);
        }

        debug!(id = %snippet.id, "Created snippet");
        Ok(snippet)
    }

    pub fn update(&mut self, id: &SnippetId, fields: &SnippetFields) -> Result<Snippet> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let validated = validate_for_save(fields)?;
        let now = self.clock.now();

        let previous = self.snippets[index].clone();
        self.snippets[index].apply_edit(validated, now);
        if let Err(e) = self.persist() {
            self.snippets[index] = previous;
            return Err(e);
        }

        debug!(id = %id, "Updated snippet");
        Ok(self.snippets[index].clone())
    }

    /// Removes the snippet with `id`. Unknown ids are a no-op and return `None`.
    /// Callers tracking a selection must clear it themselves.
    pub fn delete(&mut self, id: &SnippetId) -> Result<Option<Snippet>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let removed = self.snippets.remove(index);
        if let Err(e) = self.persist() {
            self.snippets.insert(index, removed);
            return Err(e);
        }

        debug!(id = %id, "Deleted snippet");
        Ok(Some(removed))
    }

    /// Drops every snippet and removes the persisted slot
    pub fn clear_all(&mut self) -> Result<()> {
        self.repository.clear()?;
        self.snippets.clear();
        debug!("Cleared all snippets");
        Ok(())
    }

    pub fn get_all(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn get_by_id(&self, id: &SnippetId) -> Option<&Snippet> {
        self.snippets.iter().find(|snippet| &snippet.id == id)
    }

    pub fn contains(&self, id: &SnippetId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn repository(&self) -> &SnippetRepository<S> {
        &self.repository
    }

    fn position(&self, id: &SnippetId) -> Option<usize> {
        self.snippets.iter().position(|snippet| &snippet.id == id)
    }

    fn fresh_id(&mut self) -> Result<SnippetId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.contains(&id) {
                return Ok(id);
            }
            debug!(id = %id, "Generated id collides, retrying");
        }
        Err(StoreError::IdCollision {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn persist(&mut self) -> Result<()> {
        self.repository.save(&self.snippets).map_err(|e| {
            warn!(error = %e, "Failed to persist snippets, rolling back");
            StoreError::from(e)
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::models::storage::MemorySlots;
    use crate::models::ValidationError;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that returns a shared, manually advanced instant
    #[derive(Clone)]
    pub(crate) struct ManualClock(Rc<Cell<DateTime<Utc>>>);

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self(Rc::new(Cell::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            )))
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    /// Hands out ids from a fixed script, then `s_<n>` sequentially
    pub(crate) struct ScriptedIds {
        script: Vec<&'static str>,
        counter: usize,
    }

    impl ScriptedIds {
        pub(crate) fn new(script: Vec<&'static str>) -> Self {
            Self { script, counter: 0 }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&mut self) -> SnippetId {
            self.counter += 1;
            if self.script.is_empty() {
                SnippetId::new(format!("s_{}", self.counter))
            } else {
                SnippetId::new(self.script.remove(0))
            }
        }
    }

    /// Slots that accept reads but reject writes once `fail` is set
    #[derive(Default)]
    struct FlakySlots {
        inner: MemorySlots,
        fail: Rc<Cell<bool>>,
    }

    impl KeyValueSlot for FlakySlots {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if self.fail.get() {
                return Err(StorageError::io(
                    key,
                    std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                ));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn fields(title: &str, lang: &str) -> SnippetFields {
        SnippetFields::new(title, lang, "", format!("// {title}"))
    }

    fn store() -> (SnippetStore<MemorySlots, ManualClock, ScriptedIds>, ManualClock) {
        let clock = ManualClock::new();
        let store = SnippetStore::with_collaborators(
            SnippetRepository::new(MemorySlots::new()),
            clock.clone(),
            ScriptedIds::new(vec![]),
        );
        (store, clock)
    }

    #[test]
    fn create_inserts_newest_first_and_persists() {
        let (mut store, clock) = store();
        let first = store.create(&fields("First", "js")).unwrap();
        clock.advance(Duration::seconds(5));
        let second = store.create(&fields("Second", "css")).unwrap();

        let ids: Vec<_> = store.get_all().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(store.repository().load(), store.get_all());
    }

    #[test]
    fn create_scenario_normalizes_tags() {
        let (mut store, _) = store();
        let created = store
            .create(&SnippetFields::new("Hi", "js", "a, b ,b", "console.log(1)"))
            .unwrap();
        assert_eq!(created.tags.joined(), "a,b,b");
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn invalid_create_leaves_collection_and_slot_untouched() {
        let (mut store, _) = store();
        let err = store
            .create(&SnippetFields::new("", "", "", "x"))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyTitle)
        ));
        assert!(store.is_empty());
        assert_eq!(
            store.repository().slots().get(store.repository().key()).unwrap(),
            None
        );
    }

    #[test]
    fn colliding_ids_are_regenerated() {
        let clock = ManualClock::new();
        let mut store = SnippetStore::with_collaborators(
            SnippetRepository::new(MemorySlots::new()),
            clock,
            ScriptedIds::new(vec!["dup", "dup", "dup", "fresh"]),
        );
        let first = store.create(&fields("One", "js")).unwrap();
        let second = store.create(&fields("Two", "js")).unwrap();
        assert_eq!(first.id.as_str(), "dup");
        assert_eq!(second.id.as_str(), "fresh");
    }

    #[test]
    fn exhausted_id_attempts_fail_without_mutation() {
        let clock = ManualClock::new();
        let mut store = SnippetStore::with_collaborators(
            SnippetRepository::new(MemorySlots::new()),
            clock,
            ScriptedIds::new(vec!["same"; MAX_ID_ATTEMPTS + 1]),
        );
        store.create(&fields("One", "js")).unwrap();
        let err = store.create(&fields("Two", "js")).unwrap_err();
        assert!(matches!(err, StoreError::IdCollision { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_keeps_identity_position_and_creation_time() {
        let (mut store, clock) = store();
        let older = store.create(&fields("Older", "js")).unwrap();
        store.create(&fields("Newer", "js")).unwrap();
        clock.advance(Duration::minutes(3));

        let updated = store
            .update(&older.id, &SnippetFields::new("Renamed", "ts", "x", "let a = 1;"))
            .unwrap();

        assert_eq!(updated.id, older.id);
        assert_eq!(updated.created_at, older.created_at);
        assert!(updated.updated_at > older.updated_at);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(store.get_all()[1].id, older.id);
        assert_eq!(store.repository().load()[1].title, "Renamed");
    }

    #[test]
    fn update_never_moves_updated_at_backwards() {
        let (mut store, clock) = store();
        let created = store.create(&fields("One", "js")).unwrap();
        clock.advance(Duration::hours(-2));
        let updated = store.update(&created.id, &fields("Two", "js")).unwrap();
        assert_eq!(updated.updated_at, created.updated_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (mut store, _) = store();
        let err = store
            .update(&SnippetId::new("missing"), &fields("One", "js"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "missing"));
    }

    #[test]
    fn invalid_update_keeps_previous_values() {
        let (mut store, _) = store();
        let created = store.create(&fields("One", "js")).unwrap();
        let err = store
            .update(&created.id, &SnippetFields::new("One", "js", "", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyContent)
        ));
        assert_eq!(store.get_by_id(&created.id), Some(&created));
    }

    #[test]
    fn delete_is_idempotent() {
        let (mut store, _) = store();
        let created = store.create(&fields("One", "js")).unwrap();

        assert_eq!(store.delete(&created.id).unwrap(), Some(created.clone()));
        assert!(store.get_by_id(&created.id).is_none());
        assert_eq!(store.delete(&created.id).unwrap(), None);
        assert!(store.get_by_id(&created.id).is_none());
        assert!(store.repository().load().is_empty());
    }

    #[test]
    fn failed_writes_roll_back() {
        let fail = Rc::new(Cell::new(false));
        let slots = FlakySlots {
            inner: MemorySlots::new(),
            fail: fail.clone(),
        };
        let mut store = SnippetStore::with_collaborators(
            SnippetRepository::new(slots),
            ManualClock::new(),
            ScriptedIds::new(vec![]),
        );
        let kept = store.create(&fields("Kept", "js")).unwrap();

        fail.set(true);
        assert!(matches!(
            store.create(&fields("Lost", "js")),
            Err(StoreError::Persistence(_))
        ));
        assert!(matches!(
            store.update(&kept.id, &fields("Changed", "js")),
            Err(StoreError::Persistence(_))
        ));
        assert!(matches!(
            store.delete(&kept.id),
            Err(StoreError::Persistence(_))
        ));

        assert_eq!(store.get_all(), &[kept.clone()]);
        assert_eq!(store.repository().load(), vec![kept]);
    }

    #[test]
    fn reopening_restores_the_collection() {
        let (mut store, _) = store();
        store.create(&fields("One", "js")).unwrap();
        store.create(&fields("Two", "css")).unwrap();
        let raw = store
            .repository()
            .slots()
            .get(store.repository().key())
            .unwrap()
            .unwrap();

        let reopened = SnippetStore::open(SnippetRepository::new(MemorySlots::with_value(
            crate::models::storage::DEFAULT_SLOT_KEY,
            raw,
        )));
        assert_eq!(reopened.get_all(), store.get_all());
    }

    #[test]
    fn clear_all_empties_store_and_slot() {
        let (mut store, _) = store();
        store.create(&fields("One", "js")).unwrap();
        store.clear_all().unwrap();
        assert!(store.is_empty());
        assert_eq!(
            store.repository().slots().get(store.repository().key()).unwrap(),
            None
        );
    }
}
