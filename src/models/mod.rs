pub mod snippet;
pub mod storage;
pub mod store;
pub mod validation;

pub use snippet::{Snippet, SnippetId, SnippetLanguage, Tags};
pub use storage::{
    DEFAULT_SLOT_KEY, FileSlots, KeyValueSlot, MemorySlots, SnippetRepository,
};
pub use store::{Clock, IdGenerator, SnippetStore, SystemClock, UuidGenerator};
pub use validation::{SnippetFields, ValidatedFields, ValidationError, validate_for_save};
