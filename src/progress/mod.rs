pub mod completion;
pub mod error;
pub mod store;

pub use completion::{CompletionOutcome, complete_chapter};
pub use error::{ErrorKind, LastError, ProgressError};
pub use store::{ENTRY_CHAPTER_ID, ProgressStore, Snapshot, has_profile_access};
