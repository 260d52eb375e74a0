pub mod backend;
mod record;
pub mod store;

pub use backend::{BackendError, FileBackend, KeyLock, KeyValueStore, MemoryBackend};
pub use record::DecodeError;
pub use store::{PersistenceWarning, ReminderStore, StoreError, DEFAULT_KEY};
