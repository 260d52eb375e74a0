//! The single owner of the reminder collection.
//!
//! Every mutation is one read-modify-write cycle under the backend's lock:
//! the stored blob is re-read, the change is applied, and the whole
//! collection is written back before returning. Other processes sharing the
//! backend therefore never lose each other's reminders, and ids are never
//! handed out twice.
//!
//! A failed write never undoes the in-memory change. It is recorded as a
//! [`PersistenceWarning`], the change stays authoritative for the session,
//! and the write is retried on the next mutation or [`ReminderStore::reload`].
//! A blob that cannot be decoded is copied to a backup key before anything
//! overwrites it; a blob that cannot be read is never overwritten.

use crate::{
    domain::{due, Reminder, ReminderId, Title, ValidationError},
    storage::{
        backend::{BackendError, KeyLock, KeyValueStore},
        record::{self, DecodeError, Decoded},
    },
};

/// The key the collection is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "reminders";

/// Errors returned by [`ReminderStore`] mutations.
///
/// Either error leaves the collection exactly as it was.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No reminder has this id.
    #[error("reminder {0} not found")]
    NotFound(ReminderId),
}

/// A non-fatal problem talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceWarning {
    /// The stored collection could not be read. It is left untouched.
    #[error("could not read saved reminders, changes are kept in memory: {0}")]
    Read(BackendError),

    /// The stored collection could not be decoded.
    #[error("saved reminders are corrupt and were ignored: {0}")]
    Corrupt(DecodeError),

    /// A corrupt collection was copied to this key before being replaced.
    #[error("saved reminders were corrupt, the old copy was kept under '{0}'")]
    SetAside(String),

    /// Other processes could not be locked out while saving.
    #[error("could not lock saved reminders: {0}")]
    Lock(BackendError),

    /// The collection could not be serialized.
    #[error("could not encode reminders: {0}")]
    Encode(serde_json::Error),

    /// The collection could not be written. Changes are kept in memory.
    #[error("could not save reminders, changes will be lost on exit: {0}")]
    Write(BackendError),
}

/// What a read of the stored blob found.
enum Stored {
    /// Absent, or decoded; safe to overwrite.
    Readable,
    /// Present but unreadable; overwriting could destroy it.
    Unreadable,
    /// Read but not decodable.
    Corrupt(Vec<u8>),
}

/// An ordered collection of reminders backed by a key-value blob.
#[derive(Debug)]
pub struct ReminderStore<B> {
    backend: B,
    key: String,
    reminders: Vec<Reminder>,
    next_id: u64,
    unsaved: bool,
    warning: Option<PersistenceWarning>,
}

impl<B: KeyValueStore> ReminderStore<B> {
    /// Loads the collection stored under [`DEFAULT_KEY`].
    ///
    /// See [`ReminderStore::load_with_key`].
    #[must_use]
    pub fn load(backend: B) -> Self {
        Self::load_with_key(backend, DEFAULT_KEY)
    }

    /// Loads the collection stored under `key`.
    ///
    /// This never fails. An absent blob yields an empty collection; an
    /// unreadable or corrupt blob yields an empty collection and a
    /// [`PersistenceWarning`]. Individual malformed records are dropped.
    #[must_use]
    pub fn load_with_key(backend: B, key: impl Into<String>) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            reminders: Vec::new(),
            next_id: 1,
            unsaved: false,
            warning: None,
        };
        store.reload();
        store
    }

    /// Re-reads the collection from the backend.
    ///
    /// Changes written by another process replace the in-memory copy. If the
    /// blob cannot be read or decoded, the in-memory copy is kept and a
    /// [`PersistenceWarning`] is recorded. Unsaved changes are never replaced;
    /// instead the outstanding write is retried. The id counter never moves
    /// backwards.
    pub fn reload(&mut self) {
        let _lock = self.lock();
        let stored = self.sync();
        if self.unsaved && self.writable(stored) {
            tracing::debug!("Retrying save of '{}'", self.key);
            self.persist();
        }
    }

    /// Creates a reminder and appends it to the collection.
    ///
    /// The due instant is stored in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the text is blank or the due
    /// instant cannot be parsed.
    pub fn create(
        &mut self,
        text: &str,
        datetime: &str,
        notify_before: u32,
    ) -> Result<&[Reminder], StoreError> {
        let text = Title::new(text)?;
        let datetime = due::normalize(datetime).map_err(ValidationError::from)?;

        self.modify(|store| {
            let id = ReminderId::new(store.next_id);
            store.next_id = store.next_id.saturating_add(1);
            tracing::debug!("Creating reminder {id} due {datetime}");

            store.reminders.push(Reminder::new(id, text, datetime, notify_before));
            Ok(())
        })
    }

    /// Replaces the text and due instant of a reminder, re-arming its
    /// notifications and clearing its completed flag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for invalid input and
    /// [`StoreError::NotFound`] for an unknown id.
    pub fn update(
        &mut self,
        id: ReminderId,
        text: &str,
        datetime: &str,
    ) -> Result<&[Reminder], StoreError> {
        let text = Title::new(text)?;
        let datetime = due::normalize(datetime).map_err(ValidationError::from)?;

        self.modify(|store| {
            store.find_mut(id)?.edit(text, datetime);
            Ok(())
        })
    }

    /// Marks a reminder as completed. Completing twice is the same as once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn complete(&mut self, id: ReminderId) -> Result<&[Reminder], StoreError> {
        self.modify(|store| {
            store.find_mut(id)?.completed = true;
            Ok(())
        })
    }

    /// Removes a reminder. Its id is not reused.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn delete(&mut self, id: ReminderId) -> Result<&[Reminder], StoreError> {
        self.modify(|store| {
            let index = store.position(id)?;
            store.reminders.remove(index);
            Ok(())
        })
    }

    /// Records that the pre-due notification has fired.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn mark_notified(&mut self, id: ReminderId) -> Result<&[Reminder], StoreError> {
        self.modify(|store| {
            store.find_mut(id)?.notified = true;
            Ok(())
        })
    }

    /// Records that the due-time notification has fired.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub fn mark_due_notified(&mut self, id: ReminderId) -> Result<&[Reminder], StoreError> {
        self.modify(|store| {
            store.find_mut(id)?.due_notified = true;
            Ok(())
        })
    }

    /// Iterates over reminders in creation order, optionally skipping
    /// completed ones.
    pub fn list(&self, include_completed: bool) -> impl Iterator<Item = &Reminder> {
        self.reminders
            .iter()
            .filter(move |r| include_completed || !r.completed)
    }

    /// Looks up a reminder by id.
    #[must_use]
    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// All reminders in creation order.
    #[must_use]
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Whether the in-memory collection holds changes the backend has not
    /// accepted yet.
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// The most recent unresolved warning, if any.
    #[must_use]
    pub const fn warning(&self) -> Option<&PersistenceWarning> {
        self.warning.as_ref()
    }

    /// Takes the pending warning, leaving none behind.
    pub const fn take_warning(&mut self) -> Option<PersistenceWarning> {
        self.warning.take()
    }

    /// The backend the collection is persisted to.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Runs one locked read-modify-write cycle.
    fn modify(
        &mut self,
        change: impl FnOnce(&mut Self) -> Result<(), StoreError>,
    ) -> Result<&[Reminder], StoreError> {
        let _lock = self.lock();
        let stored = self.sync();
        change(self)?;

        if self.writable(stored) {
            self.persist();
        } else {
            tracing::warn!("Not overwriting unreadable '{}'", self.key);
            self.unsaved = true;
        }
        Ok(&self.reminders)
    }

    fn lock(&mut self) -> KeyLock {
        match self.backend.lock(&self.key) {
            Ok(lock) => lock,
            Err(e) => {
                self.warn(PersistenceWarning::Lock(e));
                KeyLock::unlocked()
            }
        }
    }

    /// Reads the stored blob, adopting it unless the in-memory copy holds
    /// unsaved changes.
    fn sync(&mut self) -> Stored {
        let bytes = match self.backend.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                if !self.unsaved {
                    tracing::debug!("No saved reminders under '{}'", self.key);
                    self.reminders.clear();
                }
                self.resolve_read_warning();
                return Stored::Readable;
            }
            Err(e) => {
                self.warn(PersistenceWarning::Read(e));
                return Stored::Unreadable;
            }
        };

        match record::decode(&bytes) {
            Ok(decoded) => {
                self.next_id = self.next_id.max(decoded.next_id);
                if !self.unsaved {
                    self.adopt(decoded);
                }
                self.resolve_read_warning();
                Stored::Readable
            }
            Err(e) => {
                self.warn(PersistenceWarning::Corrupt(e));
                Stored::Corrupt(bytes)
            }
        }
    }

    fn adopt(&mut self, decoded: Decoded) {
        if decoded.migrated {
            tracing::info!(
                "Migrated {} reminders from the legacy format",
                decoded.reminders.len()
            );
        }
        if decoded.dropped > 0 {
            tracing::warn!("Dropped {} malformed reminders", decoded.dropped);
        }
        self.reminders = decoded.reminders;
    }

    /// Whether the stored blob may be overwritten.
    fn writable(&mut self, stored: Stored) -> bool {
        match stored {
            Stored::Readable => true,
            Stored::Unreadable => false,
            Stored::Corrupt(bytes) => self.set_aside(&bytes),
        }
    }

    /// Copies an undecodable blob to a backup key. Returns whether the copy
    /// was written.
    fn set_aside(&mut self, bytes: &[u8]) -> bool {
        let backup = format!("{}.corrupt", self.key);
        match self.backend.set(&backup, bytes) {
            Ok(()) => {
                self.warn(PersistenceWarning::SetAside(backup));
                true
            }
            Err(e) => {
                self.warn(PersistenceWarning::Write(e));
                false
            }
        }
    }

    fn position(&self, id: ReminderId) -> Result<usize, StoreError> {
        self.reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn find_mut(&mut self, id: ReminderId) -> Result<&mut Reminder, StoreError> {
        self.reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn persist(&mut self) {
        let written = record::encode(&self.reminders, self.next_id)
            .map_err(PersistenceWarning::Encode)
            .and_then(|bytes| {
                self.backend
                    .set(&self.key, &bytes)
                    .map_err(PersistenceWarning::Write)
            });

        match written {
            Ok(()) => {
                self.unsaved = false;
                if matches!(
                    self.warning,
                    Some(PersistenceWarning::Write(_) | PersistenceWarning::Encode(_))
                ) {
                    self.warning = None;
                }
            }
            Err(warning) => {
                self.unsaved = true;
                self.warn(warning);
            }
        }
    }

    fn resolve_read_warning(&mut self) {
        if matches!(
            self.warning,
            Some(PersistenceWarning::Read(_) | PersistenceWarning::Corrupt(_))
        ) {
            self.warning = None;
        }
    }

    fn warn(&mut self, warning: PersistenceWarning) {
        tracing::warn!("{warning}");
        self.warning = Some(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileBackend, MemoryBackend};

    fn empty_store() -> ReminderStore<MemoryBackend> {
        ReminderStore::load(MemoryBackend::new())
    }

    fn reload(store: &ReminderStore<MemoryBackend>) -> ReminderStore<MemoryBackend> {
        ReminderStore::load(store.backend().clone())
    }

    #[test]
    fn absent_blob_loads_empty() {
        let store = empty_store();
        assert!(store.reminders().is_empty());
        assert!(store.warning().is_none());
    }

    #[test]
    fn corrupt_blob_loads_empty_with_warning() {
        let backend = MemoryBackend::new().with_blob(DEFAULT_KEY, "{{{");
        let store = ReminderStore::load(backend);

        assert!(store.reminders().is_empty());
        assert!(matches!(
            store.warning(),
            Some(PersistenceWarning::Corrupt(_))
        ));
    }

    #[test]
    fn create_appends_fully_populated_reminder() {
        let mut store = empty_store();
        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();
        let reminders = store.create("Bins", "2024/04/22 07:00", 0).unwrap();

        let last = reminders.last().unwrap();
        assert_eq!(last.text().as_str(), "Bins");
        assert_eq!(last.datetime(), "2024-04-22T07:00:00");
        assert_eq!(last.notify_before(), 0);
        assert!(!last.is_completed());
        assert!(!last.is_notified());
        assert!(!last.is_due_notified());
        assert_ne!(reminders[0].id(), last.id());
    }

    #[test]
    fn create_rejects_invalid_input_without_mutating() {
        let mut store = empty_store();

        assert_eq!(
            store.create("   ", "2024-04-21T10:00:00", 0),
            Err(StoreError::Validation(ValidationError::EmptyTitle))
        );
        assert!(matches!(
            store.create("Dentist", "soon", 0),
            Err(StoreError::Validation(ValidationError::DateTime(_)))
        ));
        assert!(store.reminders().is_empty());
        assert!(store.backend().blob(DEFAULT_KEY).is_none());
    }

    #[test]
    fn mutations_are_persisted_before_returning() {
        let mut store = empty_store();
        let id = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();
        store.mark_notified(id).unwrap();

        let reloaded = reload(&store);
        assert_eq!(reloaded.reminders(), store.reminders());
        assert!(reloaded.get(id).unwrap().is_notified());
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let mut store = empty_store();
        let a = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();
        let b = store.create("Bins", "2024-04-22T07:00:00", 0).unwrap()[1].id();
        store.create("Call mum", "2024-04-23T18:30:00", 5).unwrap();
        store.complete(a).unwrap();
        store.mark_due_notified(b).unwrap();

        assert_eq!(reload(&store).reminders(), store.reminders());
    }

    #[test]
    fn complete_is_idempotent() {
        let mut store = empty_store();
        let id = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();

        let once = store.complete(id).unwrap().to_vec();
        let twice = store.complete(id).unwrap().to_vec();

        assert_eq!(once, twice);
        assert!(twice[0].is_completed());
    }

    #[test]
    fn update_resets_flags() {
        let mut store = empty_store();
        let id = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();
        store.mark_notified(id).unwrap();
        store.mark_due_notified(id).unwrap();
        store.complete(id).unwrap();

        let updated = &store
            .update(id, "Dentist (moved)", "2024/04/22 11:00")
            .unwrap()[0];

        assert_eq!(updated.text().as_str(), "Dentist (moved)");
        assert_eq!(updated.datetime(), "2024-04-22T11:00:00");
        assert_eq!(updated.notify_before(), 10);
        assert!(!updated.is_completed());
        assert!(!updated.is_notified());
        assert!(!updated.is_due_notified());
    }

    #[test]
    fn unknown_ids_leave_collection_unchanged() {
        let mut store = empty_store();
        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();
        let before = store.reminders().to_vec();
        let missing = ReminderId::new(999);

        assert_eq!(store.delete(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(store.complete(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(store.mark_notified(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(
            store.update(missing, "x", "2024-04-21T10:00:00"),
            Err(StoreError::NotFound(missing))
        );

        assert_eq!(store.reminders(), before.as_slice());
    }

    #[test]
    fn list_filters_completed() {
        let mut store = empty_store();
        let done = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();
        store.create("Bins", "2024-04-22T07:00:00", 0).unwrap();
        store.complete(done).unwrap();

        let open: Vec<_> = store.list(false).map(|r| r.text().as_str()).collect();
        let all: Vec<_> = store.list(true).map(|r| r.text().as_str()).collect();

        assert_eq!(open, vec!["Bins"]);
        assert_eq!(all, vec!["Dentist", "Bins"]);
    }

    #[test]
    fn reload_picks_up_changes_from_another_writer() {
        let mut watcher = empty_store();
        let mut writer = reload(&watcher);
        writer.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        *watcher.backend_mut() = writer.backend().clone();
        watcher.reload();

        assert_eq!(watcher.reminders(), writer.reminders());
        assert!(watcher.warning().is_none());
    }

    #[test]
    fn reload_keeps_memory_when_blob_turns_corrupt() {
        let mut store = empty_store();
        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        *store.backend_mut() = MemoryBackend::new().with_blob(DEFAULT_KEY, "not json");
        store.reload();

        assert_eq!(store.reminders().len(), 1);
        assert!(matches!(
            store.warning(),
            Some(PersistenceWarning::Corrupt(_))
        ));
    }

    #[test]
    fn ids_are_not_reused_after_delete_and_reload() {
        let mut store = empty_store();
        store.create("a", "2024-04-21T10:00:00", 0).unwrap();
        let last = store.create("b", "2024-04-21T10:00:00", 0).unwrap()[1].id();
        store.delete(last).unwrap();

        let mut reloaded = reload(&store);
        let fresh = reloaded.create("c", "2024-04-21T10:00:00", 0).unwrap()[1].id();

        assert!(fresh > last);
    }

    #[test]
    fn failed_write_is_a_warning_not_an_error() {
        let mut store = empty_store();
        store.backend_mut().set_read_only(true);

        let reminders = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();
        assert_eq!(reminders.len(), 1);
        assert!(matches!(
            store.take_warning(),
            Some(PersistenceWarning::Write(_))
        ));
        assert!(store.warning().is_none());

        store.backend_mut().set_read_only(false);
        store.complete(store.reminders()[0].id()).unwrap();
        assert!(store.warning().is_none());
        assert_eq!(reload(&store).reminders().len(), 1);
    }

    #[test]
    fn legacy_blob_is_rewritten_in_current_format() {
        let legacy = r#"[{"id": 1713661200000, "text": "Dentist",
            "datetime": "2024-04-21T10:00:00", "notifyBefore": "10",
            "completed": false, "notified": false}]"#;
        let backend = MemoryBackend::new().with_blob(DEFAULT_KEY, legacy);
        let mut store = ReminderStore::load(backend);

        let id = store.reminders()[0].id();
        store.mark_notified(id).unwrap();

        let blob: serde_json::Value =
            serde_json::from_slice(store.backend().blob(DEFAULT_KEY).unwrap()).unwrap();
        assert_eq!(blob["_version"], "2");
        assert_eq!(blob["reminders"][0]["notified"], true);
        assert_eq!(blob["reminders"][0]["notifyBefore"], 10);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let open = || {
            ReminderStore::load_with_key(FileBackend::new(tmp.path().to_path_buf()), "todo")
        };

        let mut store = open();
        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        let reopened = open();
        assert_eq!(reopened.reminders(), store.reminders());
        assert!(tmp.path().join("todo.json").exists());
    }

    #[test]
    fn reload_retries_unsaved_changes() {
        let mut store = empty_store();
        let id = store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();

        store.backend_mut().set_read_only(true);
        store.mark_notified(id).unwrap();
        assert!(store.has_unsaved_changes());

        // The stale blob must not win while the write is outstanding.
        store.reload();
        assert!(store.get(id).unwrap().is_notified());

        store.backend_mut().set_read_only(false);
        store.reload();
        assert!(!store.has_unsaved_changes());
        assert!(store.warning().is_none());
        assert!(reload(&store).get(id).unwrap().is_notified());
    }

    #[test]
    fn two_writers_on_one_root_keep_each_others_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let open = || ReminderStore::load(FileBackend::new(tmp.path().to_path_buf()));

        let mut watcher = open();
        let dentist = watcher.create("Dentist", "2024-04-21T10:00:00", 10).unwrap()[0].id();

        let mut adder = open();
        adder.create("Bins", "2024-04-22T07:00:00", 0).unwrap();

        // The watcher has not reloaded since the adder wrote.
        watcher.mark_notified(dentist).unwrap();

        let mut reopened = open();
        let texts: Vec<_> = reopened.list(true).map(|r| r.text().as_str()).collect();
        assert_eq!(texts, vec!["Dentist", "Bins"]);
        assert!(reopened.get(dentist).unwrap().is_notified());

        let fresh = reopened.create("Call mum", "2024-04-23T18:30:00", 0).unwrap()[2].id();
        assert_eq!(fresh, ReminderId::new(3));
    }

    #[test]
    fn corrupt_blob_is_set_aside_before_being_replaced() {
        let backend = MemoryBackend::new().with_blob(DEFAULT_KEY, "not json");
        let mut store = ReminderStore::load(backend);

        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        let backup = format!("{DEFAULT_KEY}.corrupt");
        assert_eq!(store.backend().blob(&backup), Some(&b"not json"[..]));
        assert!(matches!(
            store.warning(),
            Some(PersistenceWarning::SetAside(key)) if *key == backup
        ));
        assert_eq!(reload(&store).reminders(), store.reminders());
    }

    #[test]
    fn corrupt_blob_is_kept_when_it_cannot_be_set_aside() {
        let backend = MemoryBackend::new().with_blob(DEFAULT_KEY, "not json");
        let mut store = ReminderStore::load(backend);
        store.backend_mut().set_read_only(true);

        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        assert_eq!(store.reminders().len(), 1);
        assert!(store.has_unsaved_changes());
        assert_eq!(store.backend().blob(DEFAULT_KEY), Some(&b"not json"[..]));
    }

    #[test]
    fn unreadable_blob_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(tmp.path().to_path_buf());
        // A directory where the blob should be cannot be read as a file.
        std::fs::create_dir_all(backend.path_for(DEFAULT_KEY).join("keep")).unwrap();

        let mut store = ReminderStore::load(backend);
        assert!(matches!(store.warning(), Some(PersistenceWarning::Read(_))));

        store.create("Dentist", "2024-04-21T10:00:00", 10).unwrap();

        assert_eq!(store.reminders().len(), 1);
        assert!(store.has_unsaved_changes());
        assert!(store.backend().path_for(DEFAULT_KEY).join("keep").is_dir());
    }
}
