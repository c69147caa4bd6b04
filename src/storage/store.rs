//! Record store abstraction and its two implementations
//!
//! `MemoryStore` holds the id-ordered index. `FileStore` wraps a
//! `MemoryStore` rebuilt from the contact log on open and appends a snapshot
//! to the log before every index change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::contact::{Contact, ContactFields, ContactId};
use super::errors::{StorageError, StorageResult};
use super::reader::LogReader;
use super::writer::LogWriter;
use crate::fields::FieldMap;

/// File name of the contact log inside the data directory.
pub const LOG_FILE_NAME: &str = "contacts.dat";

/// Persistent record store consumed by the directory service.
pub trait RecordStore {
    /// Stores a new contact and returns its assigned id.
    fn insert(&mut self, fields: &ContactFields) -> StorageResult<ContactId>;

    /// Point lookup.
    fn get_by_id(&self, id: ContactId) -> StorageResult<Option<Contact>>;

    /// Replaces only the fields present in `patch`. Unknown ids are a no-op.
    fn patch_by_id(&mut self, id: ContactId, patch: &FieldMap) -> StorageResult<()>;

    /// Contacts with `low <= id <= high`, ascending by id.
    fn find_by_range(&self, low: i64, high: i64) -> StorageResult<Vec<Contact>>;

    /// Contacts matching every supplied field exactly.
    fn find_by_predicate(&self, filter: &FieldMap) -> StorageResult<Vec<Contact>>;
}

/// Volatile store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    contacts: BTreeMap<ContactId, Contact>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_contacts(contacts: BTreeMap<ContactId, Contact>) -> Self {
        Self { contacts }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn next_id(&self) -> ContactId {
        self.contacts.keys().next_back().map_or(1, |id| id + 1)
    }

    fn put(&mut self, contact: Contact) {
        self.contacts.insert(contact.id, contact);
    }

    fn patched(&self, id: ContactId, patch: &FieldMap) -> Option<Contact> {
        let mut contact = self.contacts.get(&id)?.clone();
        contact.fields.apply(patch);
        Some(contact)
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, fields: &ContactFields) -> StorageResult<ContactId> {
        let id = self.next_id();
        self.put(Contact::new(id, fields.clone()));
        Ok(id)
    }

    fn get_by_id(&self, id: ContactId) -> StorageResult<Option<Contact>> {
        Ok(self.contacts.get(&id).cloned())
    }

    fn patch_by_id(&mut self, id: ContactId, patch: &FieldMap) -> StorageResult<()> {
        if let Some(contact) = self.patched(id, patch) {
            self.put(contact);
        }
        Ok(())
    }

    fn find_by_range(&self, low: i64, high: i64) -> StorageResult<Vec<Contact>> {
        // Ids start at 1, so anything at or below zero can never match.
        let low = low.max(1) as u64;
        if high < 1 || (high as u64) < low {
            return Ok(Vec::new());
        }
        Ok(self
            .contacts
            .range(low..=high as u64)
            .map(|(_, contact)| contact.clone())
            .collect())
    }

    fn find_by_predicate(&self, filter: &FieldMap) -> StorageResult<Vec<Contact>> {
        Ok(self
            .contacts
            .values()
            .filter(|contact| contact.fields.matches(filter))
            .cloned()
            .collect())
    }
}

/// Store persisted as an append-only contact log.
pub struct FileStore {
    log_path: PathBuf,
    index: MemoryStore,
}

impl FileStore {
    /// Opens the store in `data_dir`, creating the directory and log if missing,
    /// and replays the log into memory.
    ///
    /// # Errors
    ///
    /// Returns `CONTACTDIR_DATA_CORRUPTION` if any log record fails its checksum.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                StorageError::io_error(
                    format!("Failed to create data directory: {}", data_dir.display()),
                    e,
                )
            })?;
        }

        let log_path = data_dir.join(LOG_FILE_NAME);
        // Creates the file if absent; the handle is dropped immediately.
        LogWriter::open(&log_path)?;

        let contacts = LogReader::open(&log_path)?.replay()?;
        debug!(path = %log_path.display(), contacts = contacts.len(), "contact log replayed");

        Ok(Self {
            log_path,
            index: MemoryStore::from_contacts(contacts),
        })
    }

    /// Returns the path to the contact log.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Number of live contacts.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl RecordStore for FileStore {
    fn insert(&mut self, fields: &ContactFields) -> StorageResult<ContactId> {
        let contact = Contact::new(self.index.next_id(), fields.clone());
        LogWriter::append(&self.log_path, &contact)?;
        let id = contact.id;
        self.index.put(contact);
        Ok(id)
    }

    fn get_by_id(&self, id: ContactId) -> StorageResult<Option<Contact>> {
        self.index.get_by_id(id)
    }

    fn patch_by_id(&mut self, id: ContactId, patch: &FieldMap) -> StorageResult<()> {
        if let Some(contact) = self.index.patched(id, patch) {
            LogWriter::append(&self.log_path, &contact)?;
            self.index.put(contact);
        }
        Ok(())
    }

    fn find_by_range(&self, low: i64, high: i64) -> StorageResult<Vec<Contact>> {
        self.index.find_by_range(low, high)
    }

    fn find_by_predicate(&self, filter: &FieldMap) -> StorageResult<Vec<Contact>> {
        self.index.find_by_predicate(filter)
    }
}
