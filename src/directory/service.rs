//! Directory service
//!
//! Each operation is one synchronous validate → normalize → persist pass.
//! Nothing is carried between calls except what is in the store.

use tracing::{debug, error, info, warn};

use super::errors::DirectoryResult;
use super::page::PageWindow;
use crate::fields::{
    normalize, parse_fields, validate, FieldMap, RawFields, ValidationError, ValidationMode,
};
use crate::storage::{Contact, ContactFields, ContactId, RecordStore, StorageResult};

/// Key carrying the target id in an update map.
pub const ID_KEY: &str = "id";

/// Validating front end over a `RecordStore`.
pub struct DirectoryService<S> {
    store: S,
}

impl<S: RecordStore> DirectoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a contact. All six fields are required.
    ///
    /// Returns the stored contact with its new id.
    ///
    /// # Errors
    ///
    /// - `MissingFields`, `UnknownField` or `InvalidFormat` before any write
    /// - storage errors unmodified
    pub fn add_record(&mut self, raw: &RawFields) -> DirectoryResult<Contact> {
        let fields = checked_fields(raw, ValidationMode::Create)?;
        let fields = ContactFields::try_from(&fields)?;

        let store = &mut self.store;
        let id = with_retry("insert", || store.insert(&fields))?;
        info!(id, "contact added");

        Ok(Contact::new(id, fields))
    }

    /// Patches the contact named by the `id` key with the other supplied fields.
    ///
    /// Fields not supplied are left untouched. Returns the contact as stored
    /// after the patch.
    ///
    /// # Errors
    ///
    /// - `MissingId` if there is no `id` key
    /// - `NonIntegerId` if it does not parse
    /// - `UnknownField` or `InvalidFormat` for the supplied fields
    /// - `RecordNotFound` if no contact has that id
    pub fn update_record(&mut self, raw: &RawFields) -> DirectoryResult<Contact> {
        let id_text = raw.get(ID_KEY).ok_or(ValidationError::MissingId)?;
        let id = id_text
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::NonIntegerId(id_text.clone()))?;

        let mut raw = raw.clone();
        raw.remove(ID_KEY);
        let patch = checked_fields(&raw, ValidationMode::Update)?;

        let mut contact = self
            .lookup(id)?
            .ok_or(ValidationError::RecordNotFound(id))?;

        if patch.is_empty() {
            debug!(id = contact.id, "empty patch, nothing written");
            return Ok(contact);
        }

        let store = &mut self.store;
        with_retry("patch", || store.patch_by_id(contact.id, &patch))?;
        contact.fields.apply(&patch);

        let changed: Vec<&str> = patch.keys().map(|field| field.as_str()).collect();
        info!(id = contact.id, fields = ?changed, "contact updated");

        Ok(contact)
    }

    /// Finds contacts equal on every supplied field. No filters returns all.
    ///
    /// # Errors
    ///
    /// - `UnknownField` (including `id`) or `InvalidFormat` for a filter
    pub fn find_records(&self, raw: &RawFields) -> DirectoryResult<Vec<Contact>> {
        let filter = checked_fields(raw, ValidationMode::Filter)?;

        let contacts = with_retry("find_by_predicate", || self.store.find_by_predicate(&filter))?;
        debug!(filters = filter.len(), found = contacts.len(), "contacts found");

        Ok(contacts)
    }

    /// Returns the contacts of one ten-id page, ascending by id.
    ///
    /// # Errors
    ///
    /// - `InvalidPageNumber` if `page_text` is not an integer
    pub fn get_page(&self, page_text: &str) -> DirectoryResult<Vec<Contact>> {
        let window = PageWindow::parse(page_text)?;

        let contacts = with_retry("find_by_range", || {
            self.store.find_by_range(window.low, window.high)
        })?;
        debug!(low = window.low, high = window.high, found = contacts.len(), "page fetched");

        Ok(contacts)
    }

    fn lookup(&self, id: i64) -> StorageResult<Option<Contact>> {
        match ContactId::try_from(id) {
            Ok(id) if id > 0 => with_retry("get_by_id", || self.store.get_by_id(id)),
            _ => Ok(None),
        }
    }
}

/// Parse, validate for `mode`, then normalize.
fn checked_fields(raw: &RawFields, mode: ValidationMode) -> DirectoryResult<FieldMap> {
    let fields = parse_fields(raw)?;
    validate(&fields, mode)?;
    Ok(normalize(fields))
}

/// Runs a store call, retrying once if the failure is not fatal.
fn with_retry<T>(operation: &str, mut call: impl FnMut() -> StorageResult<T>) -> StorageResult<T> {
    match call() {
        Ok(value) => Ok(value),
        Err(e) if e.is_fatal() => {
            error!(operation, error = %e, "store call failed");
            Err(e)
        }
        Err(e) => {
            warn!(operation, error = %e, "store call failed, retrying once");
            call().inspect_err(|e| error!(operation, error = %e, "store call failed again"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{ErrorKind, Field};
    use crate::storage::{MemoryStore, StorageError};
    use std::cell::Cell;
    use std::io;

    fn raw(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn vasya() -> RawFields {
        raw(&[
            ("name", "vasya"),
            ("second_name", "Pupkin"),
            ("middle_name", "Ivanovich"),
            ("organisation", "Gazprom"),
            ("org_phone", "12345"),
            ("personal_phone", "89214444444"),
        ])
    }

    fn service() -> DirectoryService<MemoryStore> {
        DirectoryService::new(MemoryStore::new())
    }

    #[test]
    fn test_add_normalizes_before_storing() {
        let mut svc = service();
        let contact = svc.add_record(&vasya()).unwrap();

        assert_eq!(contact.id, 1);
        assert_eq!(contact.fields.name, "Vasya");
        assert_eq!(contact.fields.personal_phone, "+79214444444");
        assert_eq!(svc.store().get_by_id(1).unwrap().unwrap(), contact);
    }

    #[test]
    fn test_add_missing_field_writes_nothing() {
        let mut svc = service();
        let mut fields = vasya();
        fields.remove("org_phone");

        let err = svc.add_record(&fields).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::MissingFields));
        assert!(svc.store().is_empty());
    }

    #[test]
    fn test_add_rejects_unknown_field() {
        let mut svc = service();
        let mut fields = vasya();
        fields.insert("nickname".into(), "vas".into());

        let err = svc.add_record(&fields).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnknownField));
    }

    #[test]
    fn test_update_requires_integer_id() {
        let mut svc = service();
        svc.add_record(&vasya()).unwrap();

        let err = svc
            .update_record(&raw(&[("organisation", "Rosneft")]))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::MissingId));

        let err = svc
            .update_record(&raw(&[("id", "one"), ("organisation", "Rosneft")]))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NonIntegerId));
        assert_eq!(err.to_string(), "id should be integer");
        assert_eq!(svc.store().get_by_id(1).unwrap().unwrap().fields.organisation, "Gazprom");
    }

    #[test]
    fn test_update_unknown_id_not_found() {
        let mut svc = service();
        for id in ["7", "0", "-3"] {
            let err = svc
                .update_record(&raw(&[("id", id), ("name", "Anna")]))
                .unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::RecordNotFound));
        }
    }

    #[test]
    fn test_update_with_no_fields_returns_existing() {
        let mut svc = service();
        let added = svc.add_record(&vasya()).unwrap();
        let updated = svc.update_record(&raw(&[("id", "1")])).unwrap();
        assert_eq!(added, updated);
    }

    #[test]
    fn test_find_rejects_id_filter() {
        let svc = service();
        let err = svc.find_records(&raw(&[("id", "1")])).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnknownField));
    }

    #[test]
    fn test_find_normalizes_filters() {
        let mut svc = service();
        svc.add_record(&vasya()).unwrap();
        let found = svc.find_records(&raw(&[("name", "VASYA")])).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_bad_page_number() {
        let svc = service();
        let err = svc.get_page("abc").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NonIntegerId));
        assert_eq!(err.to_string(), "Incorrect page number format. Expected number");
    }

    #[test]
    fn test_retry_once_on_non_fatal_error() {
        let calls = Cell::new(0);
        let result = with_retry("test", || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(StorageError::write_failed("flaky", io::Error::other("flaky")))
            } else {
                Ok(Field::Name)
            }
        });
        assert_eq!(result.unwrap(), Field::Name);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_no_retry_on_corruption() {
        let calls = Cell::new(0);
        let result: StorageResult<()> = with_retry("test", || {
            calls.set(calls.get() + 1);
            Err(StorageError::corruption_at_offset(0, "checksum mismatch"))
        });
        assert!(result.unwrap_err().is_fatal());
        assert_eq!(calls.get(), 1);
    }
}
