//! Append-only writer for the contact log
//!
//! Each write is its own unit of work: the file is opened, the snapshot is
//! appended and fsynced, and the handle is released before returning, on
//! success and on failure alike.
//!
//! A failed write never leaves a partial record behind. The log is cut back
//! to its length before the write, so a retry appends after the last
//! complete record. If that truncation fails the log is reported corrupt.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::contact::Contact;
use super::errors::{StorageError, StorageResult};
use super::record::LogRecord;

/// Scoped append handle. Dropping it closes the file.
pub struct LogWriter {
    log_path: PathBuf,
    file: File,
}

impl LogWriter {
    /// Opens the log for appending, creating it if missing.
    pub fn open(log_path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open contact log: {}", log_path.display()),
                    e,
                )
            })?;

        Ok(Self {
            log_path: log_path.to_path_buf(),
            file,
        })
    }

    /// Appends one snapshot and releases the file.
    pub fn append(log_path: &Path, contact: &Contact) -> StorageResult<u64> {
        let mut writer = Self::open(log_path)?;
        writer.write(contact)
    }

    /// Writes a snapshot with fsync enforcement.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - `CONTACTDIR_STORAGE_WRITE_FAILED` if write or fsync fails and the
    ///   log was rolled back
    /// - `CONTACTDIR_DATA_CORRUPTION` if the rollback itself failed
    pub fn write(&mut self, contact: &Contact) -> StorageResult<u64> {
        let serialized = LogRecord::new(contact.clone()).serialize()?;

        self.write_or_rollback(&serialized, |file, bytes| {
            file.write_all(bytes).map_err(|e| {
                StorageError::write_failed(format!("Failed to write contact {}", contact.id), e)
            })?;
            file.sync_all().map_err(|e| {
                StorageError::write_failed(
                    format!("fsync failed after writing contact {}", contact.id),
                    e,
                )
            })
        })?;

        Ok(serialized.len() as u64)
    }

    fn write_or_rollback(
        &mut self,
        bytes: &[u8],
        write: impl FnOnce(&mut File, &[u8]) -> StorageResult<()>,
    ) -> StorageResult<()> {
        let log_len = self
            .file
            .metadata()
            .map_err(|e| {
                StorageError::io_error(
                    format!("Failed to read log length: {}", self.log_path.display()),
                    e,
                )
            })?
            .len();

        let Err(e) = write(&mut self.file, bytes) else {
            return Ok(());
        };

        self.file
            .set_len(log_len)
            .and_then(|()| self.file.sync_all())
            .map_err(|rollback| {
                StorageError::corruption_at_offset(
                    log_len,
                    format!("Failed to truncate partial record ({}): {}", e, rollback),
                )
            })?;
        warn!(path = %self.log_path.display(), log_len, "partial record truncated");

        Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::super::contact::ContactFields;
    use super::super::reader::LogReader;
    use super::*;
    use tempfile::TempDir;

    fn sample(id: u64, name: &str) -> Contact {
        Contact::new(
            id,
            ContactFields {
                name: name.into(),
                second_name: "Smith".into(),
                middle_name: "John".into(),
                organisation: "Acme".into(),
                org_phone: "74244".into(),
                personal_phone: "+79101459029".into(),
            },
        )
    }

    #[test]
    fn test_append_grows_file_by_record_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.dat");
        let contact = sample(1, "Bob");

        let first = LogWriter::append(&path, &contact).unwrap();
        let second = LogWriter::append(&path, &contact).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), first + second);
    }

    #[test]
    fn test_failed_write_leaves_replayable_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.dat");
        let anna = sample(1, "Anna");
        let boris = sample(2, "Boris");

        let first = LogWriter::append(&path, &anna).unwrap();

        // Half a record reaches the file, then the device gives up.
        let bytes = LogRecord::new(boris.clone()).serialize().unwrap();
        let mut writer = LogWriter::open(&path).unwrap();
        let err = writer
            .write_or_rollback(&bytes, |file, bytes| {
                file.write_all(&bytes[..bytes.len() / 2]).unwrap();
                Err(StorageError::write_failed(
                    "disk full",
                    std::io::Error::other("disk full"),
                ))
            })
            .unwrap_err();
        drop(writer);

        assert!(!err.is_fatal());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), first);

        // The retry lands directly after the last complete record.
        LogWriter::append(&path, &boris).unwrap();
        let contacts = LogReader::open(&path).unwrap().replay().unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[&2], boris);
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("contacts.dat");
        let err = LogWriter::open(&path).err().unwrap();
        assert!(!err.is_fatal());
    }
}
