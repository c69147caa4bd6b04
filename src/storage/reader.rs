//! Sequential reader for the contact log
//!
//! - Every read validates the checksum
//! - Any checksum failure or truncated tail is corruption, never skipped

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::contact::{Contact, ContactId};
use super::errors::{StorageError, StorageResult};
use super::record::{LogRecord, MIN_RECORD_SIZE};

/// Reads log records front to back.
pub struct LogReader {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl LogReader {
    /// Opens the log file for reading.
    pub fn open(log_path: &Path) -> StorageResult<Self> {
        let file = File::open(log_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open contact log: {}", log_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Reads the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(CONTACTDIR_DATA_CORRUPTION)` on checksum failure or truncation
    pub fn read_next(&mut self) -> StorageResult<Option<LogRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated log: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 || record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Invalid record length {} with {} bytes remaining",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, consumed) = LogRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;

        Ok(Some(record))
    }

    /// Replays the whole log into an id-ordered map. Latest snapshot wins.
    pub fn replay(&mut self) -> StorageResult<BTreeMap<ContactId, Contact>> {
        let mut contacts = BTreeMap::new();

        while let Some(record) = self.read_next()? {
            contacts.insert(record.contact.id, record.contact);
        }

        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::super::contact::ContactFields;
    use super::super::writer::LogWriter;
    use super::*;
    use tempfile::TempDir;

    fn contact(id: ContactId, organisation: &str) -> Contact {
        Contact::new(
            id,
            ContactFields {
                name: "Vasya".into(),
                second_name: "Pupkin".into(),
                middle_name: "Ivanovich".into(),
                organisation: organisation.into(),
                org_phone: "12345".into(),
                personal_phone: "+79214444444".into(),
            },
        )
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.dat");
        std::fs::write(&path, b"").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_replay_latest_snapshot_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.dat");

        LogWriter::append(&path, &contact(1, "Gazprom")).unwrap();
        LogWriter::append(&path, &contact(2, "Rosneft")).unwrap();
        LogWriter::append(&path, &contact(1, "Lukoil")).unwrap();

        let contacts = LogReader::open(&path).unwrap().replay().unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[&1].fields.organisation, "Lukoil");
        assert_eq!(contacts[&2].fields.organisation, "Rosneft");
    }

    #[test]
    fn test_truncated_tail_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contacts.dat");
        LogWriter::append(&path, &contact(1, "Gazprom")).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 3);
        std::fs::write(&path, bytes).unwrap();

        let err = LogReader::open(&path).unwrap().replay().unwrap_err();
        assert!(err.is_fatal());
    }
}
