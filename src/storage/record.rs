//! Contact log record format
//!
//! Every write appends a full snapshot of one contact:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE)
//! +------------------+
//! | Contact ID       | (u64 LE)
//! +------------------+
//! | Contact Body     | (length-prefixed JSON bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io;

use super::checksum::{compute_checksum, verify_checksum};
use super::contact::{Contact, ContactFields};
use super::errors::{StorageError, StorageResult};

/// Length + id + body length + checksum, with an empty body.
pub const MIN_RECORD_SIZE: usize = 4 + 8 + 4 + 4;

/// One snapshot in the contact log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub contact: Contact,
}

impl LogRecord {
    pub fn new(contact: Contact) -> Self {
        Self { contact }
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> StorageResult<Vec<u8>> {
        let body = serde_json::to_vec(&self.contact.fields).map_err(|e| {
            StorageError::write_failed_no_source(format!(
                "Failed to encode contact {}: {}",
                self.contact.id, e
            ))
        })?;

        let record_length = (MIN_RECORD_SIZE + body.len()) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&self.contact.id.to_le_bytes());
        record.extend_from_slice(&(body.len() as u32).to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        Ok(record)
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = read_u32(data, 0) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = read_u32(data, checksum_offset);
        let covered = &data[..checksum_offset];

        if !verify_checksum(covered, stored_checksum) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    compute_checksum(covered),
                    stored_checksum
                ),
            ));
        }

        let mut id_buf = [0u8; 8];
        id_buf.copy_from_slice(&data[4..12]);
        let id = u64::from_le_bytes(id_buf);

        let body_length = read_u32(data, 12) as usize;
        if 16 + body_length != checksum_offset {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Body length {} does not fit record length {}",
                    body_length, record_length
                ),
            ));
        }

        let fields: ContactFields = serde_json::from_slice(&data[16..checksum_offset])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok((Self::new(Contact::new(id, fields)), record_length))
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(buf)
}
