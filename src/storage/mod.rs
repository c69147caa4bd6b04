//! Contact storage subsystem
//!
//! The store holds the canonical persistent state of all contacts as an
//! append-only log of full snapshots.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - Checksum-verified on every read
//! - Latest snapshot wins for the same id
//! - Each write opens, fsyncs and releases the log file
//! - Records are never deleted

mod checksum;
mod contact;
mod errors;
mod reader;
mod record;
mod store;
mod writer;

pub use checksum::compute_checksum;
pub use contact::{Contact, ContactFields, ContactId};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::LogReader;
pub use record::LogRecord;
pub use store::{FileStore, MemoryStore, RecordStore, LOG_FILE_NAME};
pub use writer::LogWriter;
