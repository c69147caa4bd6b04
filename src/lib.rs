//! contactdir - an interactive, validated contact directory
//!
//! Raw field maps are validated and normalized by `fields`, persisted through
//! `directory` into a `storage::RecordStore`, and driven interactively by `cli`.

pub mod cli;
pub mod directory;
pub mod fields;
pub mod storage;
