//! Directory service: add, update, find and page through contacts
//!
//! Sits between raw caller input and the record store. Every operation
//! validates and normalizes before it touches the store.

mod errors;
mod page;
mod service;

pub use errors::{DirectoryError, DirectoryResult};
pub use page::{parse_page_number, PageWindow, PAGE_SIZE};
pub use service::{DirectoryService, ID_KEY};
