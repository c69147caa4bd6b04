//! Page windows over contact ids
//!
//! Page `p` (1-based) covers ids `(p-1)*10+1 ..= (p-1)*10+10`. Pages at or
//! below zero are not rejected; their windows simply hold no ids.

use crate::fields::{ValidationError, ValidationResult};

/// Contacts per page.
pub const PAGE_SIZE: i64 = 10;

/// Inclusive id window of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub low: i64,
    pub high: i64,
}

impl PageWindow {
    /// Computes the window for page `page`.
    pub fn for_page(page: i64) -> Self {
        // Saturating so absurd page numbers give an empty far-away window.
        let low = page
            .saturating_sub(1)
            .saturating_mul(PAGE_SIZE)
            .saturating_add(1);
        let high = low.saturating_add(PAGE_SIZE - 1);
        Self { low, high }
    }

    /// Parses page text and computes its window.
    pub fn parse(text: &str) -> ValidationResult<Self> {
        parse_page_number(text).map(Self::for_page)
    }
}

/// Parses a page number, tolerating surrounding whitespace.
pub fn parse_page_number(text: &str) -> ValidationResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidPageNumber(text.to_string()))
}
