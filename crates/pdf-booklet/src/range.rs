//! Validated source page ranges

use crate::types::*;
use std::ops::RangeInclusive;

/// An inclusive `[first, last]` interval of 1-based source page numbers.
///
/// A `PageRange` can only be built through the validating constructors, so
/// holding one guarantees `1 <= first <= last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageRange {
    first: usize,
    last: usize,
}

/// Which end of a range the user just edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    First,
    Last,
}

impl PageRange {
    pub fn new(first: usize, last: usize) -> Result<Self> {
        if first < 1 {
            return Err(BookletError::InvalidRange(format!(
                "first page must be at least 1, got {first}"
            )));
        }
        if last < first {
            return Err(BookletError::InvalidRange(format!(
                "last page {last} is before first page {first}"
            )));
        }
        Ok(Self { first, last })
    }

    /// A range covering a single page
    pub fn single(page: usize) -> Result<Self> {
        Self::new(page, page)
    }

    /// The whole of a document with `page_count` pages
    pub fn whole(page_count: usize) -> Result<Self> {
        if page_count == 0 {
            return Err(BookletError::NoPages);
        }
        Self::new(1, page_count)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of pages in the range (always at least 1)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, page: usize) -> bool {
        (self.first..=self.last).contains(&page)
    }

    pub fn pages(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Check the range against a bound source document
    pub fn check_within(&self, page_count: usize) -> Result<()> {
        if self.last > page_count {
            return Err(BookletError::InvalidRange(format!(
                "pages {}-{} exceed the {page_count} pages of the source",
                self.first, self.last
            )));
        }
        Ok(())
    }

    /// Re-bind the range to a source with `page_count` pages, pulling `last`
    /// down when the source is shorter. Fails when even `first` is past the
    /// end of the source.
    pub fn bounded_by(self, page_count: usize) -> Result<Self> {
        if page_count == 0 {
            return Err(BookletError::NoPages);
        }
        if self.first > page_count {
            return Err(BookletError::InvalidRange(format!(
                "first page {} is past the end of a {page_count} page source",
                self.first
            )));
        }
        Self::new(self.first, self.last.min(page_count))
    }

    /// Build a range from two spinner-style inputs where `changed` was just
    /// edited.
    ///
    /// Both ends are first held inside `[1, page_count]`. The edited end is
    /// then held against the other one: a first page moved past the last page
    /// stops at the last page, and a last page moved before the first page
    /// stops at the first page.
    pub fn clamp(first: usize, last: usize, changed: RangeEnd, page_count: usize) -> Result<Self> {
        if page_count == 0 {
            return Err(BookletError::NoPages);
        }
        let first = first.clamp(1, page_count);
        let last = last.clamp(1, page_count);
        match changed {
            RangeEnd::First => Self::new(first.min(last), last),
            RangeEnd::Last => Self::new(first, last.max(first)),
        }
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "page {}", self.first)
        } else {
            write!(f, "pages {}-{}", self.first, self.last)
        }
    }
}
