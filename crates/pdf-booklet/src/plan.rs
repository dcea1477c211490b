//! Signature planning
//!
//! Partitions a page range into saddle-stitched signatures. Every signature
//! before the last is completely full; the last one holds between 1 and
//! `slots_per_signature` real pages and is padded with blanks.

use crate::constants::SLOTS_PER_SHEET;
use crate::range::PageRange;
use crate::types::*;

/// Number of sheets folded together into one signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureConfig {
    sheets_per_signature: usize,
}

impl SignatureConfig {
    pub fn new(sheets_per_signature: usize) -> Result<Self> {
        if sheets_per_signature < 1 {
            return Err(BookletError::InvalidRange(
                "a signature needs at least one sheet".to_string(),
            ));
        }
        if sheets_per_signature.checked_mul(SLOTS_PER_SHEET).is_none() {
            return Err(BookletError::InvalidRange(format!(
                "{sheets_per_signature} sheets per signature is too many to plan"
            )));
        }
        Ok(Self {
            sheets_per_signature,
        })
    }

    pub fn sheets_per_signature(&self) -> usize {
        self.sheets_per_signature
    }

    pub fn slots_per_signature(&self) -> usize {
        self.sheets_per_signature * SLOTS_PER_SHEET
    }
}

/// The pages and blanks making up one signature, in reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSpan {
    /// 0-based signature index
    pub index: usize,
    /// Source page number of the first page in the signature
    pub first_page: usize,
    /// Real pages in the signature
    pub page_count: usize,
    /// Blank slots appended after the real pages
    pub blank_count: usize,
}

/// Partition statistics for a signature config and a page range.
///
/// A plan is a plain value: changing the range or the sheet count means
/// computing a new plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignaturePlan {
    range: PageRange,
    sheets_per_signature: usize,
    total_pages: usize,
    slots_per_signature: usize,
    full_signature_count: usize,
    signature_count: usize,
    last_signature_first_page: usize,
    last_signature_page_count: usize,
    last_signature_blank_count: usize,
}

impl SignaturePlan {
    /// Validate raw inputs and compute the plan
    pub fn compute(sheets_per_signature: usize, first: usize, last: usize) -> Result<Self> {
        let config = SignatureConfig::new(sheets_per_signature)?;
        let range = PageRange::new(first, last)?;
        Ok(Self::from_parts(config, range))
    }

    pub fn from_parts(config: SignatureConfig, range: PageRange) -> Self {
        let total_pages = range.len();
        let slots_per_signature = config.slots_per_signature();

        // One page is held back so the last signature is never empty: a
        // single page still makes one signature, and an exact multiple of
        // the signature size leaves the last signature full.
        let full_signature_count = (total_pages - 1) / slots_per_signature;
        let consumed = full_signature_count * slots_per_signature;
        let last_signature_page_count = total_pages - consumed;

        Self {
            range,
            sheets_per_signature: config.sheets_per_signature(),
            total_pages,
            slots_per_signature,
            full_signature_count,
            signature_count: full_signature_count + 1,
            last_signature_first_page: range.first() + consumed,
            last_signature_page_count,
            last_signature_blank_count: slots_per_signature - last_signature_page_count,
        }
    }

    pub fn range(&self) -> PageRange {
        self.range
    }

    pub fn config(&self) -> SignatureConfig {
        SignatureConfig {
            sheets_per_signature: self.sheets_per_signature,
        }
    }

    pub fn sheets_per_signature(&self) -> usize {
        self.sheets_per_signature
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn slots_per_signature(&self) -> usize {
        self.slots_per_signature
    }

    pub fn full_signature_count(&self) -> usize {
        self.full_signature_count
    }

    pub fn signature_count(&self) -> usize {
        self.signature_count
    }

    pub fn last_signature_first_page(&self) -> usize {
        self.last_signature_first_page
    }

    pub fn last_signature_page_count(&self) -> usize {
        self.last_signature_page_count
    }

    pub fn last_signature_blank_count(&self) -> usize {
        self.last_signature_blank_count
    }

    /// Slots across all signatures, real and blank
    pub fn total_slots(&self) -> usize {
        self.signature_count * self.slots_per_signature
    }

    /// Physical sheets across all signatures
    pub fn total_sheets(&self) -> usize {
        self.signature_count * self.sheets_per_signature
    }

    /// Span of signature `index`, or `None` past the last signature
    pub fn signature(&self, index: usize) -> Option<SignatureSpan> {
        if index >= self.signature_count {
            return None;
        }
        let span = if index < self.full_signature_count {
            SignatureSpan {
                index,
                first_page: self.range.first() + index * self.slots_per_signature,
                page_count: self.slots_per_signature,
                blank_count: 0,
            }
        } else {
            SignatureSpan {
                index,
                first_page: self.last_signature_first_page,
                page_count: self.last_signature_page_count,
                blank_count: self.last_signature_blank_count,
            }
        };
        Some(span)
    }

    /// All signature spans in order
    pub fn signatures(&self) -> impl Iterator<Item = SignatureSpan> + '_ {
        (0..self.signature_count).filter_map(|index| self.signature(index))
    }
}
