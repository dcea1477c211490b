use crate::constants::SIDES_PER_SHEET;
use crate::plan::SignaturePlan;

/// Statistics about a booklet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BookletStatistics {
    /// Pages in the source document
    pub source_pages: usize,
    /// Pages in the selected range
    pub selected_pages: usize,
    /// Number of signatures
    pub signatures: usize,
    /// Sheets folded into each signature
    pub sheets_per_signature: usize,
    /// Real (non-blank) pages carried by each signature
    pub pages_per_signature: Vec<usize>,
    /// Physical sheets of paper
    pub output_sheets: usize,
    /// Output page count (front and back of every sheet)
    pub output_pages: usize,
    /// Blank pages added to fill the last signature
    pub blank_pages_added: usize,
}

/// Calculate statistics for a plan over a source of `source_pages` pages
pub fn calculate_statistics(plan: &SignaturePlan, source_pages: usize) -> BookletStatistics {
    let output_sheets = plan.total_sheets();

    BookletStatistics {
        source_pages,
        selected_pages: plan.total_pages(),
        signatures: plan.signature_count(),
        sheets_per_signature: plan.sheets_per_signature(),
        pages_per_signature: plan.signatures().map(|span| span.page_count).collect(),
        output_sheets,
        output_pages: output_sheets * SIDES_PER_SHEET,
        blank_pages_added: plan.last_signature_blank_count(),
    }
}
