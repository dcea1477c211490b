//! Human readable output for the command line

use pdf_booklet::{BookletStatistics, ImpositionSequence, SheetSide, Slot};
use std::fmt::Write;

pub fn format_statistics(stats: &BookletStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Booklet Statistics:");
    let _ = writeln!(out, "  Source pages: {}", stats.source_pages);
    let _ = writeln!(out, "  Selected pages: {}", stats.selected_pages);
    let _ = writeln!(
        out,
        "  Signatures: {} ({} sheet(s) each)",
        stats.signatures, stats.sheets_per_signature
    );
    let _ = writeln!(out, "  Output sheets: {}", stats.output_sheets);
    let _ = writeln!(out, "  Output pages: {}", stats.output_pages);
    let _ = writeln!(out, "  Blank pages added: {}", stats.blank_pages_added);
    out
}

/// Sheet by sheet layout, one line per printed side
pub fn format_layout(sequence: &ImpositionSequence) -> String {
    let mut out = String::new();
    for signature in sequence.signatures() {
        let _ = writeln!(out, "Signature {}:", signature.index + 1);
        for sheet in &signature.sheets {
            for side in sheet.sides() {
                let label = match side.side {
                    SheetSide::Front => "front",
                    SheetSide::Back => "back ",
                };
                let _ = writeln!(
                    out,
                    "  sheet {} {}  {:>6} | {:<6}",
                    sheet.index + 1,
                    label,
                    slot_label(side.left),
                    slot_label(side.right)
                );
            }
        }
    }
    out
}

fn slot_label(slot: Slot) -> String {
    let base = match slot {
        Slot::Page { number, .. } => number.to_string(),
        Slot::Blank { .. } => "-".to_string(),
    };
    if slot.is_rotated() {
        format!("{}*", base)
    } else {
        base
    }
}
