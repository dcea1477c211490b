//! Imposition sequencing
//!
//! Turns a [`SignaturePlan`] into the exact order in which page slots are
//! printed: signature by signature, sheet by sheet (outermost first), front
//! side then back side, left slot then right slot.
//!
//! ## Saddle-stitch fold
//!
//! Within a signature of `N` reading-order positions `0..N`, sheet `k` carries:
//!
//! ```text
//!            left          right
//! front:   N - 1 - 2k       2k
//! back:      2k + 1      N - 2 - 2k
//! ```
//!
//! For a single sheet (`N = 4`) that is `[4, 1]` on the front and `[2, 3]`
//! on the back. The outer sheet carries the first and last pages; each later
//! sheet nests inside the one before it.

use crate::plan::{SignaturePlan, SignatureSpan};
use crate::types::*;

/// Which physical side of the printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SheetSide {
    /// Printed first in duplex
    Front,
    /// Printed second in duplex
    Back,
}

/// One logical page position on a sheet side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Slot {
    /// A page of the source document (1-based number)
    Page { number: usize, rotated: bool },
    /// Padding past the end of the content
    Blank { rotated: bool },
}

impl Slot {
    /// Source page number, `None` for blanks
    pub fn page_number(&self) -> Option<usize> {
        match *self {
            Slot::Page { number, .. } => Some(number),
            Slot::Blank { .. } => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Slot::Blank { .. })
    }

    /// Whether the content is turned 180° in place
    pub fn is_rotated(&self) -> bool {
        match *self {
            Slot::Page { rotated, .. } | Slot::Blank { rotated } => rotated,
        }
    }
}

/// The two slots printed side by side on one side of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SidePair {
    pub side: SheetSide,
    pub left: Slot,
    pub right: Slot,
}

/// One physical sheet of a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sheet {
    /// 0-based position within the signature, 0 = outermost
    pub index: usize,
    pub front: SidePair,
    pub back: SidePair,
}

impl Sheet {
    /// Front then back, the order they are printed in
    pub fn sides(&self) -> [&SidePair; 2] {
        [&self.front, &self.back]
    }

    /// Front-left, front-right, back-left, back-right
    pub fn slots(&self) -> [Slot; 4] {
        [
            self.front.left,
            self.front.right,
            self.back.left,
            self.back.right,
        ]
    }
}

/// The sheets of one signature, outermost first
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Signature {
    pub index: usize,
    pub sheets: Vec<Sheet>,
}

/// Reading-order positions (0-based within a signature) carried by a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldPositions {
    pub front_left: usize,
    pub front_right: usize,
    pub back_left: usize,
    pub back_right: usize,
}

/// Positions carried by sheet `sheet` of a signature with
/// `slots_per_signature` slots.
///
/// `slots_per_signature` must be a non-zero multiple of 4 and `sheet` must be
/// below `slots_per_signature / 4`.
pub fn fold_positions(slots_per_signature: usize, sheet: usize) -> FoldPositions {
    debug_assert!(slots_per_signature >= 4 && slots_per_signature % 4 == 0);
    debug_assert!(sheet < slots_per_signature / 4);

    let n = slots_per_signature;
    FoldPositions {
        front_left: n - 1 - 2 * sheet,
        front_right: 2 * sheet,
        back_left: 2 * sheet + 1,
        back_right: n - 2 - 2 * sheet,
    }
}

/// Ordered, rotation-tagged slots for a whole booklet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImpositionSequence {
    signatures: Vec<Signature>,
    slots_per_signature: usize,
    rotate_back_side: bool,
}

impl ImpositionSequence {
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn slots_per_signature(&self) -> usize {
        self.slots_per_signature
    }

    pub fn rotate_back_side(&self) -> bool {
        self.rotate_back_side
    }

    /// Every sheet in print order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.signatures.iter().flat_map(|sig| sig.sheets.iter())
    }

    /// Every sheet side in print order; one output page each
    pub fn sides(&self) -> impl Iterator<Item = &SidePair> {
        self.sheets().flat_map(|sheet| sheet.sides())
    }

    /// Every slot in print order (left then right on each side)
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.sheets().flat_map(|sheet| sheet.slots())
    }

    /// Total slot count, real and blank
    pub fn len(&self) -> usize {
        self.signatures.len() * self.slots_per_signature
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Number of output pages (sheet sides)
    pub fn output_page_count(&self) -> usize {
        self.sides().count()
    }

    /// Source page numbers in print order
    pub fn page_numbers(&self) -> Vec<usize> {
        self.slots().filter_map(|slot| slot.page_number()).collect()
    }

    pub fn blank_count(&self) -> usize {
        self.slots().filter(Slot::is_blank).count()
    }
}

/// Lay out every signature of `plan` for printing.
///
/// When `rotate_back_side` is set, every back-side slot is tagged for a 180°
/// turn so that long-edge duplex output reads upright after folding.
pub fn sequence(plan: &SignaturePlan, rotate_back_side: bool) -> Result<ImpositionSequence> {
    if plan.signature_count() == 0 {
        return Err(BookletError::EmptyPlan);
    }

    let slots_per_signature = plan.slots_per_signature();
    let signatures: Vec<Signature> = plan
        .signatures()
        .map(|span| {
            log::debug!(
                "Signature {}: {} pages from page {}, {} blank",
                span.index + 1,
                span.page_count,
                span.first_page,
                span.blank_count
            );
            sequence_signature(&span, plan.sheets_per_signature(), rotate_back_side)
        })
        .collect();

    Ok(ImpositionSequence {
        signatures,
        slots_per_signature,
        rotate_back_side,
    })
}

fn sequence_signature(
    span: &SignatureSpan,
    sheets_per_signature: usize,
    rotate_back_side: bool,
) -> Signature {
    let slots_per_signature = span.page_count + span.blank_count;

    // Reading position -> slot; positions past the content are blanks
    let slot_at = |position: usize, rotated: bool| {
        if position < span.page_count {
            Slot::Page {
                number: span.first_page + position,
                rotated,
            }
        } else {
            Slot::Blank { rotated }
        }
    };

    let sheets = (0..sheets_per_signature)
        .map(|k| {
            let pos = fold_positions(slots_per_signature, k);
            Sheet {
                index: k,
                front: SidePair {
                    side: SheetSide::Front,
                    left: slot_at(pos.front_left, false),
                    right: slot_at(pos.front_right, false),
                },
                back: SidePair {
                    side: SheetSide::Back,
                    left: slot_at(pos.back_left, rotate_back_side),
                    right: slot_at(pos.back_right, rotate_back_side),
                },
            }
        })
        .collect();

    Signature {
        index: span.index,
        sheets,
    }
}
