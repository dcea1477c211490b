//! Shared constants for booklet generation

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Sheets and Signatures
// =============================================================================

/// Page slots carried by one sheet: two per side, printed duplex
pub const SLOTS_PER_SHEET: usize = 4;

/// Output pages emitted per sheet (front and back)
pub const SIDES_PER_SHEET: usize = 2;

/// Largest signature accepted from options and the command line
pub const MAX_SHEETS_PER_SIGNATURE: usize = 8;

pub const DEFAULT_SHEETS_PER_SIGNATURE: usize = 4;

// =============================================================================
// Rendering
// =============================================================================

/// Fallback source page size in points (US Letter) when no MediaBox is found
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

/// Line width for the fold line (points)
pub const FOLD_LINE_WIDTH: f32 = 0.5;

/// Dash pattern for the fold line: 6pt dash, 3pt gap
pub const FOLD_LINE_DASH: &str = "[6 3] 0 d";

/// Suffix of the temporary file a booklet is written to before it is moved
/// into place
pub const PARTIAL_FILE_SUFFIX: &str = "part";
