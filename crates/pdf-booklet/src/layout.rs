//! Geometry of a 2-up sheet side
//!
//! A booklet sheet is the paper size turned landscape, folded down the
//! middle. Each side holds two cells, one either side of the fold, inside the
//! printer-safe sheet margins. Page content is scaled into its cell and
//! pushed against the fold so facing pages meet at the spine.

use crate::constants::mm_to_pt;
use crate::types::*;

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Which half of the sheet side a slot occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// Fold on the right edge
    Left,
    /// Fold on the left edge
    Right,
}

/// Cells and fold position for one side of an output sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub width_pt: f32,
    pub height_pt: f32,
    pub left: Rect,
    pub right: Rect,
}

impl FaceLayout {
    pub fn new(settings: &SheetSettings) -> Result<Self> {
        let (width_mm, height_mm) = settings.paper_size.sheet_dimensions_mm();
        let width_pt = mm_to_pt(width_mm);
        let height_pt = mm_to_pt(height_mm);

        let margins = &settings.margins;
        let fold_x = width_pt / 2.0;
        let bottom = mm_to_pt(margins.bottom_mm);
        let cell_height = height_pt - bottom - mm_to_pt(margins.top_mm);
        let left_x = mm_to_pt(margins.left_mm);
        let right_edge = width_pt - mm_to_pt(margins.right_mm);

        let left = Rect::new(left_x, bottom, fold_x - left_x, cell_height);
        let right = Rect::new(fold_x, bottom, right_edge - fold_x, cell_height);

        if left.width <= 0.0 || right.width <= 0.0 || cell_height <= 0.0 {
            return Err(BookletError::Config(format!(
                "Sheet margins leave no room for pages on {:?} paper",
                settings.paper_size
            )));
        }

        Ok(Self {
            width_pt,
            height_pt,
            left,
            right,
        })
    }

    pub fn cell(&self, half: Half) -> Rect {
        match half {
            Half::Left => self.left,
            Half::Right => self.right,
        }
    }

    /// X coordinate of the fold
    pub fn fold_x(&self) -> f32 {
        self.width_pt / 2.0
    }
}

/// Where and how large a source page is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Area covered by the scaled page
    pub content_rect: Rect,
    pub scale: f32,
    /// Drawn turned 180° inside `content_rect`
    pub rotated: bool,
}

/// Scale a `source_width` x `source_height` page into `cell` and align it
/// against the fold.
pub fn place_page(
    cell: &Rect,
    half: Half,
    source_width: f32,
    source_height: f32,
    scaling_mode: ScalingMode,
    rotated: bool,
) -> Placement {
    let scale = calculate_scale(
        source_width,
        source_height,
        cell.width,
        cell.height,
        scaling_mode,
    );
    let scaled_width = source_width * scale;
    let scaled_height = source_height * scale;

    let x = match half {
        Half::Left => cell.right() - scaled_width,
        Half::Right => cell.x,
    };
    let y = cell.y + (cell.height - scaled_height) / 2.0;

    Placement {
        content_rect: Rect::new(x, y, scaled_width, scaled_height),
        scale,
        rotated,
    }
}

/// Calculate scale factor for fitting source to target dimensions.
fn calculate_scale(
    src_width: f32,
    src_height: f32,
    target_width: f32,
    target_height: f32,
    mode: ScalingMode,
) -> f32 {
    if src_width <= 0.0 || src_height <= 0.0 {
        return 1.0;
    }
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    match mode {
        ScalingMode::Fit => scale_w.min(scale_h),
        ScalingMode::Fill => scale_w.max(scale_h),
        ScalingMode::None => 1.0,
    }
}
