use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid page range: {0}")]
    InvalidRange(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Signature plan contains no signatures")]
    EmptyPlan,
    #[error("Source document has no pages")]
    NoPages,
    #[error("Failed to open {}: {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: Box<BookletError>,
    },
    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: Box<BookletError>,
    },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl BookletError {
    pub(crate) fn source_open(path: impl Into<PathBuf>, cause: BookletError) -> Self {
        BookletError::SourceOpen {
            path: path.into(),
            source: Box::new(cause),
        }
    }

    pub(crate) fn output_write(path: impl Into<PathBuf>, cause: BookletError) -> Self {
        BookletError::OutputWrite {
            path: path.into(),
            source: Box::new(cause),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Output paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
    Letter,
    Legal,
}

impl PaperSize {
    pub const ALL: [PaperSize; 9] = [
        PaperSize::A0,
        PaperSize::A1,
        PaperSize::A2,
        PaperSize::A3,
        PaperSize::A4,
        PaperSize::A5,
        PaperSize::A6,
        PaperSize::Letter,
        PaperSize::Legal,
    ];

    /// Portrait dimensions (width < height)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A0 => (841.0, 1189.0),
            PaperSize::A1 => (594.0, 841.0),
            PaperSize::A2 => (420.0, 594.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::A6 => (105.0, 148.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
        }
    }

    /// Sheet dimensions for a 2-up booklet: the long edge runs horizontally
    /// so that two portrait pages sit side by side.
    pub fn sheet_dimensions_mm(self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (h, w)
    }
}

/// How a source page is scaled into its half of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Fit page to available space (preserve aspect ratio)
    #[default]
    Fit,
    /// Fill available space (preserve aspect ratio, overflow is clipped)
    Fill,
    /// Place at natural size
    None,
}

/// Sheet margins - printer-safe area around the output sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetMargins {
    pub top_mm: f32,
    pub bottom_mm: f32,
    pub left_mm: f32,
    pub right_mm: f32,
}

impl Default for SheetMargins {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

impl SheetMargins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_mm: f32) -> Self {
        Self {
            top_mm: margin_mm,
            bottom_mm: margin_mm,
            left_mm: margin_mm,
            right_mm: margin_mm,
        }
    }
}

/// Everything the assembler needs to know about the physical output sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSettings {
    pub paper_size: PaperSize,
    pub scaling_mode: ScalingMode,
    pub margins: SheetMargins,
    /// Draw a dashed line where the sheet is folded
    pub fold_line: bool,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::default(),
            scaling_mode: ScalingMode::default(),
            margins: SheetMargins::default(),
            fold_line: false,
        }
    }
}
