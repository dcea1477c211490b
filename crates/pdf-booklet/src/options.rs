use crate::constants::{DEFAULT_SHEETS_PER_SIGNATURE, MAX_SHEETS_PER_SIGNATURE};
use crate::plan::SignatureConfig;
use crate::range::PageRange;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Booklet configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletOptions {
    // Input and output
    pub input_file: PathBuf,
    pub output_file: PathBuf,

    // Page selection; `None` means the start or end of the source
    pub first_page: Option<usize>,
    pub last_page: Option<usize>,

    // Folding
    pub sheets_per_signature: usize,
    pub rotate_back_side: bool,

    // Output sheet
    pub paper_size: PaperSize,
    pub scaling_mode: ScalingMode,
    pub sheet_margins: SheetMargins,
    pub fold_line: bool,
}

impl Default for BookletOptions {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_file: PathBuf::new(),
            first_page: None,
            last_page: None,
            sheets_per_signature: DEFAULT_SHEETS_PER_SIGNATURE,
            rotate_back_side: false,
            paper_size: PaperSize::default(),
            scaling_mode: ScalingMode::default(),
            sheet_margins: SheetMargins::default(),
            fold_line: false,
        }
    }
}

impl BookletOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookletError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookletError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options that do not depend on the source document
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(BookletError::Config("No input file specified".to_string()));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(BookletError::Config("No output file specified".to_string()));
        }
        if self.input_file == self.output_file {
            return Err(BookletError::Config(
                "Output file would overwrite the input file".to_string(),
            ));
        }

        self.signature_config()?;

        if let (Some(first), Some(last)) = (self.first_page, self.last_page) {
            PageRange::new(first, last)?;
        } else if self.first_page == Some(0) || self.last_page == Some(0) {
            return Err(BookletError::InvalidRange(
                "page numbers start at 1".to_string(),
            ));
        }

        let margins = &self.sheet_margins;
        if [
            margins.top_mm,
            margins.bottom_mm,
            margins.left_mm,
            margins.right_mm,
        ]
        .iter()
        .any(|m| !m.is_finite() || *m < 0.0)
        {
            return Err(BookletError::Config(
                "Sheet margins must be zero or positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Signature config for these options, limited to
    /// [`MAX_SHEETS_PER_SIGNATURE`] sheets
    pub fn signature_config(&self) -> Result<SignatureConfig> {
        if self.sheets_per_signature > MAX_SHEETS_PER_SIGNATURE {
            return Err(BookletError::InvalidRange(format!(
                "at most {} sheets per signature, got {}",
                MAX_SHEETS_PER_SIGNATURE, self.sheets_per_signature
            )));
        }
        SignatureConfig::new(self.sheets_per_signature)
    }

    /// Resolve the selected pages against a source with `page_count` pages.
    ///
    /// Missing ends default to the start and end of the source. A last page
    /// beyond the source is pulled back to the final page.
    pub fn resolve_range(&self, page_count: usize) -> Result<PageRange> {
        if page_count == 0 {
            return Err(BookletError::NoPages);
        }

        let first = self.first_page.unwrap_or(1);
        let last = self.last_page.unwrap_or(page_count);
        let range = PageRange::new(first, last)?;

        let bounded = range.bounded_by(page_count)?;
        if bounded != range {
            log::warn!(
                "Last page {} is past the end of the source, using {}",
                last,
                bounded.last()
            );
        }
        Ok(bounded)
    }

    pub fn sheet_settings(&self) -> SheetSettings {
        SheetSettings {
            paper_size: self.paper_size,
            scaling_mode: self.scaling_mode,
            margins: self.sheet_margins,
            fold_line: self.fold_line,
        }
    }
}
