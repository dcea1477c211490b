//! Document I/O for booklet assembly

use crate::constants::PARTIAL_FILE_SUFFIX;
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// An opened source document and its pages in reading order
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Wrap an already parsed document
    pub fn from_document(path: impl Into<PathBuf>, document: Document) -> Self {
        // get_pages is keyed by 1-based page number, so values are in order
        let page_ids = document.get_pages().into_values().collect();
        Self {
            path: path.into(),
            document,
            page_ids,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of 1-based page `number`
    pub fn page_id(&self, number: usize) -> Option<ObjectId> {
        number
            .checked_sub(1)
            .and_then(|index| self.page_ids.get(index).copied())
    }
}

/// Open a source document for booklet assembly
pub async fn open_source(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref();
    let document = load_pdf(path)
        .await
        .map_err(|e| BookletError::source_open(path, e))?;
    let source = SourceDocument::from_document(path, document);
    log::info!(
        "Opened {} ({} pages)",
        path.display(),
        source.page_count()
    );
    Ok(source)
}

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a document.
///
/// The bytes go to a `.part` file next to `path` which is renamed over
/// `path` once complete. On failure the partial file is removed, so `path`
/// only ever holds a complete document.
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, BookletError>(writer)
    })
    .await??;

    let partial = partial_path(path);
    let written = match tokio::fs::write(&partial, &bytes).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            log::debug!(
                "Could not remove partial file {}: {}",
                partial.display(),
                cleanup
            );
        }
        return Err(e.into());
    }
    Ok(())
}

/// `booklet.pdf` -> `booklet.pdf.part`
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("booklet"));
    name.push(".");
    name.push(PARTIAL_FILE_SUFFIX);
    path.with_file_name(name)
}
