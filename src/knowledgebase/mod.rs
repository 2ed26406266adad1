//! Knowledgebase ingestion: turns a reference document into a bounded plain
//! text excerpt for the conversion prompt.
//!
//! * [`DocumentKind`]: classifies a file by extension (`.txt`, `.pdf`, `.docx`).
//! * [`KnowledgebaseLoader`]: extracts and caps the text.
//! * [`resolve_source`]: picks the explicit, configured or bundled document.
//!
//! A knowledgebase is an aid, not a requirement: [`KnowledgebaseLoader::load`]
//! never fails, it logs the problem and returns an empty excerpt.

pub mod docx;
pub mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// KnowledgebaseError
// ---------------------------------------------------------------------------

/// Reasons a knowledgebase document could not be read.
#[derive(Debug, Error)]
pub enum KnowledgebaseError {
    /// Extension is not one of `txt`, `pdf`, `docx`.
    #[error("unsupported knowledgebase type: {}", .0.display())]
    UnsupportedType(PathBuf),

    #[error("cannot read knowledgebase file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot extract PDF text: {0}")]
    Pdf(String),

    #[error("cannot extract DOCX text: {0}")]
    Docx(String),
}

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// Supported knowledgebase formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classify by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// KnowledgebaseLoader
// ---------------------------------------------------------------------------

/// Extracts a capped plain-text excerpt from a knowledgebase document.
///
/// # Example
/// ```rust,no_run
/// use ottoman_converter::knowledgebase::KnowledgebaseLoader;
///
/// let loader = KnowledgebaseLoader::new(6_000);
/// let excerpt = loader.load(std::path::Path::new("ottoman.pdf"));
/// // Empty when the file is missing or unreadable.
/// println!("{} chars of reference material", excerpt.chars().count());
/// ```
#[derive(Debug, Clone)]
pub struct KnowledgebaseLoader {
    max_chars: usize,
}

impl KnowledgebaseLoader {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Extract the excerpt, reporting why extraction failed.
    pub fn extract(&self, path: &Path) -> Result<String, KnowledgebaseError> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| KnowledgebaseError::UnsupportedType(path.to_path_buf()))?;

        let text = match kind {
            DocumentKind::PlainText => {
                let bytes = std::fs::read(path)?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            DocumentKind::Pdf => pdf::extract_text(&std::fs::read(path)?, self.max_chars)?,
            DocumentKind::Docx => docx::extract_text(std::fs::File::open(path)?, self.max_chars)?,
        };

        Ok(truncate_chars(text.trim(), self.max_chars).to_string())
    }

    /// Extract the excerpt, degrading to `""` on any failure.
    pub fn load(&self, path: &Path) -> String {
        match self.extract(path) {
            Ok(excerpt) => {
                log::debug!(
                    "knowledgebase: {} chars from {}",
                    excerpt.chars().count(),
                    path.display()
                );
                excerpt
            }
            Err(e) => {
                log::warn!("knowledgebase unavailable, continuing without it: {e}");
                String::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Source resolution
// ---------------------------------------------------------------------------

/// Pick the knowledgebase document for this run.
///
/// Candidates are tried in order: the explicitly supplied file, the
/// configured default, then the bundled default. The first one that exists
/// as a regular file wins.
pub fn resolve_source(
    explicit: Option<&Path>,
    configured_default: Option<&Path>,
    bundled_default: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        log::warn!("knowledgebase file not found: {}", path.display());
    }

    [configured_default, bundled_default]
        .into_iter()
        .flatten()
        .find(|path| path.is_file())
        .map(|path| {
            log::info!("using default knowledgebase: {}", path.display());
            path.to_path_buf()
        })
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
