//! PDF text extraction via `lopdf`.
//!
//! Pages are read in page order and joined with a blank line. Reading stops
//! as soon as the collected text reaches the excerpt bound, so a large
//! reference book costs only the first few pages.

use lopdf::Document;

use super::{truncate_chars, KnowledgebaseError};

/// Separator placed between consecutive pages.
pub const PAGE_BREAK: &str = "\n\n";

/// Extract up to `max_chars` characters of text from an in-memory PDF.
pub fn extract_text(bytes: &[u8], max_chars: usize) -> Result<String, KnowledgebaseError> {
    // lopdf can panic on some malformed streams; treat that like any other
    // extraction failure. The default panic hook still prints the message to
    // stderr; the process hook is left alone since it is global state.
    let pages = std::panic::catch_unwind(|| read_pages(bytes, max_chars))
        .map_err(|_| KnowledgebaseError::Pdf("parser panicked on malformed input".into()))?;

    Ok(join_pages(pages?, max_chars))
}

fn read_pages(bytes: &[u8], max_chars: usize) -> Result<Vec<String>, KnowledgebaseError> {
    let doc = Document::load_mem(bytes).map_err(|e| KnowledgebaseError::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(KnowledgebaseError::Pdf("document has no pages".into()));
    }

    let mut texts = Vec::new();
    let mut collected = 0usize;

    for &page_number in pages.keys() {
        if collected >= max_chars {
            break;
        }
        match doc.extract_text(&[page_number]) {
            Ok(text) => {
                collected += text.chars().count();
                texts.push(text);
            }
            Err(e) => log::debug!("pdf: skipping page {page_number}: {e}"),
        }
    }

    Ok(texts)
}

/// Join page texts with [`PAGE_BREAK`], dropping blank pages, and cap the
/// result at `max_chars` characters.
pub fn join_pages<I>(pages: I, max_chars: usize) -> String
where
    I: IntoIterator<Item = String>,
{
    let joined = pages
        .into_iter()
        .map(|page| page.trim().to_string())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_BREAK);

    truncate_chars(&joined, max_chars).to_string()
}
