//! DOCX text extraction.
//!
//! A `.docx` file is a ZIP container; the body lives in `word/document.xml`.
//! Each `w:p` paragraph becomes one line built from its `w:t` text runs.

use std::io::{Read, Seek};

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::KnowledgebaseError;

/// Archive member holding the main document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// WordprocessingML main namespace. DrawingML text (`a:p`, `a:t`) inside
/// shapes is not part of the body text.
const WORDML_NS: &[u8] = b"http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Markup bytes read per character of excerpt.
const XML_BYTES_PER_CHAR: u64 = 256;

/// Smallest read bound, so short excerpts still see a whole first page.
const MIN_XML_BYTES: u64 = 4 * 1024 * 1024;

/// Extract paragraph text from a DOCX container.
///
/// At most `max(max_chars * 256, 4 MiB)` bytes of `word/document.xml` are
/// decompressed.
pub fn extract_text<R: Read + Seek>(
    reader: R,
    max_chars: usize,
) -> Result<String, KnowledgebaseError> {
    let byte_limit = (max_chars as u64)
        .saturating_mul(XML_BYTES_PER_CHAR)
        .max(MIN_XML_BYTES);
    read_document(reader, byte_limit)
}

fn read_document<R: Read + Seek>(
    reader: R,
    byte_limit: u64,
) -> Result<String, KnowledgebaseError> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| KnowledgebaseError::Docx(e.to_string()))?;

    let mut bytes = Vec::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| KnowledgebaseError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .take(byte_limit)
        .read_to_end(&mut bytes)?;

    let truncated = bytes.len() as u64 >= byte_limit;
    if truncated {
        log::debug!("docx: {DOCUMENT_PART} cut at {byte_limit} bytes");
    }

    parse_paragraphs(&String::from_utf8_lossy(&bytes), truncated)
}

/// Collect non-empty paragraphs of a WordprocessingML body, one per line.
///
/// A paragraph nested in another one (text boxes) is emitted on its own
/// line before the paragraph that contains it.
pub fn paragraphs_from_xml(xml: &str) -> Result<String, KnowledgebaseError> {
    parse_paragraphs(xml, false)
}

/// With `truncated` set, a parse error is taken as the end of the input and
/// the paragraphs closed so far are returned.
fn parse_paragraphs(xml: &str, truncated: bool) -> Result<String, KnowledgebaseError> {
    let mut reader = NsReader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut text_depth = 0usize;

    loop {
        let position = reader.buffer_position();
        let (ns, event) = match reader.read_resolved_event() {
            Ok(resolved) => resolved,
            Err(_) if truncated => break,
            Err(e) => {
                return Err(KnowledgebaseError::Docx(format!(
                    "malformed XML near byte {position}: {e}"
                )))
            }
        };
        let in_wordml = matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == WORDML_NS);

        match event {
            Event::Start(e) if in_wordml => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" => text_depth += 1,
                _ => {}
            },
            Event::End(e) if in_wordml => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        let paragraph = paragraph.trim();
                        if !paragraph.is_empty() {
                            paragraphs.push(paragraph.to_string());
                        }
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => text_depth = text_depth.saturating_sub(1),
                _ => {}
            },
            // Tab stops in paragraph properties share the `tab` name; only
            // honour the ones inside a run.
            Event::Empty(e) if in_wordml && run_depth > 0 => {
                let current = open.last_mut();
                match (e.local_name().as_ref(), current) {
                    (b"tab", Some(current)) => current.push('\t'),
                    (b"br" | b"cr", Some(current)) => current.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if text_depth > 0 => {
                let text = match t.unescape() {
                    Ok(text) => text,
                    Err(_) if truncated => break,
                    Err(e) => return Err(KnowledgebaseError::Docx(e.to_string())),
                };
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
