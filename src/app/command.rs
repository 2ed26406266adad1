//! One-shot command adapter: convert a single text and print the result.

use std::io::Read;

use anyhow::{Context, Result};

use super::AppContext;
use crate::convert::ConvertError;
use crate::llm::ModelClient;

/// The text to convert: the positional argument, or all of `stdin` when the
/// argument is absent.
pub fn read_text(arg: Option<String>, mut stdin: impl Read) -> Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read text from stdin")?;
            Ok(text)
        }
    }
}

/// Convert `text` once.
pub async fn convert_once<C: ModelClient>(
    ctx: &AppContext<C>,
    text: &str,
) -> Result<String, ConvertError> {
    if let Some(kb) = ctx.kb_path() {
        log::info!("knowledgebase: {}", kb.display());
    }
    ctx.convert(text).await
}
