//! Front-end glue shared by the one-shot command and the interactive chat.
//!
//! [`AppContext`] owns the [`Converter`] plus the per-run settings (API key,
//! model options, knowledgebase path) and turns raw user text into a
//! [`ConversionRequest`]. Both presentation adapters go through it, so the
//! conversion logic lives in one place.

pub mod chat;
pub mod command;

use std::path::{Path, PathBuf};

use crate::config::{resolve_api_key, AppConfig, AppPaths, Secrets};
use crate::convert::{ConversionRequest, ConvertError, Converter};
use crate::knowledgebase::{resolve_source, KnowledgebaseLoader};
use crate::llm::{client_from_config, ModelClient};

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Per-run settings taken from the command line; `None`/`false` keeps the
/// configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub no_normalize: bool,
    pub force_ng_final: bool,
    pub kb: Option<PathBuf>,
    pub no_kb: bool,
}

// ---------------------------------------------------------------------------
// RequestOptions
// ---------------------------------------------------------------------------

/// Model and post-processing options applied to every request of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub model: String,
    pub temperature: f32,
    pub normalize: bool,
    pub force_ng_final: bool,
}

impl RequestOptions {
    pub fn resolve(config: &AppConfig, overrides: &Overrides) -> Self {
        Self {
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| config.model.model.clone()),
            temperature: overrides.temperature.unwrap_or(config.model.temperature),
            normalize: config.output.normalize && !overrides.no_normalize,
            force_ng_final: config.output.force_ng_final || overrides.force_ng_final,
        }
    }
}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

pub struct AppContext<C: ModelClient> {
    converter: Converter<C>,
    api_key: String,
    options: RequestOptions,
    kb_path: Option<PathBuf>,
}

impl<C: ModelClient> AppContext<C> {
    /// A missing key is kept as `""`; the converter reports it as a
    /// configuration error on first use.
    pub fn new(
        converter: Converter<C>,
        api_key: Option<String>,
        options: RequestOptions,
        kb_path: Option<PathBuf>,
    ) -> Self {
        Self {
            converter,
            api_key: api_key.unwrap_or_default(),
            options,
            kb_path,
        }
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn kb_path(&self) -> Option<&Path> {
        self.kb_path.as_deref()
    }

    /// Select a knowledgebase; the file is read again on the next request
    /// even when the path is unchanged.
    pub fn set_kb_path(&mut self, kb_path: Option<PathBuf>) {
        self.converter.reload_knowledgebase();
        self.kb_path = kb_path;
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Build the immutable request for `text`.
    pub fn request(&self, text: &str) -> ConversionRequest {
        ConversionRequest::new(text, self.api_key.as_str())
            .with_kb_path(self.kb_path.clone())
            .with_model(self.options.model.as_str())
            .with_temperature(self.options.temperature)
            .with_normalize(self.options.normalize)
            .with_force_ng_final(self.options.force_ng_final)
    }

    pub async fn convert(&self, text: &str) -> Result<String, ConvertError> {
        self.converter.convert(&self.request(text)).await
    }
}

/// Pick the knowledgebase for this run: `--kb`, then the configured default,
/// then the bundled `ottoman.pdf`. `--no-kb` disables all of them.
pub fn resolve_kb_path(config: &AppConfig, overrides: &Overrides) -> Option<PathBuf> {
    if overrides.no_kb {
        return None;
    }

    let bundled = if config.knowledgebase.use_bundled_default {
        AppPaths::bundled_knowledgebase()
    } else {
        None
    };

    resolve_source(
        overrides.kb.as_deref(),
        config.knowledgebase.default_path.as_deref(),
        bundled.as_deref(),
    )
}

/// Assemble the production context: configured backend, resolved key and
/// knowledgebase.
pub fn build_context(
    config: &AppConfig,
    secrets: &Secrets,
    overrides: &Overrides,
) -> AppContext<Box<dyn ModelClient>> {
    let api_key = resolve_api_key(
        overrides.api_key.as_deref(),
        config.model.api_key.as_deref(),
        secrets,
    );
    if api_key.is_none() {
        log::warn!("no API key configured; conversions will be refused");
    }

    let converter = Converter::new(
        client_from_config(&config.model),
        KnowledgebaseLoader::new(config.knowledgebase.max_chars),
    );

    AppContext::new(
        converter,
        api_key,
        RequestOptions::resolve(config, overrides),
        resolve_kb_path(config, overrides),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
