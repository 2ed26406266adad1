//! The conversion service: knowledgebase → prompt → model → post-processing.
//!
//! [`Converter::convert`] is the one entry point both front ends use. It
//! validates the [`ConversionRequest`] before any network traffic, degrades
//! gracefully when the knowledgebase cannot be read, and reports model
//! failures as [`ConvertError::ExternalService`] instead of returning a
//! partial result.

pub mod normalize;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::knowledgebase::KnowledgebaseLoader;
use crate::llm::{GenerateRequest, ModelClient, ModelError, PromptBuilder};

pub use normalize::{ends_with_ng, nfkc, OutputNormalizer, NG_FINAL_GLYPH};

// ---------------------------------------------------------------------------
// ConvertError
// ---------------------------------------------------------------------------

/// Failures visible to the user. None of them are fatal to the process.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Missing API key; raised before any external call.
    #[error("no API key configured: pass --api-key, set GOOGLE_API_KEY, or add it to secrets.toml")]
    Configuration,

    /// Empty or blank input text.
    #[error("nothing to convert: the input text is empty")]
    Input,

    /// The model call failed (auth, network, quota, malformed response).
    #[error("conversion failed: {0}")]
    ExternalService(#[from] ModelError),
}

// ---------------------------------------------------------------------------
// ConversionRequest
// ---------------------------------------------------------------------------

/// One conversion, immutable once built.
///
/// ```rust
/// use ottoman_converter::convert::ConversionRequest;
///
/// let request = ConversionRequest::new("Merhaba dünya", "key")
///     .with_model("gemini-2.5-pro")
///     .with_temperature(1.7)
///     .with_force_ng_final(true);
/// assert_eq!(request.temperature(), 1.0);
/// assert!(request.normalize());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    text: String,
    kb_path: Option<PathBuf>,
    api_key: String,
    model_name: String,
    temperature: f32,
    normalize: bool,
    force_ng_final: bool,
}

impl ConversionRequest {
    /// Defaults: `gemini-2.5-pro`, temperature 0.0, NFKC on, NG override
    /// off, no knowledgebase.
    pub fn new(text: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kb_path: None,
            api_key: api_key.into(),
            model_name: "gemini-2.5-pro".into(),
            temperature: 0.0,
            normalize: true,
            force_ng_final: false,
        }
    }

    pub fn with_kb_path(mut self, kb_path: Option<PathBuf>) -> Self {
        self.kb_path = kb_path;
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Clamped into `[0.0, 1.0]`; NaN becomes 0.0.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = if temperature.is_nan() {
            0.0
        } else {
            temperature.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_force_ng_final(mut self, force_ng_final: bool) -> Self {
        self.force_ng_final = force_ng_final;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kb_path(&self) -> Option<&Path> {
        self.kb_path.as_deref()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn force_ng_final(&self) -> bool {
        self.force_ng_final
    }
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Wires the knowledgebase loader, prompt builder, model client and output
/// normalizer together.
///
/// The excerpt of the last knowledgebase used is kept until a request names
/// a different file or [`Converter::reload_knowledgebase`] is called.
pub struct Converter<C: ModelClient> {
    client: C,
    loader: KnowledgebaseLoader,
    prompt_builder: PromptBuilder,
    excerpt: Mutex<Option<(PathBuf, String)>>,
}

impl<C: ModelClient> Converter<C> {
    pub fn new(client: C, loader: KnowledgebaseLoader) -> Self {
        Self {
            client,
            loader,
            prompt_builder: PromptBuilder::new(),
            excerpt: Mutex::new(None),
        }
    }

    pub fn loader(&self) -> &KnowledgebaseLoader {
        &self.loader
    }

    /// Drop the cached excerpt; the next request reads its file again.
    pub fn reload_knowledgebase(&self) {
        if let Ok(mut cached) = self.excerpt.lock() {
            *cached = None;
        }
    }

    fn excerpt_for(&self, path: &Path) -> String {
        let mut cached = match self.excerpt.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match cached.as_ref() {
            Some((cached_path, excerpt)) if cached_path == path => excerpt.clone(),
            _ => {
                let excerpt = self.loader.load(path);
                *cached = Some((path.to_path_buf(), excerpt.clone()));
                excerpt
            }
        }
    }

    /// Convert the request's Turkish text to Ottoman Turkish.
    ///
    /// # Errors
    ///
    /// * [`ConvertError::Configuration`]: blank API key; nothing is sent.
    /// * [`ConvertError::Input`]: blank text; nothing is sent.
    /// * [`ConvertError::ExternalService`]: the model call failed.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<String, ConvertError> {
        if request.api_key().trim().is_empty() {
            return Err(ConvertError::Configuration);
        }
        if request.text().trim().is_empty() {
            return Err(ConvertError::Input);
        }

        let excerpt = request
            .kb_path()
            .map(|path| self.excerpt_for(path))
            .unwrap_or_default();

        let prompt = self.prompt_builder.build(request.text(), &excerpt);
        log::debug!(
            "convert: prompt {} chars (knowledgebase {} chars)",
            prompt.chars().count(),
            excerpt.chars().count()
        );

        let raw = self
            .client
            .generate(&GenerateRequest {
                prompt: &prompt,
                model: request.model_name(),
                temperature: request.temperature(),
                api_key: request.api_key(),
            })
            .await?;

        let output = OutputNormalizer::new(request.normalize(), request.force_ng_final())
            .apply(request.text(), raw.trim());

        log::info!(
            "convert: {} input chars -> {} output chars",
            request.text().chars().count(),
            output.chars().count()
        );

        Ok(output)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed answer and records every request it receives.
    struct Recording {
        answer: String,
        calls: Mutex<Vec<(String, String, f32, String)>>,
    }

    impl Recording {
        fn new(answer: &str) -> Self {
            Self {
                answer: answer.into(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.0.clone())
                .collect()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for Recording {
        async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push((
                request.prompt.to_string(),
                request.model.to_string(),
                request.temperature,
                request.api_key.to_string(),
            ));
            Ok(self.answer.clone())
        }
    }

    /// Always fails.
    struct Failing;

    #[async_trait]
    impl ModelClient for Failing {
        async fn generate(&self, _request: &GenerateRequest<'_>) -> Result<String, ModelError> {
            Err(ModelError::Api {
                status: 403,
                message: "API key not valid".into(),
            })
        }
    }

    fn converter(answer: &str) -> Converter<Recording> {
        Converter::new(Recording::new(answer), KnowledgebaseLoader::new(6_000))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_api_key_is_configuration_error() {
        let conv = converter("مرحبا");
        let err = conv
            .convert(&ConversionRequest::new("Merhaba", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::Configuration));
        assert_eq!(conv.client.call_count(), 0, "client must not be called");
    }

    #[tokio::test]
    async fn blank_api_key_is_configuration_error() {
        let conv = converter("مرحبا");
        let err = conv
            .convert(&ConversionRequest::new("Merhaba", "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Configuration));
    }

    #[tokio::test]
    async fn blank_text_is_input_error() {
        let conv = converter("مرحبا");
        let err = conv
            .convert(&ConversionRequest::new(" \n ", "key"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::Input));
        assert_eq!(conv.client.call_count(), 0);
    }

    // -----------------------------------------------------------------------
    // Happy path
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn merhaba_dunya_without_knowledgebase() {
        let conv = converter("مرحبا دنیا");
        let request = ConversionRequest::new("Merhaba dünya", "key")
            .with_normalize(true)
            .with_force_ng_final(false);

        let out = conv.convert(&request).await.unwrap();

        assert_eq!(out, "مرحبا دنیا");
        let prompts = conv.client.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Merhaba dünya"));
        assert!(!prompts[0].contains(crate::llm::prompt::REFERENCE_LABEL));
    }

    #[tokio::test]
    async fn forwards_model_temperature_and_key() {
        let conv = converter("كتاب");
        let request = ConversionRequest::new("kitap", "secret")
            .with_model("gemini-2.5-flash")
            .with_temperature(0.35);

        conv.convert(&request).await.unwrap();

        let calls = conv.client.calls.lock().unwrap();
        assert_eq!(calls[0].1, "gemini-2.5-flash");
        assert_eq!(calls[0].2, 0.35);
        assert_eq!(calls[0].3, "secret");
    }

    #[tokio::test]
    async fn output_is_trimmed_and_normalized() {
        let conv = converter("\n\u{FE8F}\u{FEFB}  \n");
        let out = conv
            .convert(&ConversionRequest::new("kitap", "key"))
            .await
            .unwrap();
        assert_eq!(out, "\u{0628}\u{0644}\u{0627}");
    }

    #[tokio::test]
    async fn force_ng_final_applies_to_n_endings() {
        let conv = converter("بن\n");
        let request = ConversionRequest::new("Ben", "key").with_force_ng_final(true);

        let out = conv.convert(&request).await.unwrap();
        assert_eq!(out, "ب\u{FBD3}");
    }

    #[tokio::test]
    async fn force_ng_final_ignored_for_other_endings() {
        let conv = converter("مرحبا دنیا");
        let with = ConversionRequest::new("Merhaba dünya", "key").with_force_ng_final(true);
        let without = with.clone().with_force_ng_final(false);

        assert_eq!(
            conv.convert(&with).await.unwrap(),
            conv.convert(&without).await.unwrap()
        );
    }

    // -----------------------------------------------------------------------
    // Knowledgebase
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn knowledgebase_excerpt_lands_in_prompt() {
        let dir = tempdir().expect("temp dir");
        let kb = dir.path().join("kb.txt");
        std::fs::write(&kb, "Sağır kef: ڭ").expect("write");

        let conv = converter("دڭز");
        let request = ConversionRequest::new("deniz", "key").with_kb_path(Some(kb));
        conv.convert(&request).await.unwrap();

        let prompt = &conv.client.prompts()[0];
        assert!(prompt.contains(crate::llm::prompt::REFERENCE_LABEL));
        assert!(prompt.contains("Sağır kef: ڭ"));
    }

    #[tokio::test]
    async fn knowledgebase_is_read_once_per_file() {
        let dir = tempdir().expect("temp dir");
        let kb = dir.path().join("kb.txt");
        let other = dir.path().join("other.txt");
        std::fs::write(&kb, "ilk sürüm").expect("write");
        std::fs::write(&other, "başka belge").expect("write");

        let conv = converter("دڭز");
        let request = ConversionRequest::new("deniz", "key").with_kb_path(Some(kb.clone()));
        conv.convert(&request).await.unwrap();

        // A change on disk is not seen while the same file stays selected.
        std::fs::write(&kb, "ikinci sürüm").expect("rewrite");
        conv.convert(&request).await.unwrap();

        conv.convert(&request.clone().with_kb_path(Some(other))).await.unwrap();

        conv.reload_knowledgebase();
        conv.convert(&request).await.unwrap();

        let prompts = conv.client.prompts();
        assert!(prompts[0].contains("ilk sürüm"));
        assert!(prompts[1].contains("ilk sürüm"));
        assert!(prompts[2].contains("başka belge"));
        assert!(prompts[3].contains("ikinci sürüm"));
    }

    #[tokio::test]
    async fn unreadable_knowledgebase_does_not_abort() {
        let dir = tempdir().expect("temp dir");
        let kb = dir.path().join("kb.pdf");
        std::fs::write(&kb, b"garbage").expect("write");

        let conv = converter("دنیا");
        let request = ConversionRequest::new("dünya", "key").with_kb_path(Some(kb));

        assert_eq!(conv.convert(&request).await.unwrap(), "دنیا");
        assert!(!conv.client.prompts()[0].contains(crate::llm::prompt::REFERENCE_LABEL));
    }

    // -----------------------------------------------------------------------
    // Failures
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn model_failure_is_external_service_error() {
        let conv = Converter::new(Failing, KnowledgebaseLoader::new(100));
        let err = conv
            .convert(&ConversionRequest::new("Merhaba", "bad-key"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::ExternalService(ModelError::Api { status: 403, .. })
        ));
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn boxed_client_works() {
        let client: Box<dyn ModelClient> = Box::new(Recording::new("كتاب"));
        let conv = Converter::new(client, KnowledgebaseLoader::new(100));
        let out = conv
            .convert(&ConversionRequest::new("kitap", "key"))
            .await
            .unwrap();
        assert_eq!(out, "كتاب");
    }

    // -----------------------------------------------------------------------
    // ConversionRequest
    // -----------------------------------------------------------------------

    #[test]
    fn temperature_is_clamped() {
        assert_eq!(ConversionRequest::new("a", "k").with_temperature(-0.5).temperature(), 0.0);
        assert_eq!(ConversionRequest::new("a", "k").with_temperature(0.5).temperature(), 0.5);
        assert_eq!(ConversionRequest::new("a", "k").with_temperature(f32::NAN).temperature(), 0.0);
    }

    #[test]
    fn request_defaults() {
        let request = ConversionRequest::new("a", "k");
        assert_eq!(request.model_name(), "gemini-2.5-pro");
        assert_eq!(request.temperature(), 0.0);
        assert!(request.normalize());
        assert!(!request.force_ng_final());
        assert!(request.kb_path().is_none());
    }
}
