//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ModelProvider
// ---------------------------------------------------------------------------

/// Selects which hosted model API performs the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelProvider {
    /// Google Gemini `generateContent` REST API.
    Gemini,
    /// Any OpenAI-compatible `/v1/chat/completions` endpoint.
    OpenAiCompatible,
}

impl Default for ModelProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

impl ModelProvider {
    /// Base URL used when `[model] base_url` is left out.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAiCompatible => "https://api.openai.com",
        }
    }
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Settings for the external conversion model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Which backend to call.
    pub provider: ModelProvider,
    /// Base URL of the API endpoint, without a trailing path. `None` means
    /// the provider's default host.
    pub base_url: Option<String>,
    /// API key. `None` means "look in secrets.toml / the environment".
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gemini-2.5-pro"`).
    pub model: String,
    /// Sampling temperature (0.0 to 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            base_url: None,
            api_key: None,
            model: "gemini-2.5-pro".into(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

impl ModelConfig {
    /// Endpoint host with any trailing `/` removed.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Post-processing toggles applied to the model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Apply NFKC normalization.
    pub normalize: bool,
    /// Force the NG final glyph when the input ends with "n"/"ng".
    pub force_ng_final: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            force_ng_final: false,
        }
    }
}

// ---------------------------------------------------------------------------
// KnowledgebaseConfig
// ---------------------------------------------------------------------------

/// Where the reference document comes from and how much of it is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgebaseConfig {
    /// Document used when none is given on the command line.
    pub default_path: Option<PathBuf>,
    /// Fall back to `ottoman.pdf` next to the executable.
    pub use_bundled_default: bool,
    /// Upper bound on the excerpt length, in characters.
    pub max_chars: usize,
}

impl Default for KnowledgebaseConfig {
    fn default() -> Self {
        Self {
            default_path: None,
            use_bundled_default: true,
            max_chars: 6_000,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use ottoman_converter::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External model settings.
    pub model: ModelConfig,
    /// Output post-processing.
    pub output: OutputConfig,
    /// Knowledgebase source and excerpt bound.
    pub knowledgebase: KnowledgebaseConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
