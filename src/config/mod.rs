//! Configuration module for the Ottoman converter.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the model,
//! output post-processing and knowledgebase, `AppPaths` for cross-platform
//! config directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod secrets;
pub mod settings;

pub use paths::AppPaths;
pub use secrets::{resolve_api_key, Secrets};
pub use settings::{AppConfig, KnowledgebaseConfig, ModelConfig, ModelProvider, OutputConfig};
