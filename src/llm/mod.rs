//! External model layer for the Ottoman converter.
//!
//! This module provides:
//! * [`ModelClient`]: async trait implemented by all model backends.
//! * [`GeminiClient`]: Google Gemini `generateContent` backend (default).
//! * [`OpenAiClient`]: OpenAI-compatible `/v1/chat/completions` backend.
//! * [`PromptBuilder`]: assembles the conversion prompt.
//! * [`ModelError`]: error variants for model calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ottoman_converter::config::AppConfig;
//! use ottoman_converter::llm::{client_from_config, GenerateRequest, ModelClient, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = client_from_config(&config.model);
//!
//!     let prompt = PromptBuilder::new().build("Merhaba dünya", "");
//!     let text = client
//!         .generate(&GenerateRequest {
//!             prompt: &prompt,
//!             model: &config.model.model,
//!             temperature: config.model.temperature,
//!             api_key: "YOUR_KEY",
//!         })
//!         .await
//!         .unwrap();
//!     println!("{}", text);
//! }
//! ```

pub mod client;
pub mod gemini;
pub mod openai;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{client_from_config, GenerateRequest, ModelClient, ModelError};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompt::PromptBuilder;
