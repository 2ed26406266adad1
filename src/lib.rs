//! Modern Turkish → Ottoman Turkish (Arabic script) converter.
//!
//! The transliteration is done by a hosted language model; this crate
//! assembles the prompt, optionally grounds it with a knowledgebase excerpt,
//! calls the model and post-processes its answer.
//!
//! * [`knowledgebase`]: `.txt` / `.pdf` / `.docx` excerpt extraction.
//! * [`llm`]: prompt builder and model backends.
//! * [`convert`]: the conversion service and output normalizer.
//! * [`session`]: chat history.
//! * [`config`]: settings, paths and secrets.
//! * [`app`]: one-shot and interactive front ends.

pub mod app;
pub mod config;
pub mod convert;
pub mod knowledgebase;
pub mod llm;
pub mod session;
