//! Document analysis over an OpenAI-compatible chat API.
//!
//! The analyzer builds Russian-language prompts per operation, asks for a
//! JSON object where the result is structured, and folds every failure into
//! a response envelope with `success: false`. The chat boundary is a trait
//! so tests run against a scripted model.

pub mod analyzer;
pub mod client;
pub mod handlers;
pub mod models;

pub use analyzer::{AiAnalyzer, AnalyzeKind};
pub use client::{ChatCompletion, ChatModel, ChatRequest, OpenAiChat};

use thiserror::Error;

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AiError {
    /// No API key was configured; the analyzer is disabled.
    #[error("OpenAI API ключ не настроен")]
    NotConfigured,
    #[error("chat API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat API returned no completion choices")]
    EmptyResponse,
    #[error("модель вернула некорректный JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
