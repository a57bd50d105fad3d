//! LLM integration
//!
//! Provides:
//! - An OpenAI-compatible chat completion client
//! - Classification of completion failures
//! - The keyword extraction prompt

mod classify;
mod client;
mod prompt;

pub use classify::CompletionError;
pub use client::{
    parse_completion_body, ChatMessage, CompletionClient, CompletionRequest, HttpCompletionClient,
};
pub use prompt::{build_keyword_prompt, keyword_request, KEYWORD_MAX_TOKENS, KEYWORD_TEMPERATURE};
