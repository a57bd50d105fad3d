//! Keyword extraction prompt

use super::{ChatMessage, CompletionRequest};

/// Completion budget for a keyword list
pub const KEYWORD_MAX_TOKENS: u32 = 300;

pub const KEYWORD_TEMPERATURE: f32 = 0.7;

/// Build the prompt asking for `keyword_count` comma-separated keywords
pub fn build_keyword_prompt(excerpt: &str, keyword_count: u32) -> String {
    format!(
        "Extract {} SEO keywords from the following text. \
         Answer with a comma-separated list only:\n{}",
        keyword_count, excerpt
    )
}

/// Full completion request for one model
pub fn keyword_request(model: &str, excerpt: &str, keyword_count: u32) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(build_keyword_prompt(
            excerpt,
            keyword_count,
        ))],
        max_tokens: KEYWORD_MAX_TOKENS,
        temperature: KEYWORD_TEMPERATURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_request_shape() {
        let request = keyword_request("tiny/a", "Rust and SQLite", 8);
        assert_eq!(request.model, "tiny/a");
        assert_eq!(request.max_tokens, 300);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.messages[0].content.contains("Extract 8 SEO keywords"));
        assert!(request.messages[0].content.ends_with("\nRust and SQLite"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("temperature").is_some());
    }
}
