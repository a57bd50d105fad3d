//! Content extraction
//!
//! Reduces a content item to the plain-text excerpt sent to the model.

use crate::db::ContentItem;
use lazy_static::lazy_static;
use regex::Regex;

/// Maximum excerpt length in characters
pub const EXCERPT_MAX_CHARS: usize = 800;

/// Item type that gets media-specific extraction
pub const ATTACHMENT_TYPE: &str = "attachment";

lazy_static! {
    static ref SCRIPT_STYLE_RE: Regex =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Build the excerpt for an item: title, then body (or media fields), as plain text
pub fn extract_text(item: &ContentItem) -> String {
    let mut content = String::new();
    content.push_str(&item.title);
    content.push_str("\n\n");

    if item.item_type == ATTACHMENT_TYPE {
        for field in [
            item.filename.as_deref(),
            Some(item.body.as_str()),
            item.alt_text.as_deref(),
            item.excerpt.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        {
            content.push_str(field);
            content.push(' ');
        }
    } else {
        content.push_str(&item.body);
    }

    let text = plain_text(&content);
    truncate_chars(&text, EXCERPT_MAX_CHARS)
}

/// Strip markup and collapse whitespace
pub fn plain_text(html: &str) -> String {
    let text = SCRIPT_STYLE_RE.replace_all(html, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Truncate to at most `max` characters, never splitting a character
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
