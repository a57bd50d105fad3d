//! Keyword normalization
//!
//! Completion output is supposed to be a comma-separated list but often
//! arrives numbered, with Japanese punctuation, or padded with filler words.
//! Normalization turns it into a canonical list usable as tag names.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Shortest keyword kept, in characters
pub const MIN_KEYWORD_CHARS: usize = 2;

/// Longest keyword kept, in characters
pub const MAX_KEYWORD_CHARS: usize = 20;

lazy_static! {
    static ref LIST_MARKER_RE: Regex = Regex::new(r"\d+[.)]?").unwrap();
    static ref JA_PUNCT_RE: Regex = Regex::new(r"[・。、，]").unwrap();
    static ref COMMA_RUN_RE: Regex = Regex::new(r",+").unwrap();
    static ref FILLER_RE: Regex = Regex::new(r"最も重要|具体的な|などの|など").unwrap();
    static ref SEARCH_ENGINE_NAME_RE: Regex = Regex::new(r"検索エンジン名$").unwrap();
    static ref RESULT_PAGE_RE: Regex = Regex::new(r"結果ページ$").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN_RE: Regex = Regex::new(r"-+").unwrap();
}

/// Normalize raw completion text into `kw1,kw2,...`
///
/// An empty result means no usable keyword survived; it is not an error.
pub fn normalize(raw: &str) -> String {
    let keywords = normalize_list(raw);
    tracing::debug!("Normalized {} keywords: {}", keywords.len(), keywords.join(","));
    keywords.join(",")
}

/// Normalize raw completion text into an ordered, deduplicated keyword list
pub fn normalize_list(raw: &str) -> Vec<String> {
    let text = LIST_MARKER_RE.replace_all(raw, ",");
    let text = JA_PUNCT_RE.replace_all(&text, ",");
    let text = COMMA_RUN_RE.replace_all(&text, ",");

    dedup_case_insensitive(text.split(',').filter_map(normalize_token))
}

/// Clean a single keyword; `None` when nothing of acceptable length remains
pub fn normalize_token(token: &str) -> Option<String> {
    let mut current = token.trim().to_string();
    if current.is_empty() {
        return None;
    }

    // Removing one filler can expose another, so run to a fixed point.
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    let len = current.chars().count();
    if (MIN_KEYWORD_CHARS..=MAX_KEYWORD_CHARS).contains(&len) {
        Some(current)
    } else {
        None
    }
}

fn clean_once(token: &str) -> String {
    let t = FILLER_RE.replace_all(token, "");
    let t = SEARCH_ENGINE_NAME_RE.replace(&t, "検索エンジン");
    let t = RESULT_PAGE_RE.replace(&t, "ページ");
    let t = WHITESPACE_RE.replace_all(t.trim(), "-");
    let t = HYPHEN_RUN_RE.replace_all(&t, "-");
    t.trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

/// Keep the first occurrence of each keyword, comparing case-insensitively
pub fn dedup_case_insensitive<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect()
}

/// Split a stored keyword string into its non-empty parts
pub fn split_keywords(stored: &str) -> Vec<&str> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect()
}
