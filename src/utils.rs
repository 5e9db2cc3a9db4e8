//! 공통 유틸리티 함수들
//!
//! Text helpers shared by the extraction rules and the price normalizer.

/// Collapse every run of whitespace (including newlines) to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters
///
/// Counts Unicode scalar values so multi-byte text is never split mid-character.
/// With `ellipsis`, a truncated result ends in `...` and still fits the limit.
pub fn truncate_chars(text: &str, max_chars: usize, ellipsis: bool) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    if ellipsis && max_chars > 3 {
        let kept: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", kept.trim_end())
    } else {
        text.chars().take(max_chars).collect()
    }
}
