//! Parsing error types
//!
//! Two families: configuration errors raised while compiling selector and
//! regex tables, and page errors raised when a fetched document cannot be
//! treated as a product page at all. A field that simply isn't on the page is
//! not an error.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("Invalid regex pattern for {field}: {pattern} - {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    #[error("Empty document returned by {url}")]
    EmptyDocument { url: String },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(field: &str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid regex error
    pub fn invalid_pattern(field: &str, pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            field: field.to_string(),
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_names_the_url() {
        let err = ParsingError::EmptyDocument { url: "https://a.com".into() };
        assert_eq!(err.to_string(), "Empty document returned by https://a.com");
    }

    #[test]
    fn test_display_names_the_field() {
        let err = ParsingError::invalid_pattern("price", "(", "unclosed group");
        assert_eq!(
            err.to_string(),
            "Invalid regex pattern for price: ( - unclosed group"
        );
    }
}
