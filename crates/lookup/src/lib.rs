//! Metadata lookup: turns a free-text title/author query into suggested
//! summary, author and cover image for the book form.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod clean;
pub mod google;

pub use google::{GoogleBooksClient, GoogleBooksConfig};

/// Errors raised by a metadata lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// A search needs at least a title
    #[error("a title is required to search")]
    MissingTitle,

    /// The search service could not be reached or answered badly
    #[error("metadata lookup unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Unavailable(e.to_string())
    }
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    title: String,
    author: Option<String>,
}

impl LookupQuery {
    pub fn new(title: &str, author: Option<&str>) -> Result<Self, LookupError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LookupError::MissingTitle);
        }

        Ok(Self {
            title: title.to_string(),
            author: author
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Search expression: the title, narrowed by `inauthor:` when an author
    /// is known.
    pub fn expression(&self) -> String {
        match &self.author {
            Some(author) => format!("{}+inauthor:{}", self.title, author),
            None => self.title.clone(),
        }
    }
}

/// Best-effort field values extracted from the top search match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Markup-free description, at most 500 characters plus an ellipsis
    pub summary: Option<String>,
    /// Secure-scheme cover image URL
    pub cover_url: Option<String>,
    /// Authors joined with ", "
    pub author: Option<String>,
}

/// Result of a successful search round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Suggestion),
    NotFound,
}

/// Read-only book metadata search.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn search(&self, query: &LookupQuery) -> Result<LookupOutcome, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_requires_title() {
        assert!(matches!(
            LookupQuery::new("   ", Some("Hugo")),
            Err(LookupError::MissingTitle)
        ));
    }

    #[test]
    fn expression_adds_author_filter() {
        let query = LookupQuery::new(" Les Misérables ", Some(" Victor Hugo ")).unwrap();
        assert_eq!(query.expression(), "Les Misérables+inauthor:Victor Hugo");

        let query = LookupQuery::new("Le Petit Prince", Some("")).unwrap();
        assert_eq!(query.expression(), "Le Petit Prince");
        assert_eq!(query.author(), None);
    }
}
