//! Book record domain model.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

/// fr-FR short date, as shown on each card ("Ajouté le 19/10/2026").
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[day]/[month]/[year]");

/// Longest summary a record may hold, in characters.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Room for the `...` a truncated lookup description ends with.
const SUMMARY_ELLIPSIS_CHARS: usize = 3;

/// Reasons a draft cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("comment is required")]
    MissingComment,

    #[error("rating is required")]
    MissingRating,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("summary must be at most {SUMMARY_MAX_CHARS} characters, got {0}")]
    SummaryTooLong(usize),
}

/// Star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (1..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A book as submitted by the form, before the store assigns an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub comment: String,
    pub rating: Rating,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, comment: impl Into<String>, rating: Rating) -> Self {
        Self {
            title: title.into(),
            author: None,
            summary: None,
            comment: comment.into(),
            rating,
            cover_url: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    /// Trim every text field and collapse blank optional fields to `None`.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: non_blank(self.author),
            summary: non_blank(self.summary),
            comment: self.comment.trim().to_string(),
            rating: self.rating,
            cover_url: non_blank(self.cover_url),
        }
    }

    /// Check the fields a persisted record can never lack.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.comment.trim().is_empty() {
            return Err(ValidationError::MissingComment);
        }
        if let Some(summary) = &self.summary {
            let chars = summary.chars().count();
            if chars > SUMMARY_MAX_CHARS + SUMMARY_ELLIPSIS_CHARS {
                return Err(ValidationError::SummaryTooLong(chars));
            }
        }
        Ok(())
    }
}

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub comment: String,
    pub rating: Rating,
    #[serde(default)]
    pub cover_url: Option<String>,
    /// Locale-formatted creation date, fixed at write time.
    pub date: String,
    /// Store-assigned ordering timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl BookRecord {
    pub fn from_draft(
        id: impl Into<String>,
        draft: NewBook,
        date: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            author: draft.author,
            summary: draft.summary,
            comment: draft.comment,
            rating: draft.rating,
            cover_url: draft.cover_url,
            date: date.into(),
            created_at,
        }
    }
}

/// Format a timestamp the way cards display the creation date.
pub fn format_date(at: OffsetDateTime) -> String {
    at.format(DATE_FORMAT)
        .unwrap_or_else(|_| format!("{:02}/{:02}/{}", at.day(), at.month() as u8, at.year()))
}

/// Today's date in the host's local offset, falling back to UTC.
pub fn today() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_date(now)
}

/// Generate a fresh document identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
