use biblio_store::{NewBook, Rating, ValidationError};
use serde::{Deserialize, Serialize};

use super::form::FormState;

/// Request model for `POST /api/books`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub comment: String,
    /// Whole stars, 1 to 5
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl CreateBook {
    /// Validate into a draft the store accepts.
    pub fn into_draft(self) -> Result<NewBook, ValidationError> {
        let rating = Rating::new(self.rating.ok_or(ValidationError::MissingRating)?)?;

        let draft = NewBook {
            title: self.title,
            author: self.author,
            summary: self.summary,
            comment: self.comment,
            rating,
            cover_url: self.cover_url,
        }
        .normalized();

        draft.validate()?;
        Ok(draft)
    }
}

/// URL-encoded body posted by the page form.
///
/// Every field is optional on the wire: an unchecked rating is simply absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub form_id: String,
}

impl From<BookForm> for FormState {
    fn from(form: BookForm) -> Self {
        Self {
            title: form.title,
            author: form.author,
            summary: form.summary,
            comment: form.comment,
            rating: form.rating.and_then(|r| r.trim().parse().ok()),
            cover_url: form.cover_url,
            form_id: form.form_id,
        }
    }
}

/// `notice` value set by the redirect that follows a successful add.
pub const NOTICE_ADDED: &str = "added";

/// Query string for `GET /`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    pub notice: Option<String>,
}

/// Query string for `GET /api/books/lookup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupParams {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_book_requires_rating() {
        let body: CreateBook = serde_json::from_str(r#"{"title":"Dune","comment":"Culte"}"#).unwrap();
        assert_eq!(body.into_draft(), Err(ValidationError::MissingRating));
    }

    #[test]
    fn create_book_normalizes_blank_optionals() {
        let body: CreateBook = serde_json::from_str(
            r#"{"title":" Dune ","author":"","comment":"Culte","rating":5,"coverUrl":" "}"#,
        )
        .unwrap();
        let draft = body.into_draft().unwrap();

        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, None);
        assert_eq!(draft.cover_url, None);
        assert_eq!(draft.rating.get(), 5);
    }

    #[test]
    fn unparsable_form_rating_counts_as_missing() {
        let form = FormState::from(BookForm {
            title: "Dune".into(),
            rating: Some("beaucoup".into()),
            ..BookForm::default()
        });
        assert_eq!(form.rating, None);

        let form = FormState::from(BookForm {
            rating: Some("4".into()),
            ..BookForm::default()
        });
        assert_eq!(form.rating, Some(4));
    }
}
