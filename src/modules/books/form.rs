//! Form state and the merge policy applied when a lookup suggests values.

use biblio_lookup::Suggestion;
use biblio_store::{NewBook, Rating, ValidationError};
use serde::{Deserialize, Serialize};

/// Pick the value a form field should hold after a lookup.
///
/// User-entered text always wins; the candidate only fills a blank field.
pub fn merge_field(current: &str, candidate: Option<&str>) -> String {
    if !current.trim().is_empty() {
        return current.to_string();
    }

    match candidate {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => current.to_string(),
    }
}

/// Current contents of the book form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub comment: String,
    pub rating: Option<u8>,
    pub cover_url: String,
    /// Identifies the page instance the form lives on; searches are
    /// sequenced per form id.
    #[serde(default)]
    pub form_id: String,
}

impl FormState {
    /// Empty form bound to `form_id`.
    pub fn with_form_id(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            ..Self::default()
        }
    }

    /// Whether the cover preview is shown.
    pub fn cover_visible(&self) -> bool {
        !self.cover_url.trim().is_empty()
    }

    /// Fold a lookup match into the form without overwriting user text.
    ///
    /// The cover follows the latest match: replaced when the match has one,
    /// cleared when it does not.
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) {
        self.summary = merge_field(&self.summary, suggestion.summary.as_deref());
        self.author = merge_field(&self.author, suggestion.author.as_deref());
        self.cover_url = suggestion.cover_url.clone().unwrap_or_default();
    }

    /// Turn the form into a draft the store will accept.
    pub fn to_new_book(&self) -> Result<NewBook, ValidationError> {
        let rating = self.rating.ok_or(ValidationError::MissingRating)?;
        let rating = Rating::new(i64::from(rating))?;

        let draft = NewBook {
            title: self.title.clone(),
            author: Some(self.author.clone()),
            summary: Some(self.summary.clone()),
            comment: self.comment.clone(),
            rating,
            cover_url: Some(self.cover_url.clone()),
        }
        .normalized();

        draft.validate()?;
        Ok(draft)
    }
}

/// Feedback line shown under the search button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Found,
    NotFound,
    Unavailable,
    MissingTitle,
    /// A newer search for the same form replaced this one.
    Superseded,
}

impl SearchStatus {
    pub fn message(self) -> &'static str {
        match self {
            SearchStatus::Idle => "",
            SearchStatus::Searching => "🔍 Recherche en cours...",
            SearchStatus::Found => "✅ Livre trouvé ! Résumé et couverture ajoutés.",
            SearchStatus::NotFound => {
                "❌ Aucun livre trouvé. Vérifie l'orthographe ou ajoute l'auteur."
            }
            SearchStatus::Unavailable => "❌ Erreur de connexion. Réessaie plus tard.",
            SearchStatus::MissingTitle => "⚠️ Entre au moins le titre du livre !",
            SearchStatus::Superseded => "⏳ Une recherche plus récente a remplacé celle-ci.",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SearchStatus::Idle | SearchStatus::Searching | SearchStatus::Superseded => {
                "search-status"
            }
            SearchStatus::Found => "search-status success",
            SearchStatus::NotFound | SearchStatus::Unavailable | SearchStatus::MissingTitle => {
                "search-status error"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> FormState {
        FormState {
            title: "Le Petit Prince".into(),
            author: "Saint-Exupéry".into(),
            summary: "Mon résumé à moi".into(),
            comment: "Un classique".into(),
            rating: Some(5),
            cover_url: String::new(),
            form_id: String::new(),
        }
    }

    #[test]
    fn merge_keeps_user_text() {
        assert_eq!(merge_field("mine", Some("theirs")), "mine");
        assert_eq!(merge_field("", Some("theirs")), "theirs");
        assert_eq!(merge_field("  ", Some("theirs")), "theirs");
        assert_eq!(merge_field("", None), "");
        assert_eq!(merge_field("", Some("   ")), "");
    }

    #[test]
    fn populated_summary_survives_any_suggestion() {
        let mut form = filled_form();
        form.apply_suggestion(&Suggestion {
            summary: Some("x".repeat(503)),
            cover_url: Some("https://img/c.jpg".into()),
            author: Some("Quelqu'un d'autre".into()),
        });

        assert_eq!(form.summary, "Mon résumé à moi");
        assert_eq!(form.author, "Saint-Exupéry");
        assert_eq!(form.cover_url, "https://img/c.jpg");
        assert!(form.cover_visible());
    }

    #[test]
    fn blank_fields_are_filled_and_missing_cover_clears_preview() {
        let mut form = FormState {
            title: "Dune".into(),
            cover_url: "https://old/cover.jpg".into(),
            ..FormState::default()
        };
        form.apply_suggestion(&Suggestion {
            summary: Some("Arrakis".into()),
            cover_url: None,
            author: Some("Frank Herbert".into()),
        });

        assert_eq!(form.summary, "Arrakis");
        assert_eq!(form.author, "Frank Herbert");
        assert!(!form.cover_visible());
    }

    #[test]
    fn missing_rating_blocks_submission() {
        let form = FormState {
            rating: None,
            ..filled_form()
        };
        assert_eq!(form.to_new_book(), Err(ValidationError::MissingRating));
    }

    #[test]
    fn form_becomes_normalized_draft() {
        let form = FormState {
            author: "  ".into(),
            ..filled_form()
        };
        let draft = form.to_new_book().unwrap();

        assert_eq!(draft.rating.get(), 5);
        assert_eq!(draft.author, None);
        assert_eq!(draft.cover_url, None);
        assert_eq!(draft.summary.as_deref(), Some("Mon résumé à moi"));
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let form = FormState {
            rating: Some(6),
            ..filled_form()
        };
        assert_eq!(
            form.to_new_book(),
            Err(ValidationError::RatingOutOfRange(6))
        );
    }

    #[test]
    fn error_statuses_share_the_error_class() {
        assert_eq!(SearchStatus::NotFound.css_class(), "search-status error");
        assert_eq!(SearchStatus::Found.css_class(), "search-status success");
        assert!(SearchStatus::Idle.message().is_empty());
    }
}
