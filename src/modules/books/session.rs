//! Application state for the shelf page and the service driving it.
//!
//! Every user action (load, submit, delete, search) goes through
//! [`BookShelf`], which turns store and lookup failures into messages and
//! hands back a [`PageState`]; the page itself is a pure projection of it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Context;
use biblio_kernel::settings::{Settings, StoreBackend};
use biblio_lookup::{
    GoogleBooksClient, GoogleBooksConfig, LookupError, LookupOutcome, LookupQuery, MetadataLookup,
};
use biblio_store::{
    record, BookRecord, FirestoreConfig, FirestoreStore, MemoryStore, RecordStore, StoreError,
    ValidationError, SUMMARY_MAX_CHARS,
};
use serde::Serialize;

use super::form::{FormState, SearchStatus};
use super::presenter::{self, DisplayState};

pub const BOOK_ADDED: &str = "📚 Livre ajouté avec succès !";
pub const ADD_FAILED: &str = "❌ Erreur lors de l'ajout du livre. Réessaie plus tard.";
pub const DELETE_FAILED: &str = "❌ Erreur lors de la suppression. Réessaie plus tard.";
pub const LOAD_FAILED: &str = "❌ Impossible de charger les livres. Réessaie plus tard.";
pub const RATING_REQUIRED: &str = "N'oublie pas de donner une note au livre ! ⭐";
pub const FIELDS_REQUIRED: &str = "⚠️ Le titre et ton avis sont obligatoires.";
pub const SUMMARY_TOO_LONG: &str = "⚠️ Le résumé ne doit pas dépasser 500 caractères.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub form: FormState,
    pub status: SearchStatus,
    pub display: DisplayState,
    pub flash: Option<Flash>,
}

/// Identifies one search request issued for one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    form_id: String,
    seq: u64,
}

/// Hands out search tickets so that, per form, only the most recently
/// requested search may update it.
///
/// Only forms with a search in flight hold an entry.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl SearchSequencer {
    pub fn issue(&self, form_id: &str) -> SearchTicket {
        let seq = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest().insert(form_id.to_string(), seq);
        SearchTicket {
            form_id: form_id.to_string(),
            seq,
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.latest().get(&ticket.form_id) == Some(&ticket.seq)
    }

    /// Settle a finished search: true when it is still the latest for its
    /// form, in which case the form's slot is released.
    pub fn complete(&self, ticket: &SearchTicket) -> bool {
        let mut latest = self.latest();
        if latest.get(&ticket.form_id) == Some(&ticket.seq) {
            latest.remove(&ticket.form_id);
            true
        } else {
            false
        }
    }

    fn latest(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of a search as far as the form is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUpdate {
    Applied {
        form: FormState,
        status: SearchStatus,
    },
    /// A later search was requested for the same form before this one
    /// completed.
    Superseded,
}

/// Shelf service shared by the HTTP handlers and the CLI.
pub struct BookShelf {
    store: Arc<dyn RecordStore>,
    lookup: Arc<dyn MetadataLookup>,
    searches: SearchSequencer,
}

impl BookShelf {
    pub fn new(store: Arc<dyn RecordStore>, lookup: Arc<dyn MetadataLookup>) -> Self {
        Self {
            store,
            lookup,
            searches: SearchSequencer::default(),
        }
    }

    /// Wire the configured store backend and the Google Books lookup.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn RecordStore> = match settings.store.backend {
            StoreBackend::Memory => {
                tracing::warn!("using in-memory record store; records are lost on exit");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Firestore => {
                let config = FirestoreConfig {
                    base_url: settings.store.base_url.clone(),
                    project_id: settings.store.project_id.clone(),
                    api_key: settings.store.api_key.clone(),
                    collection: settings.store.collection.clone(),
                    timeout: Duration::from_millis(settings.store.timeout_ms),
                };
                Arc::new(FirestoreStore::new(config).context("failed to configure Firestore store")?)
            }
        };

        let lookup = GoogleBooksClient::new(GoogleBooksConfig {
            base_url: settings.lookup.base_url.clone(),
            lang: settings.lookup.lang.clone(),
            max_results: settings.lookup.max_results,
            timeout: Duration::from_millis(settings.lookup.timeout_ms),
        })
        .context("failed to configure metadata lookup")?;

        Ok(Arc::new(Self::new(store, Arc::new(lookup))))
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn lookup(&self) -> &dyn MetadataLookup {
        self.lookup.as_ref()
    }

    /// Records for display; an unreachable store shows as an empty list.
    pub async fn refresh(&self) -> DisplayState {
        match self.store.list().await {
            Ok(records) => presenter::render(&records),
            Err(e) => {
                tracing::error!(error = %e, "failed to load records");
                presenter::render(&[]).with_notice(LOAD_FAILED)
            }
        }
    }

    /// Initial page: empty form plus the current list.
    pub async fn page(&self) -> PageState {
        PageState {
            form: FormState::with_form_id(record::new_id()),
            display: self.refresh().await,
            ..PageState::default()
        }
    }

    /// Persist the form as a new record.
    ///
    /// The list is always re-read from the store; an unsaved record is never
    /// shown.
    pub async fn submit(&self, form: FormState) -> PageState {
        let flash;
        let mut next_form = form.clone();

        match self.create(&form).await {
            Ok(record) => {
                tracing::info!(id = %record.id, title = %record.title, "book added");
                next_form = FormState::with_form_id(form.form_id.clone());
                flash = Flash::success(BOOK_ADDED);
            }
            Err(SubmitError::Invalid(ValidationError::MissingRating))
            | Err(SubmitError::Invalid(ValidationError::RatingOutOfRange(_))) => {
                flash = Flash::error(RATING_REQUIRED);
            }
            Err(SubmitError::Invalid(ValidationError::SummaryTooLong(chars))) => {
                tracing::debug!(chars, max = SUMMARY_MAX_CHARS, "summary rejected");
                flash = Flash::error(SUMMARY_TOO_LONG);
            }
            Err(SubmitError::Invalid(e)) => {
                tracing::debug!(error = %e, "submission rejected");
                flash = Flash::error(FIELDS_REQUIRED);
            }
            Err(SubmitError::Store(e)) => {
                tracing::error!(error = %e, "failed to add book");
                flash = Flash::error(ADD_FAILED);
            }
        }

        PageState {
            form: next_form,
            status: SearchStatus::Idle,
            display: self.refresh().await,
            flash: Some(flash),
        }
    }

    /// Validate and persist a form, returning the stored record.
    pub async fn create(&self, form: &FormState) -> Result<BookRecord, SubmitError> {
        let draft = form.to_new_book().map_err(SubmitError::Invalid)?;
        self.store.create(draft).await.map_err(|e| match e {
            StoreError::Validation(v) => SubmitError::Invalid(v),
            other => SubmitError::Store(other),
        })
    }

    /// Remove a record and re-read the list.
    pub async fn delete(&self, id: &str) -> PageState {
        let flash = match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "book deleted");
                None
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "failed to delete book");
                Some(Flash::error(DELETE_FAILED))
            }
        };

        PageState {
            form: FormState::with_form_id(record::new_id()),
            display: self.refresh().await,
            flash,
            ..PageState::default()
        }
    }

    /// Run a metadata search for the form's title and author.
    ///
    /// Lookup failures leave the form untouched; a result that arrives after
    /// a newer search was issued for the same form is dropped. A form
    /// without an id gets a fresh one.
    pub async fn search(&self, mut form: FormState) -> SearchUpdate {
        if form.form_id.trim().is_empty() {
            form.form_id = record::new_id();
        }

        let query = match LookupQuery::new(&form.title, Some(form.author.as_str())) {
            Ok(query) => query,
            Err(_) => {
                return SearchUpdate::Applied {
                    form,
                    status: SearchStatus::MissingTitle,
                }
            }
        };

        let ticket = self.searches.issue(&form.form_id);
        let result = self.lookup.search(&query).await;

        if !self.searches.complete(&ticket) {
            tracing::debug!(?ticket, "discarding superseded search result");
            return SearchUpdate::Superseded;
        }

        let status = match result {
            Ok(LookupOutcome::Found(suggestion)) => {
                form.apply_suggestion(&suggestion);
                SearchStatus::Found
            }
            Ok(LookupOutcome::NotFound) => SearchStatus::NotFound,
            Err(LookupError::MissingTitle) => SearchStatus::MissingTitle,
            Err(e) => {
                tracing::warn!(error = %e, "metadata lookup failed");
                SearchStatus::Unavailable
            }
        };

        SearchUpdate::Applied { form, status }
    }

    /// Search, then re-render the page around the updated form.
    pub async fn search_page(&self, form: FormState) -> PageState {
        let (form, status) = match self.search(form.clone()).await {
            SearchUpdate::Applied { form, status } => (form, status),
            SearchUpdate::Superseded => (form, SearchStatus::Superseded),
        };

        PageState {
            form,
            status,
            display: self.refresh().await,
            flash: None,
        }
    }
}

/// Why a submission did not produce a record.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(ValidationError),

    #[error(transparent)]
    Store(StoreError),
}
