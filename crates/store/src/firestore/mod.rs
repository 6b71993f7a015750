//! Firestore REST gateway.

pub mod value;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::error::{StoreError, StoreResult};
use crate::record::{self, BookRecord, NewBook};
use crate::RecordStore;
use value::{Document, CREATED_AT};

/// Connection parameters for a Firestore collection
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// API origin, e.g. `https://firestore.googleapis.com`
    pub base_url: String,
    pub project_id: String,
    /// Web API key sent as the `key` query parameter
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            base_url: "https://firestore.googleapis.com".to_string(),
            project_id: project_id.into(),
            api_key: None,
            collection: collection.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Record store backed by a Firestore collection
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<WriteResult>,
    #[serde(default)]
    commit_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResult {
    #[serde(default)]
    transform_results: Vec<serde_json::Value>,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Unavailable(
                "firestore project_id is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.config.project_id)
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/{}/documents",
            self.config.base_url.trim_end_matches('/'),
            self.database_path()
        )
    }

    fn document_name(&self, id: &str) -> String {
        format!(
            "{}/documents/{}/{}",
            self.database_path(),
            self.config.collection,
            id
        )
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> StoreResult<Response> {
        self.with_key(request).send().await.map_err(|e| {
            tracing::warn!(operation, error = %e, "firestore request failed");
            StoreError::Http(e)
        })
    }

    async fn check(response: Response, operation: &str) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

        tracing::warn!(
            operation,
            status = status.as_u16(),
            %message,
            "firestore returned an error"
        );
        Err(StoreError::Unavailable(format!(
            "HTTP {} {}",
            status.as_u16(),
            message
        )))
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn list(&self) -> StoreResult<Vec<BookRecord>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.config.collection }],
                "orderBy": [{
                    "field": { "fieldPath": CREATED_AT },
                    "direction": "DESCENDING"
                }]
            }
        });

        let url = format!("{}:runQuery", self.documents_url());
        let response = self.send(self.client.post(url).json(&body), "list").await?;
        let response = Self::check(response, "list").await?;
        let items: Vec<RunQueryItem> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let mut records = Vec::with_capacity(items.len());
        for document in items.into_iter().filter_map(|item| item.document) {
            match value::decode_document(&document) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(name = %document.name, error = %e, "skipping undecodable document")
                }
            }
        }

        tracing::debug!(
            collection = %self.config.collection,
            count = records.len(),
            "records listed"
        );
        Ok(records)
    }

    async fn create(&self, draft: NewBook) -> StoreResult<BookRecord> {
        let draft = draft.normalized();
        draft.validate()?;

        let id = record::new_id();
        let date = record::today();
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(&id),
                    "fields": value::encode_fields(&draft, &date)
                },
                "updateTransforms": [{
                    "fieldPath": CREATED_AT,
                    "setToServerValue": "REQUEST_TIME"
                }],
                "currentDocument": { "exists": false }
            }]
        });

        let url = format!("{}:commit", self.documents_url());
        let response = self.send(self.client.post(url).json(&body), "create").await?;
        let response = Self::check(response, "create").await?;
        let commit: CommitResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let created_at = commit
            .write_results
            .first()
            .and_then(|result| result.transform_results.first())
            .and_then(|transform| transform.get("timestampValue"))
            .and_then(|raw| raw.as_str())
            .or(commit.commit_time.as_deref())
            .and_then(value::parse_timestamp)
            .unwrap_or_else(OffsetDateTime::now_utc);

        tracing::info!(collection = %self.config.collection, %id, "record created");
        Ok(BookRecord::from_draft(id, draft, date, created_at))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let url = format!(
            "{}/{}/{}",
            self.documents_url(),
            self.config.collection,
            urlencoding::encode(id)
        );

        let response = self.send(self.client.delete(url), "delete").await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(%id, "delete of unknown record ignored");
            return Ok(());
        }
        Self::check(response, "delete").await?;

        tracing::info!(collection = %self.config.collection, %id, "record deleted");
        Ok(())
    }
}
