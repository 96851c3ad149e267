//! Core `VersionStore` trait and `HttpVersionStore` implementation.
//!
//! The persistence service owns the actual schema; this client only speaks
//! the request/response shapes the editing session needs: append a version,
//! list a chapter's version history, fetch a chapter to open it.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::store::model::{Chapter, SaveTag, VersionRecord};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the persistence service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The service answered with a non-success status code.
    #[error("service rejected the request with status {0}")]
    Status(u16),

    /// The response body could not be parsed as the expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// VersionStore trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the persistence service.
///
/// Implementations must be `Send + Sync` so they can be shared as an
/// `Arc<dyn VersionStore>` between the editor coordinator and the UI layer.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Append a new version snapshot for `chapter_id`.
    async fn create_version(
        &self,
        chapter_id: &str,
        content: &str,
        word_count: usize,
        tag: SaveTag,
    ) -> Result<VersionRecord, StoreError>;

    /// List all versions of `chapter_id`, newest first.
    async fn list_versions(&self, chapter_id: &str) -> Result<Vec<VersionRecord>, StoreError>;

    /// Fetch a chapter so an editing session can be opened on it.
    async fn fetch_chapter(&self, chapter_id: &str) -> Result<Chapter, StoreError>;
}

// Compile-time assertion: Box<dyn VersionStore> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn VersionStore>) {}
};

// ---------------------------------------------------------------------------
// HttpVersionStore
// ---------------------------------------------------------------------------

/// Production store client speaking JSON-over-HTTP.
///
/// Routes:
/// * `POST {base_url}/chapters/{id}/versions` — append a version
/// * `GET  {base_url}/chapters/{id}/versions` — version history
/// * `GET  {base_url}/chapters/{id}`          — chapter
///
/// All connection details come from [`StoreConfig`]; nothing is hardcoded.
pub struct HttpVersionStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVersionStore {
    /// Build a store client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails.
    pub fn from_config(config: &StoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chapter_url(&self, chapter_id: &str) -> String {
        format!("{}/chapters/{chapter_id}", self.base_url)
    }

    fn versions_url(&self, chapter_id: &str) -> String {
        format!("{}/chapters/{chapter_id}/versions", self.base_url)
    }
}

#[async_trait]
impl VersionStore for HttpVersionStore {
    async fn create_version(
        &self,
        chapter_id: &str,
        content: &str,
        word_count: usize,
        tag: SaveTag,
    ) -> Result<VersionRecord, StoreError> {
        let body = serde_json::json!({
            "content":   content,
            "wordCount": word_count,
            "tag":       tag,
        });

        let response = self
            .client
            .post(self.versions_url(chapter_id))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        response
            .json::<VersionRecord>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn list_versions(&self, chapter_id: &str) -> Result<Vec<VersionRecord>, StoreError> {
        let response = self
            .client
            .get(self.versions_url(chapter_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        response
            .json::<Vec<VersionRecord>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn fetch_chapter(&self, chapter_id: &str) -> Result<Chapter, StoreError> {
        let response = self
            .client
            .get(self.chapter_url(chapter_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        response
            .json::<Chapter>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// MockVersionStore  (test-only)
// ---------------------------------------------------------------------------

/// A recording test double for [`VersionStore`].
///
/// * [`MockVersionStore::ok`] answers every call immediately.
/// * [`MockVersionStore::failing`] rejects every `create_version`.
/// * [`MockVersionStore::gated`] blocks each `create_version` until the test
///   calls [`release_one`](MockVersionStore::release_one), which lets tests
///   hold a save "in flight" deliberately.
///
/// Every accepted save is recorded with the virtual instant at which the
/// store saw it.
#[cfg(test)]
pub struct MockVersionStore {
    saves: std::sync::Mutex<Vec<RecordedSave>>,
    fail: bool,
    gate: Option<tokio::sync::Semaphore>,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedSave {
    pub chapter_id: String,
    pub content: String,
    pub word_count: usize,
    pub tag: SaveTag,
    pub at: tokio::time::Instant,
}

#[cfg(test)]
impl MockVersionStore {
    pub fn ok() -> Self {
        Self {
            saves: std::sync::Mutex::new(Vec::new()),
            fail: false,
            gate: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            saves: std::sync::Mutex::new(Vec::new()),
            fail: true,
            gate: None,
        }
    }

    pub fn gated() -> Self {
        Self {
            saves: std::sync::Mutex::new(Vec::new()),
            fail: false,
            gate: Some(tokio::sync::Semaphore::new(0)),
        }
    }

    /// Let exactly one gated `create_version` call proceed.
    pub fn release_one(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn saves(&self) -> Vec<RecordedSave> {
        self.saves.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl VersionStore for MockVersionStore {
    async fn create_version(
        &self,
        chapter_id: &str,
        content: &str,
        word_count: usize,
        tag: SaveTag,
    ) -> Result<VersionRecord, StoreError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.fail {
            return Err(StoreError::Request("connection refused".into()));
        }

        let mut saves = self.saves.lock().unwrap();
        saves.push(RecordedSave {
            chapter_id: chapter_id.to_string(),
            content: content.to_string(),
            word_count,
            tag,
            at: tokio::time::Instant::now(),
        });

        Ok(VersionRecord {
            id: format!("v{}", saves.len()),
            chapter_id: chapter_id.to_string(),
            content: content.to_string(),
            word_count,
            tag,
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_versions(&self, chapter_id: &str) -> Result<Vec<VersionRecord>, StoreError> {
        let saves = self.saves.lock().unwrap();
        Ok(saves
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.chapter_id == chapter_id)
            .map(|(i, s)| VersionRecord {
                id: format!("v{}", i + 1),
                chapter_id: s.chapter_id.clone(),
                content: s.content.clone(),
                word_count: s.word_count,
                tag: s.tag,
                created_at: chrono::Utc::now(),
            })
            .collect())
    }

    async fn fetch_chapter(&self, chapter_id: &str) -> Result<Chapter, StoreError> {
        Ok(Chapter {
            id: chapter_id.to_string(),
            title: "Untitled".into(),
            content: String::new(),
            position: 0,
            word_count: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn make_config() -> StoreConfig {
        StoreConfig {
            base_url: "http://localhost:3000/api/".into(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _store = HttpVersionStore::from_config(&make_config());
    }

    #[test]
    fn urls_drop_trailing_base_slash() {
        let store = HttpVersionStore::from_config(&make_config());
        assert_eq!(
            store.versions_url("ch1"),
            "http://localhost:3000/api/chapters/ch1/versions"
        );
        assert_eq!(
            store.chapter_url("ch1"),
            "http://localhost:3000/api/chapters/ch1"
        );
    }

    /// Verify that `HttpVersionStore` is usable as `dyn VersionStore`.
    #[test]
    fn store_is_object_safe() {
        let store: Box<dyn VersionStore> = Box::new(HttpVersionStore::from_config(&make_config()));
        drop(store);
    }

    // ---- MockVersionStore ---

    #[tokio::test]
    async fn mock_records_save_fields() {
        let store = MockVersionStore::ok();
        let record = store
            .create_version("ch1", "<p>hello world</p>", 2, SaveTag::Manual)
            .await
            .unwrap();

        assert_eq!(record.chapter_id, "ch1");
        assert_eq!(record.tag, SaveTag::Manual);

        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].content, "<p>hello world</p>");
        assert_eq!(saves[0].word_count, 2);
    }

    #[tokio::test]
    async fn mock_failing_rejects_saves() {
        let store = MockVersionStore::failing();
        let err = store
            .create_version("ch1", "text", 1, SaveTag::Auto)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Request(_)));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn mock_list_returns_newest_first() {
        let store = MockVersionStore::ok();
        store
            .create_version("ch1", "first", 1, SaveTag::Auto)
            .await
            .unwrap();
        store
            .create_version("ch1", "second", 1, SaveTag::Manual)
            .await
            .unwrap();

        let versions = store.list_versions("ch1").await.unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].content, "second");
        assert_eq!(versions[1].content, "first");
    }

    // ---- StoreError display ---

    #[test]
    fn store_error_display_status() {
        let e = StoreError::Status(503);
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn store_error_display_timeout() {
        let e = StoreError::Timeout;
        assert!(e.to_string().contains("timed out"));
    }
}
