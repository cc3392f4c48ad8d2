mod gsheets;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

pub use gsheets::{SheetsClient, SheetsConfig};

/// Result type for external source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors from the external question/admin/usage source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source request failed: {0}")]
    Unavailable(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid source configuration: {0}")]
    Config(String),

    #[error("response parsing failed: {0}")]
    Parse(String),
}

/// One row of the usage sheet
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub user_id: String,
    pub full_name: String,
    pub user_link: String,
    pub action: String,
    /// RFC3339 timestamp of the event
    pub ts: String,
}

/// The authoritative source for questions, admin identities and usage logs.
///
/// Failure contracts, from the caller's perspective:
/// - `fetch_questions` failure means the caller keeps its last good pool.
/// - `fetch_admin_ids` failure means the caller treats the list as empty.
/// - `record_usage` is best-effort; failures are logged and dropped.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self) -> SourceResult<Vec<String>>;

    async fn fetch_admin_ids(&self) -> SourceResult<HashSet<String>>;

    async fn record_usage(&self, record: UsageRecord) -> SourceResult<()>;
}

/// In-memory source for tests and local development without a spreadsheet.
pub struct StaticSource {
    questions: Vec<String>,
    admins: HashSet<String>,
    records: RwLock<Vec<UsageRecord>>,
}

impl StaticSource {
    pub fn new(questions: Vec<String>, admins: HashSet<String>) -> Self {
        Self {
            questions,
            admins,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Usage records seen so far (test inspection)
    pub async fn recorded(&self) -> Vec<UsageRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn fetch_questions(&self) -> SourceResult<Vec<String>> {
        Ok(self.questions.clone())
    }

    async fn fetch_admin_ids(&self) -> SourceResult<HashSet<String>> {
        Ok(self.admins.clone())
    }

    async fn record_usage(&self, record: UsageRecord) -> SourceResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }
}
