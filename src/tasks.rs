//! Background work that must never block or fail the user-facing flow.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::sheets::{QuestionSource, UsageRecord};
use crate::telegram::User;

/// Buffered queue size for usage records; overflow drops the record
const USAGE_QUEUE_CAPACITY: usize = 64;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(600);

/// Handle for fire-and-forget usage logging. Enqueueing never waits; the
/// spawned worker does the slow spreadsheet append and swallows failures.
#[derive(Clone)]
pub struct UsageLogger {
    tx: mpsc::Sender<UsageRecord>,
}

impl UsageLogger {
    pub fn record(&self, user: &User, action: &str) {
        let record = UsageRecord {
            user_id: user.id.to_string(),
            full_name: user.full_name(),
            user_link: user.profile_link(),
            action: action.to_string(),
            ts: chrono::Utc::now().to_rfc3339(),
        };

        if let Err(e) = self.tx.try_send(record) {
            tracing::warn!("usage queue full, dropping record: {}", e);
        }
    }
}

/// Spawn the usage-log worker and return its enqueue handle
pub fn spawn_usage_logger(source: Arc<dyn QuestionSource>) -> UsageLogger {
    let (tx, mut rx) = mpsc::channel::<UsageRecord>(USAGE_QUEUE_CAPACITY);

    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            if let Err(e) = source.record_usage(record).await {
                tracing::error!("failed to record usage: {}", e);
            }
        }
    });

    UsageLogger { tx }
}

/// Periodically ping our own public URL so the hosting platform doesn't put
/// the process to sleep between games.
pub fn spawn_keep_alive(url: String) {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("keep-alive disabled, could not build client: {}", e);
                return;
            }
        };

        loop {
            tokio::time::sleep(KEEP_ALIVE_INTERVAL).await;

            match client.get(&url).send().await {
                Ok(response) => tracing::info!("keep-alive ping: {}", response.status()),
                Err(e) => tracing::error!("keep-alive ping failed: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::sheets::StaticSource;

    #[tokio::test]
    async fn test_usage_logger_records_through_queue() {
        let source = Arc::new(StaticSource::new(Vec::new(), HashSet::new()));
        let logger = spawn_usage_logger(source.clone());

        let user = User {
            id: 42,
            first_name: Some("Ada".to_string()),
            last_name: None,
            username: Some("ada".to_string()),
        };
        logger.record(&user, "start");

        // Give the worker a moment to drain the queue
        tokio::time::sleep(Duration::from_millis(50)).await;

        let records = source.recorded().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "42");
        assert_eq!(records[0].action, "start");
        assert_eq!(records[0].user_link, "https://t.me/ada");
    }
}
