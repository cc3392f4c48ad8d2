//! Google Sheets implementation of [`QuestionSource`].
//!
//! Reads first-column values from the questions/admins ranges and appends
//! usage rows to the users range, all via the Sheets v4 values API. The
//! bearer token arrives base64+JSON encoded in `CREDENTIALS_BASE64`, the
//! same envelope the deployment tooling already produces.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::{QuestionSource, SourceError, SourceResult, UsageRecord};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Sheets-backed source
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub questions_range: String,
    pub admins_range: String,
    pub usage_range: String,
    /// Base64-encoded JSON credentials blob
    pub credentials_base64: String,
}

impl SheetsConfig {
    /// Load from environment. SPREADSHEET_ID and CREDENTIALS_BASE64 are
    /// required; the ranges fall back to conventional sheet names.
    pub fn from_env() -> SourceResult<Self> {
        let spreadsheet_id = require_env("SPREADSHEET_ID")?;
        let credentials_base64 = require_env("CREDENTIALS_BASE64")?;

        Ok(Self {
            spreadsheet_id,
            questions_range: env_or("QUESTIONS_RANGE", "Questions!A:A"),
            admins_range: env_or("ADMINS_RANGE", "Admins!A:A"),
            usage_range: env_or("USAGE_RANGE", "Users!A:E"),
            credentials_base64,
        })
    }
}

fn require_env(name: &'static str) -> SourceResult<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SourceError::Config(format!("{} is not set", name)))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Deserialize)]
struct Credentials {
    token: String,
}

/// Wire format of a values GET response
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

pub struct SheetsClient {
    client: reqwest::Client,
    config: SheetsConfig,
    token: String,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> SourceResult<Self> {
        let decoded = STANDARD
            .decode(config.credentials_base64.trim())
            .map_err(|e| SourceError::Config(format!("CREDENTIALS_BASE64 is not valid base64: {}", e)))?;
        let creds: Credentials = serde_json::from_slice(&decoded)
            .map_err(|e| SourceError::Config(format!("credentials JSON is malformed: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            token: creds.token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE, self.config.spreadsheet_id, range
        )
    }

    /// Fetch a range and flatten it to its first column, dropping blanks
    async fn fetch_first_column(&self, range: &str) -> SourceResult<Vec<String>> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "values request for {} returned {}",
                range,
                response.status()
            )));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        Ok(body
            .values
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(|cell| cell.trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect())
    }
}

fn map_reqwest_err(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout(REQUEST_TIMEOUT)
    } else {
        SourceError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl QuestionSource for SheetsClient {
    async fn fetch_questions(&self) -> SourceResult<Vec<String>> {
        self.fetch_first_column(&self.config.questions_range).await
    }

    async fn fetch_admin_ids(&self) -> SourceResult<HashSet<String>> {
        let mut ids = self.fetch_first_column(&self.config.admins_range).await?;

        // The admins sheet may carry a header row; drop it if non-numeric
        if ids
            .first()
            .is_some_and(|first| !first.chars().all(|c| c.is_ascii_digit()))
        {
            ids.remove(0);
        }

        Ok(ids.into_iter().collect())
    }

    async fn record_usage(&self, record: UsageRecord) -> SourceResult<()> {
        let url = format!(
            "{}:append?valueInputOption=USER_ENTERED",
            self.values_url(&self.config.usage_range)
        );

        let body = AppendRequest {
            values: vec![vec![
                record.user_id,
                record.full_name,
                record.user_link,
                record.ts,
                record.action,
            ]],
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "usage append returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_creds(creds: &str) -> SheetsConfig {
        SheetsConfig {
            spreadsheet_id: "sheet123".to_string(),
            questions_range: "Questions!A:A".to_string(),
            admins_range: "Admins!A:A".to_string(),
            usage_range: "Users!A:E".to_string(),
            credentials_base64: creds.to_string(),
        }
    }

    #[test]
    fn test_client_rejects_bad_base64() {
        let result = SheetsClient::new(config_with_creds("not base64!!!"));
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn test_client_rejects_malformed_credentials_json() {
        let encoded = STANDARD.encode(b"{\"nope\": true}");
        let result = SheetsClient::new(config_with_creds(&encoded));
        assert!(matches!(result, Err(SourceError::Config(_))));
    }

    #[test]
    fn test_client_accepts_valid_credentials() {
        let encoded = STANDARD.encode(b"{\"token\": \"ya29.secret\"}");
        let client = SheetsClient::new(config_with_creds(&encoded)).unwrap();
        assert_eq!(client.token, "ya29.secret");
        assert_eq!(
            client.values_url("Questions!A:A"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/Questions!A:A"
        );
    }

    #[test]
    fn test_value_range_tolerates_missing_values() {
        let body: ValueRange = serde_json::from_str("{}").unwrap();
        assert!(body.values.is_empty());
    }
}
