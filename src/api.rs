//! HTTP client for the remote glucose backend
//!
//! Thin transport layer: requests carry the stored bearer credential and
//! a version segment, responses are deserialized into wire shapes.
//! Normalization of raw readings into the canonical model happens in the
//! data-access facade, not here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, TokenStore};
use crate::error::DashError;
use crate::model::{LogEntry, NewLogEntry, TargetRange, UserProfile};

/// A glucose reading as served by the backend, before normalization.
///
/// Any status field in the payload is ignored; status is always
/// recomputed locally from the value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawReading {
    pub timestamp: DateTime<Utc>,
    pub value: u16,
}

/// Partial profile update, serializing only the fields that are set
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_range: Option<TargetRange>,
}

/// Client for the remote backend API
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_version: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(config: &AppConfig, tokens: TokenStore) -> Result<Self, DashError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DashError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            tokens,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        if self.api_version.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}{}", self.base_url, self.api_version, endpoint)
        }
    }

    /// Attach the bearer credential (when present) and send. Transport
    /// failures and timeouts become `SourceUnavailable`; the response
    /// status is not inspected here.
    async fn send(&self, request: RequestBuilder) -> Result<Response, DashError> {
        let request = match self.tokens.load() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                DashError::SourceUnavailable(e.to_string())
            } else {
                DashError::Api(e.to_string())
            }
        })
    }

    /// Turn a non-2xx response into an error with a best-effort message
    async fn check_status(response: Response) -> Result<Response, DashError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.json::<serde_json::Value>().await.ok();
            return Err(DashError::Api(extract_error_message(status, body)));
        }
        Ok(response)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, DashError> {
        let response = self.send(request).await?;
        Self::check_status(response).await
    }

    /// Fetch raw readings covering the last `days` days
    pub async fn get_readings(&self, days: u32) -> Result<Vec<RawReading>, DashError> {
        let url = format!("{}?days={}", self.url("/glucose/readings"), days);
        debug!("GET {}", url);
        let response = self.execute(self.client.get(&url)).await?;
        response.json().await.map_err(|e| DashError::Api(e.to_string()))
    }

    /// Fetch all log entries
    pub async fn get_log_entries(&self) -> Result<Vec<LogEntry>, DashError> {
        let response = self.execute(self.client.get(self.url("/log-entries"))).await?;
        response.json().await.map_err(|e| DashError::Api(e.to_string()))
    }

    /// Submit a new log entry; the backend assigns the id
    pub async fn add_log_entry(&self, entry: &NewLogEntry) -> Result<LogEntry, DashError> {
        let response = self
            .execute(self.client.post(self.url("/log-entries")).json(entry))
            .await?;
        response.json().await.map_err(|e| DashError::Api(e.to_string()))
    }

    /// Delete a log entry by id
    pub async fn delete_log_entry(&self, id: &str) -> Result<(), DashError> {
        let url = format!("{}/{}", self.url("/log-entries"), id);
        let response = self.send(self.client.delete(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DashError::NotFound(id.to_string()));
        }
        Self::check_status(response).await?;
        Ok(())
    }

    /// Fetch the user profile
    pub async fn get_user_profile(&self) -> Result<UserProfile, DashError> {
        let response = self.execute(self.client.get(self.url("/user/profile"))).await?;
        response.json().await.map_err(|e| DashError::Api(e.to_string()))
    }

    /// Apply a partial profile update and return the updated profile
    pub async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, DashError> {
        let response = self
            .execute(self.client.patch(self.url("/user/profile")).json(update))
            .await?;
        response.json().await.map_err(|e| DashError::Api(e.to_string()))
    }
}

/// Best-effort error message from a JSON error body, falling back to
/// the status code
fn extract_error_message(status: StatusCode, body: Option<serde_json::Value>) -> String {
    body.as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("API error: {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_raw_reading_ignores_remote_status_field() {
        let json = r#"{"timestamp": "2024-01-01T08:00:00Z", "value": 90, "status": "high"}"#;
        let raw: RawReading = serde_json::from_str(json).unwrap();

        assert_eq!(raw.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
        assert_eq!(raw.value, 90);
    }

    #[test]
    fn test_extract_error_message_from_body() {
        let body = serde_json::json!({"message": "token expired"});
        let msg = extract_error_message(StatusCode::UNAUTHORIZED, Some(body));
        assert_eq!(msg, "token expired");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_status() {
        assert_eq!(
            extract_error_message(StatusCode::INTERNAL_SERVER_ERROR, None),
            "API error: 500"
        );
        let body = serde_json::json!({"detail": "unhelpful shape"});
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, Some(body)),
            "API error: 502"
        );
    }

    #[test]
    fn test_url_includes_version_segment() {
        let config = AppConfig {
            base_url: "https://backend.example.com".to_string(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config, TokenStore::new("/tmp/unused-token")).unwrap();
        assert_eq!(
            client.url("/glucose/readings"),
            "https://backend.example.com/v1/glucose/readings"
        );
    }

    /// Bind then drop a listener to get a local port with nothing on it
    fn unreachable_base_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn test_connect_failure_maps_to_source_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            base_url: unreachable_base_url(),
            timeout_secs: 1,
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config, TokenStore::new(dir.path().join("token"))).unwrap();

        assert!(matches!(
            client.get_readings(1).await,
            Err(DashError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_profile_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            name: Some("Alex".to_string()),
            target_range: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Alex"}));
    }
}
