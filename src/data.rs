//! Data-access facade over the synthetic and remote reading sources
//!
//! Both sources are normalized into the canonical `Reading` shape here.
//! A remote failure surfaces as `SourceUnavailable` - falling back to
//! synthetic data is a caller decision, never made silently in this
//! layer.

use log::info;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, RawReading};
use crate::config::AppConfig;
use crate::error::DashError;
use crate::model::Reading;
use crate::synthetic;
use crate::units::Thresholds;

/// Where readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Synthetic,
    Remote,
}

impl DataSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "synthetic" => Some(DataSource::Synthetic),
            "remote" => Some(DataSource::Remote),
            _ => None,
        }
    }
}

/// Facade owning the reading pipeline for the active session
pub struct DataAccess {
    thresholds: Thresholds,
    client: ApiClient,
}

impl DataAccess {
    pub fn new(config: &AppConfig, client: ApiClient) -> Self {
        Self {
            thresholds: config.thresholds,
            client,
        }
    }

    /// Fetch readings covering the last `hours_back` hours from the
    /// requested source.
    pub async fn get_readings(
        &self,
        source: DataSource,
        hours_back: u32,
    ) -> Result<Vec<Reading>, DashError> {
        match source {
            DataSource::Synthetic => {
                let readings = synthetic::generate(hours_back, self.thresholds);
                info!("Generated {} synthetic readings", readings.len());
                Ok(readings)
            }
            DataSource::Remote => {
                let days = hours_back.div_ceil(24).max(1);
                let raw = self.client.get_readings(days).await.map_err(|e| match e {
                    DashError::SourceUnavailable(_) => e,
                    other => DashError::SourceUnavailable(other.to_string()),
                })?;
                info!("Fetched {} readings from remote source", raw.len());
                Ok(normalize_readings(raw, self.thresholds))
            }
        }
    }
}

/// Normalize raw remote records into canonical readings, recomputing
/// status locally so it can never disagree with the value.
pub fn normalize_readings(raw: Vec<RawReading>, thresholds: Thresholds) -> Vec<Reading> {
    raw.into_iter()
        .map(|r| Reading::new(r.timestamp, r.value, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Status;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_data_source_parse() {
        assert_eq!(DataSource::parse("synthetic"), Some(DataSource::Synthetic));
        assert_eq!(DataSource::parse("remote"), Some(DataSource::Remote));
        assert_eq!(DataSource::parse("device"), None);
    }

    #[test]
    fn test_normalization_round_trip() {
        let json = r#"[{"timestamp": "2024-01-01T08:00:00Z", "value": 90, "status": "high"}]"#;
        let raw: Vec<RawReading> = serde_json::from_str(json).unwrap();
        let readings = normalize_readings(raw, Thresholds::default());

        assert_eq!(readings.len(), 1);
        assert_eq!(
            readings[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(readings[0].value, 90);
        // local classification wins over whatever the payload claimed
        assert_eq!(readings[0].status, Status::Normal);
    }

    fn unreachable_access() -> DataAccess {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            base_url: format!("http://127.0.0.1:{}", port),
            timeout_secs: 1,
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config, crate::config::TokenStore::new(dir.path().join("token"))).unwrap();
        DataAccess::new(&config, client)
    }

    #[tokio::test]
    async fn test_remote_failure_surfaces_as_source_unavailable() {
        let access = unreachable_access();
        assert!(matches!(
            access.get_readings(DataSource::Remote, 24).await,
            Err(DashError::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_synthetic_source_needs_no_remote() {
        // the same access whose remote side is dead still serves
        // synthetic readings; switching source is up to the caller
        let access = unreachable_access();
        let readings = access.get_readings(DataSource::Synthetic, 2).await.unwrap();
        assert_eq!(readings.len(), 24);
    }

    #[test]
    fn test_normalization_uses_supplied_thresholds() {
        let raw = vec![RawReading {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            value: 90,
        }];
        let tight = Thresholds::new(100, 140).unwrap();
        assert_eq!(normalize_readings(raw, tight)[0].status, Status::Low);
    }
}
