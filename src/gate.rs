//! Remote feature gate
//!
//! The app ships with a remotely-toggled gate: a small JSON document is
//! polled and a named field compared against an expected value. Network
//! trouble or an unexpected document shape reports [`GateStatus::Unknown`]
//! rather than an error; the caller decides what Unknown means for the UI.

use tracing::warn;

use crate::config::GateConfig;

/// Outcome of one gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// The document matched the expected value
    Open,
    /// The document was readable but did not match
    Locked,
    /// The document could not be fetched or read
    Unknown,
}

/// Client polling the remote gate document
pub struct GateClient {
    http: reqwest::Client,
    config: GateConfig,
}

impl GateClient {
    pub fn new(config: GateConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the gate document and compare the configured field
    pub async fn check(&self) -> GateStatus {
        let document = match self.fetch().await {
            Ok(document) => document,
            Err(error) => {
                warn!(url = %self.config.url, %error, "gate check failed");
                return GateStatus::Unknown;
            }
        };
        self.evaluate(&document)
    }

    async fn fetch(&self) -> Result<serde_json::Value, reqwest::Error> {
        self.http
            .get(&self.config.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    fn evaluate(&self, document: &serde_json::Value) -> GateStatus {
        match document.get(&self.config.field).and_then(|v| v.as_str()) {
            Some(value) if value == self.config.expected => GateStatus::Open,
            Some(_) => GateStatus::Locked,
            None => {
                warn!(field = %self.config.field, "gate document missing expected field");
                GateStatus::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GateClient {
        GateClient::new(GateConfig {
            url: "https://vidgate.app/gate.json".to_string(),
            field: "status".to_string(),
            expected: "open".to_string(),
        })
    }

    #[test]
    fn test_matching_document_opens() {
        let doc = serde_json::json!({ "status": "open" });
        assert_eq!(client().evaluate(&doc), GateStatus::Open);
    }

    #[test]
    fn test_mismatching_document_locks() {
        let doc = serde_json::json!({ "status": "maintenance" });
        assert_eq!(client().evaluate(&doc), GateStatus::Locked);
    }

    #[test]
    fn test_wrong_shape_is_unknown() {
        let doc = serde_json::json!({ "status": 7 });
        assert_eq!(client().evaluate(&doc), GateStatus::Unknown);
        let doc = serde_json::json!({ "other": "open" });
        assert_eq!(client().evaluate(&doc), GateStatus::Unknown);
    }
}
