use crate::domain::task::Priority;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePriority {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySuggestion {
    pub suggested_priority: Priority,
    pub reason: String,
    pub confidence: f64,
}

impl PrioritySuggestion {
    pub fn fallback() -> Self {
        Self {
            suggested_priority: Priority::Medium,
            reason: "Priority service unavailable".to_string(),
            confidence: 0.5,
        }
    }
}

/// Client for the external priority-analysis service. Advisory only: any
/// failure degrades to a fixed default suggestion, never an error.
pub struct PriorityClient {
    http: reqwest::Client,
    base_url: String,
}

impl PriorityClient {
    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    #[instrument(skip(self, req), fields(title = %req.title))]
    pub async fn analyze(&self, req: &AnalyzePriority) -> PrioritySuggestion {
        match self.request_analysis(req).await {
            Ok(suggestion) => {
                debug!(
                    priority = ?suggestion.suggested_priority,
                    confidence = suggestion.confidence,
                    "Priority suggestion received"
                );
                suggestion
            }
            Err(e) => {
                warn!(error = %e, "Priority service call failed, using default suggestion");
                PrioritySuggestion::fallback()
            }
        }
    }

    async fn request_analysis(&self, req: &AnalyzePriority) -> Result<PrioritySuggestion> {
        let url = format!("{}/analyze", self.base_url.trim_end_matches('/'));
        let response = self.http.post(&url).json(req).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "priority service returned status {}",
                response.status()
            ));
        }

        Ok(response.json::<PrioritySuggestion>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_suggestion_is_medium_with_half_confidence() {
        let fallback = PrioritySuggestion::fallback();
        assert_eq!(fallback.suggested_priority, Priority::Medium);
        assert_eq!(fallback.confidence, 0.5);
    }

    #[test]
    fn test_suggestion_json_shape() {
        let json = serde_json::to_value(PrioritySuggestion::fallback()).unwrap();
        assert_eq!(json["suggestedPriority"], "Medium");
        assert_eq!(json["confidence"], 0.5);
        assert!(json.get("reason").is_some());
    }

    #[test]
    fn test_request_omits_absent_optional_fields() {
        let req = AnalyzePriority {
            title: "Buy milk".to_string(),
            description: None,
            deadline: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["title"], "Buy milk");
        assert!(json.get("description").is_none());
        assert!(json.get("deadline").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_service_degrades_to_fallback() {
        // Nothing listens on this port
        let client = PriorityClient::new("http://127.0.0.1:9".to_string()).unwrap();
        let suggestion = client
            .analyze(&AnalyzePriority {
                title: "Buy milk".to_string(),
                description: None,
                deadline: None,
            })
            .await;

        assert_eq!(suggestion, PrioritySuggestion::fallback());
    }
}
