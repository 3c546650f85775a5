//! HTTP DTOs for the assistant tools.
//!
//! These bodies use snake_case field names.

use serde::{Deserialize, Serialize};

use crate::domain::assistant::{ResourceRecommendation, SafeLocation, ToolOutcome};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FindSupportRequest {
    pub location: String,
    pub needs: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FindSafeLocationsRequest {
    pub user_location: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChatMessageRequest {
    pub message: String,
}

/// Whether a list tool had anything to suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Found,
    Empty,
}

fn split_outcome<T>(outcome: ToolOutcome<T>) -> (ToolStatus, Vec<T>) {
    match outcome {
        ToolOutcome::Found(items) => (ToolStatus::Found, items),
        ToolOutcome::Empty => (ToolStatus::Empty, Vec::new()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FindSupportResponse {
    pub status: ToolStatus,
    pub resource_recommendations: Vec<ResourceRecommendation>,
}

impl From<ToolOutcome<ResourceRecommendation>> for FindSupportResponse {
    fn from(outcome: ToolOutcome<ResourceRecommendation>) -> Self {
        let (status, resource_recommendations) = split_outcome(outcome);
        Self {
            status,
            resource_recommendations,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FindSafeLocationsResponse {
    pub status: ToolStatus,
    pub safe_locations: Vec<SafeLocation>,
}

impl From<ToolOutcome<SafeLocation>> for FindSafeLocationsResponse {
    fn from(outcome: ToolOutcome<SafeLocation>) -> Self {
        let (status, safe_locations) = split_outcome(outcome);
        Self {
            status,
            safe_locations,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReplyResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GreetingResponse {
    pub greeting: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outcome_serializes_with_empty_list() {
        let json = serde_json::to_value(FindSafeLocationsResponse::from(ToolOutcome::Empty)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "empty", "safe_locations": []}));
    }

    #[test]
    fn found_outcome_keeps_entries() {
        let outcome = ToolOutcome::Found(vec![ResourceRecommendation {
            name: "Hope House".to_string(),
            address: "123 Elm St".to_string(),
        }]);
        let json = serde_json::to_value(FindSupportResponse::from(outcome)).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["resource_recommendations"][0]["name"], "Hope House");
    }
}
