//! IncidentType enum for classifying reported incidents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Category of gender-based violence being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Physical,
    Emotional,
    Sexual,
    Economic,
    Stalking,
    Other,
}

impl IncidentType {
    /// All incident types in display order.
    pub const ALL: [IncidentType; 6] = [
        IncidentType::Physical,
        IncidentType::Emotional,
        IncidentType::Sexual,
        IncidentType::Economic,
        IncidentType::Stalking,
        IncidentType::Other,
    ];

    /// Wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Physical => "physical",
            IncidentType::Emotional => "emotional",
            IncidentType::Sexual => "sexual",
            IncidentType::Economic => "economic",
            IncidentType::Stalking => "stalking",
            IncidentType::Other => "other",
        }
    }

    /// Human-readable label shown next to a report.
    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Physical => "Physical Abuse",
            IncidentType::Emotional => "Emotional/Psychological Abuse",
            IncidentType::Sexual => "Sexual Harassment/Abuse",
            IncidentType::Economic => "Economic Abuse",
            IncidentType::Stalking => "Stalking",
            IncidentType::Other => "Other",
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IncidentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("incident_type"));
        }
        IncidentType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "incident_type",
                    format!("unknown incident type '{}'", s.trim()),
                )
            })
    }
}
