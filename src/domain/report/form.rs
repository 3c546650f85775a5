//! Incident report form and its field validation.
//!
//! Validation is purely local: it runs before any identity or store call,
//! so a rejected form never causes network traffic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::IncidentType;
use crate::domain::foundation::{FieldErrors, ValidationError};

/// Minimum description length, in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// Earliest incident date the form accepts.
pub const EARLIEST_INCIDENT_DATE: (i32, u32, u32) = (1900, 1, 1);

/// Raw values as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReportForm {
    pub incident_type: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub incident_date: String,
    pub location: Option<String>,
    pub description: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIncidentReport {
    pub incident_type: IncidentType,
    pub incident_date: NaiveDate,
    pub location: Option<String>,
    pub description: String,
}

impl IncidentReportForm {
    /// Validates every field against `today`, collecting one error per field.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidIncidentReport, FieldErrors> {
        let mut errors = FieldErrors::new();

        let incident_type = errors.check(self.incident_type.parse::<IncidentType>());
        let incident_date = errors.check(parse_incident_date(&self.incident_date, today));
        let description = errors.check(validate_description(&self.description));

        match (incident_type, incident_date, description) {
            (Some(incident_type), Some(incident_date), Some(description)) if errors.is_empty() => {
                Ok(ValidIncidentReport {
                    incident_type,
                    incident_date,
                    location: normalize_location(self.location.as_deref()),
                    description,
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_incident_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("incident_date"));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ValidationError::invalid_format("incident_date", "expected a date as YYYY-MM-DD")
    })?;

    let (y, m, d) = EARLIEST_INCIDENT_DATE;
    let earliest = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    if date < earliest {
        return Err(ValidationError::invalid_format(
            "incident_date",
            "date cannot be before 1900-01-01",
        ));
    }
    if date > today {
        return Err(ValidationError::invalid_format(
            "incident_date",
            "date cannot be in the future",
        ));
    }

    Ok(date)
}

fn validate_description(raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::empty_field("description"));
    }

    let len = raw.chars().count();
    if len < DESCRIPTION_MIN_CHARS {
        return Err(ValidationError::too_short(
            "description",
            DESCRIPTION_MIN_CHARS,
            len,
        ));
    }
    if len > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::too_long(
            "description",
            DESCRIPTION_MAX_CHARS,
            len,
        ));
    }

    Ok(raw.to_string())
}

fn normalize_location(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_form() -> IncidentReportForm {
        IncidentReportForm {
            incident_type: "physical".to_string(),
            incident_date: "2024-01-01".to_string(),
            location: Some("Nairobi".to_string()),
            description: "Detailed account of an incident exceeding ten characters."
                .to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        let valid = valid_form().validate(today()).unwrap();
        assert_eq!(valid.incident_type, IncidentType::Physical);
        assert_eq!(valid.incident_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(valid.location.as_deref(), Some("Nairobi"));
    }

    #[test]
    fn blank_location_is_normalized_to_none() {
        let mut form = valid_form();
        form.location = Some("   ".to_string());
        assert_eq!(form.validate(today()).unwrap().location, None);

        form.location = None;
        assert_eq!(form.validate(today()).unwrap().location, None);
    }

    #[test]
    fn missing_type_is_rejected() {
        let mut form = valid_form();
        form.incident_type = String::new();
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.contains("incident_type"));
    }

    #[test]
    fn future_date_is_rejected() {
        let mut form = valid_form();
        form.incident_date = "2024-06-02".to_string();
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.get("incident_date").unwrap().contains("future"));
    }

    #[test]
    fn today_is_accepted() {
        let mut form = valid_form();
        form.incident_date = "2024-06-01".to_string();
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn date_before_1900_is_rejected() {
        let mut form = valid_form();
        form.incident_date = "1899-12-31".to_string();
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.contains("incident_date"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut form = valid_form();
        form.incident_date = "01/01/2024".to_string();
        let errors = form.validate(today()).unwrap_err();
        assert!(errors.get("incident_date").unwrap().contains("YYYY-MM-DD"));
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let form = IncidentReportForm::default();
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn description_length_counts_characters_not_bytes() {
        let mut form = valid_form();
        form.description = "ü".repeat(DESCRIPTION_MIN_CHARS);
        assert!(form.validate(today()).is_ok());
    }

    proptest! {
        #[test]
        fn short_descriptions_are_rejected(description in "[a-z]{1,9}") {
            let mut form = valid_form();
            form.description = description;
            let errors = form.validate(today()).unwrap_err();
            prop_assert!(errors.contains("description"));
        }

        #[test]
        fn long_descriptions_are_rejected(description in "[a-z]{5001,5200}") {
            let mut form = valid_form();
            form.description = description;
            let errors = form.validate(today()).unwrap_err();
            prop_assert!(errors.contains("description"));
        }

        #[test]
        fn in_range_descriptions_are_accepted(description in "[a-z]{10,5000}") {
            let mut form = valid_form();
            form.description = description.clone();
            let valid = form.validate(today()).unwrap();
            prop_assert_eq!(valid.description, description);
        }
    }
}
