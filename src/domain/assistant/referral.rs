//! Resource referral: recommend nearby support services for a stated need.

use serde::{Deserialize, Serialize};

use super::json::{parse_list, require_text};
use super::{CompletionError, CompletionTemplate, ToolOutcome};
use crate::domain::foundation::{FieldErrors, ValidationError};

const LOCATION_MIN_CHARS: usize = 3;
const NEEDS_MIN_CHARS: usize = 5;

/// Wrapper key of the declared output object.
pub const REFERRAL_WRAPPER_KEY: &str = "resourceRecommendations";

/// Validated referral question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralRequest {
    location: String,
    needs: String,
}

impl ReferralRequest {
    pub fn new(location: &str, needs: &str) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let location = errors.check(min_chars("location", location, LOCATION_MIN_CHARS));
        let needs = errors.check(min_chars("needs", needs, NEEDS_MIN_CHARS));
        match (location, needs) {
            (Some(location), Some(needs)) => Ok(Self { location, needs }),
            _ => Err(errors),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn needs(&self) -> &str {
        &self.needs
    }
}

pub(super) fn min_chars(field: &str, raw: &str, min: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len < min {
        return Err(ValidationError::too_short(field, min, len));
    }
    Ok(trimmed.to_string())
}

/// One recommended resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecommendation {
    pub name: String,
    pub address: String,
}

/// Template for the referral tool.
pub struct ReferralTemplate;

impl CompletionTemplate for ReferralTemplate {
    type Request = ReferralRequest;
    type Output = ToolOutcome<ResourceRecommendation>;

    const NAME: &'static str = "resource_referral";

    fn render(request: &ReferralRequest) -> String {
        format!(
            "You are an expert at recommending resources to people in need based on their location.\n\
             \n\
             You will use the location and needs of the user to find and recommend resources that can help them.\n\
             \n\
             Location: {location}\n\
             Needs: {needs}\n\
             \n\
             For each recommendation, provide the name of the resource and its full, physical address. \
             Recommend resources that are relevant to the user's needs and are located near the user.\n\
             \n\
             Respond with JSON only, in exactly this shape:\n\
             {{\"{key}\": [{{\"name\": \"<resource name>\", \"address\": \"<full physical address>\"}}]}}\n\
             Use an empty array if you know of no suitable resource.",
            location = request.location,
            needs = request.needs,
            key = REFERRAL_WRAPPER_KEY,
        )
    }

    fn parse(reply: &str) -> Result<Self::Output, CompletionError> {
        let items: Vec<ResourceRecommendation> = parse_list(reply, REFERRAL_WRAPPER_KEY)?;
        for item in &items {
            require_text("name", &item.name)?;
            require_text("address", &item.address)?;
        }
        Ok(ToolOutcome::from_list(items))
    }
}
