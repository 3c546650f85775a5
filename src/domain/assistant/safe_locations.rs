//! Safe-location finder: police stations, fire stations and hospitals nearby.

use serde::{Deserialize, Serialize};

use super::json::{parse_list, require_text};
use super::referral::min_chars;
use super::{CompletionError, CompletionTemplate, ToolOutcome};
use crate::domain::foundation::FieldErrors;

const USER_LOCATION_MIN_CHARS: usize = 3;

/// Wrapper key of the declared output object.
pub const SAFE_LOCATIONS_WRAPPER_KEY: &str = "safeLocations";

/// Validated location the user is searching from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeLocationsRequest {
    user_location: String,
}

impl SafeLocationsRequest {
    pub fn new(user_location: &str) -> Result<Self, FieldErrors> {
        let user_location = min_chars("user_location", user_location, USER_LOCATION_MIN_CHARS)?;
        Ok(Self { user_location })
    }

    pub fn user_location(&self) -> &str {
        &self.user_location
    }
}

/// A nearby place where the user can seek safety.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeLocation {
    pub name: String,
    pub address: String,
    pub description: String,
}

/// Template for the safe-location tool.
pub struct SafeLocationsTemplate;

impl CompletionTemplate for SafeLocationsTemplate {
    type Request = SafeLocationsRequest;
    type Output = ToolOutcome<SafeLocation>;

    const NAME: &'static str = "safe_locations";

    fn render(request: &SafeLocationsRequest) -> String {
        format!(
            "You are an AI assistant designed to help users find safe locations near them. \
             The user will provide their current location, and you should find a list of nearby \
             safe locations such as police stations, fire stations, and hospitals. \
             Provide the address and a brief description of each location.\n\
             \n\
             User Location: {user_location}\n\
             \n\
             Respond with JSON only, in exactly this shape:\n\
             {{\"{key}\": [{{\"name\": \"<place name>\", \"address\": \"<full address>\", \"description\": \"<one sentence>\"}}]}}\n\
             Use an empty array if you know of no safe location nearby.",
            user_location = request.user_location,
            key = SAFE_LOCATIONS_WRAPPER_KEY,
        )
    }

    fn parse(reply: &str) -> Result<Self::Output, CompletionError> {
        let items: Vec<SafeLocation> = parse_list(reply, SAFE_LOCATIONS_WRAPPER_KEY)?;
        for item in &items {
            require_text("name", &item.name)?;
            require_text("address", &item.address)?;
        }
        Ok(ToolOutcome::from_list(items))
    }
}
