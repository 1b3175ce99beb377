use serde::Deserialize;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Deserialize, Validate)]
pub struct ItineraryInput {
    #[validate(range(min = 1, message = "day must be at least 1"))]
    pub day: u32,
    #[serde(default)]
    #[validate(nested)]
    pub activities: Vec<ItineraryActivityInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ItineraryActivityInput {
    #[validate(custom(function = "not_blank", message = "activity time is required"))]
    pub time: String,
    #[validate(custom(function = "not_blank", message = "activity is required"))]
    pub activity: String,
}

/// Landing pages carry no required fields; every section is optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LandingInput {
    #[serde(default)]
    pub hero: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub agency_section: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub footer: Option<serde_json::Map<String, serde_json::Value>>,
}
