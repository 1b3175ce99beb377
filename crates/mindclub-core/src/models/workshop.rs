use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WorkshopType {
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "on field")]
    OnField,
}

/// Required shape of an on-field workshop document. Media-bearing fields are not
/// part of this type; they are handled by the reconciler through declared paths.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkshopInput {
    #[validate(nested)]
    pub header: WorkshopHeaderInput,
    pub workshop_type: WorkshopType,
    #[validate(nested)]
    pub about: WorkshopAboutInput,
    #[validate(custom(function = "not_blank", message = "startDate is required"))]
    pub start_date: String,
    #[validate(custom(function = "not_blank", message = "endDate is required"))]
    pub end_date: String,
    #[serde(default)]
    #[validate(nested)]
    pub itinerary: Vec<WorkshopItineraryDayInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkshopHeaderInput {
    #[validate(custom(function = "not_blank", message = "header.title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "header.description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkshopAboutInput {
    #[validate(custom(function = "not_blank", message = "about.title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "about.description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkshopItineraryDayInput {
    #[validate(custom(function = "not_blank", message = "itinerary title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "itinerary description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(nested)]
    pub activities: Vec<WorkshopActivityInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkshopActivityInput {
    #[validate(custom(function = "not_blank", message = "activity color is required"))]
    pub color: String,
}
