use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::not_blank;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Keys hidden from callers who are not enrolled in the workshop.
pub const MEETING_SECRET_KEYS: [&str; 3] = ["meetingLink", "meetingPassword", "meetingID"];

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnlineWorkshopInput {
    #[validate(nested)]
    pub workshop_header: OnlineWorkshopHeaderInput,
    #[validate(nested)]
    pub price: PriceInput,
    #[validate(nested)]
    pub workshop_highlights: HighlightsInput,
    #[validate(nested)]
    pub about_workshop: DescribedSectionInput,
    #[validate(nested)]
    pub projects: DescribedSectionInput,
    #[validate(nested)]
    pub topics: TopicsInput,
    #[validate(nested)]
    pub about_mentors: AboutMentorsInput,
    #[validate(custom(function = "not_blank", message = "meetingLink is required"))]
    pub meeting_link: String,
    #[validate(custom(function = "not_blank", message = "meetingPassword is required"))]
    pub meeting_password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnlineWorkshopHeaderInput {
    #[validate(custom(function = "not_blank", message = "workshopHeader.title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "workshopHeader.startDate is required"))]
    pub start_date: String,
    #[validate(custom(function = "not_blank", message = "workshopHeader.endDate is required"))]
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PriceInput {
    #[validate(range(min = 0.0, message = "price.amount must not be negative"))]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PriceInput {
    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Spots {
    Limited,
    Unlimited,
    #[serde(rename = "10-20")]
    From10To20,
    #[serde(rename = "20-30")]
    From20To30,
    #[serde(rename = "30-50")]
    From30To50,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Online,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HighlightsInput {
    #[validate(custom(function = "not_blank", message = "workshopHighlights.duration is required"))]
    pub duration: String,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
    #[serde(default)]
    pub spots: Option<Spots>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DescribedSectionInput {
    #[validate(custom(function = "not_blank", message = "description is required"))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TopicsInput {
    #[validate(custom(function = "not_blank", message = "topics.title is required"))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AboutMentorsInput {
    #[validate(custom(function = "not_blank", message = "aboutMentors.title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "aboutMentors.subtitle is required"))]
    pub subtitle: String,
}
