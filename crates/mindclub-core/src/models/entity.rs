//! Entity registry
//!
//! Each document-backed entity declares where its media lives. The declared
//! path list is the single source of truth the reconciler walks; adding a media
//! field to an entity means adding one path here.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::models::account::{UserProfileInput, PROFILE_FIELDS};
use crate::models::document::{Collection, SortSpec};
use crate::models::itinerary::{ItineraryInput, LandingInput};
use crate::models::media::ImageClass;
use crate::models::online_workshop::OnlineWorkshopInput;
use crate::models::workshop::WorkshopInput;

/// One step of a media path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Descend into an object key
    Key(String),
    /// Descend into an object key holding an array; the rest of the path
    /// applies to every element
    Each(String),
}

/// A declared media location, e.g. `itinerary[].activities[].image.imageOrVideo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPath {
    raw: &'static str,
    segments: Vec<PathSegment>,
    class: ImageClass,
}

impl MediaPath {
    pub fn parse(raw: &'static str, class: ImageClass) -> Self {
        let segments = raw
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|segment| match segment.strip_suffix("[]") {
                Some(key) => PathSegment::Each(key.to_string()),
                None => PathSegment::Key(segment.to_string()),
            })
            .collect();
        Self {
            raw,
            segments,
            class,
        }
    }

    pub fn standard(raw: &'static str) -> Self {
        Self::parse(raw, ImageClass::Standard)
    }

    pub fn avatar(raw: &'static str) -> Self {
        Self::parse(raw, ImageClass::Avatar)
    }

    pub fn as_str(&self) -> &'static str {
        self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn class(&self) -> ImageClass {
        self.class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Workshop,
    OnlineWorkshop,
    Landing,
    Itinerary,
    UserProfile,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Workshop,
        EntityKind::OnlineWorkshop,
        EntityKind::Landing,
        EntityKind::Itinerary,
        EntityKind::UserProfile,
    ];

    pub fn collection(&self) -> Collection {
        match self {
            EntityKind::Workshop => Collection::Workshops,
            EntityKind::OnlineWorkshop => Collection::OnlineWorkshops,
            EntityKind::Landing => Collection::Landings,
            EntityKind::Itinerary => Collection::Itineraries,
            EntityKind::UserProfile => Collection::Accounts,
        }
    }

    /// Human-readable name used in messages ("Workshop not found")
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Workshop => "Workshop",
            EntityKind::OnlineWorkshop => "Online workshop",
            EntityKind::Landing => "Landing page",
            EntityKind::Itinerary => "Itinerary",
            EntityKind::UserProfile => "User",
        }
    }

    pub fn media_paths(&self) -> Vec<MediaPath> {
        match self {
            EntityKind::Workshop => vec![
                MediaPath::standard("header.image"),
                MediaPath::standard("header.watchTrailer"),
                MediaPath::standard("brochure"),
                MediaPath::standard("about.workshopVisual[].imageOrVideo"),
                MediaPath::standard("location.locationBlog[].imageOrVideo"),
                MediaPath::standard("itinerary[].itineraryBanner"),
                MediaPath::standard("itinerary[].activities[].image.imageOrVideo"),
            ],
            EntityKind::OnlineWorkshop => vec![
                MediaPath::standard("workshopHeader.thumbnail"),
                MediaPath::standard("workshopHeader.coverImage"),
                MediaPath::standard("projects.items[].image"),
                MediaPath::standard("aboutMentors.mentors[].photo"),
            ],
            EntityKind::Landing => vec![
                MediaPath::standard("hero.backgroundImageOrVideo"),
                MediaPath::standard("hero.badgeImageOrVideo"),
                MediaPath::standard("agencySection.imageOrVideo"),
                MediaPath::standard("footer.logoOrVideo"),
            ],
            EntityKind::Itinerary => vec![MediaPath::standard("activities[].image")],
            EntityKind::UserProfile => vec![MediaPath::avatar("avatar")],
        }
    }

    pub fn default_sort(&self) -> SortSpec {
        match self {
            EntityKind::Itinerary => SortSpec::ascending("day"),
            _ => SortSpec::NEWEST_FIRST,
        }
    }

    /// Reject a payload missing required fields, before any media or store work.
    pub fn validate(&self, payload: &Value) -> Result<(), AppError> {
        if !payload.is_object() {
            return Err(AppError::Validation(format!(
                "{} payload must be a JSON object",
                self.display_name()
            )));
        }
        match self {
            EntityKind::Workshop => check::<WorkshopInput>(payload),
            EntityKind::OnlineWorkshop => check::<OnlineWorkshopInput>(payload),
            EntityKind::Landing => check::<LandingInput>(payload),
            EntityKind::Itinerary => check::<ItineraryInput>(payload),
            EntityKind::UserProfile => check::<UserProfileInput>(payload),
        }
    }

    /// Body to persist for an update. Profiles only accept profile fields on top
    /// of the stored account; every other entity is replaced wholesale.
    pub fn merge_update(&self, stored: &Value, payload: Value) -> Value {
        match self {
            EntityKind::UserProfile => {
                let mut merged = stored.clone();
                if let (Value::Object(target), Value::Object(incoming)) = (&mut merged, payload) {
                    for (key, value) in incoming {
                        if PROFILE_FIELDS.contains(&key.as_str()) {
                            target.insert(key, value);
                        }
                    }
                }
                merged
            }
            _ => payload,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            EntityKind::Workshop => "workshop",
            EntityKind::OnlineWorkshop => "online_workshop",
            EntityKind::Landing => "landing",
            EntityKind::Itinerary => "itinerary",
            EntityKind::UserProfile => "user_profile",
        };
        f.write_str(name)
    }
}

fn check<'de, T>(payload: &'de Value) -> Result<(), AppError>
where
    T: Deserialize<'de> + Validate,
{
    let input = T::deserialize(payload).map_err(|e| AppError::Validation(e.to_string()))?;
    input.validate()?;
    Ok(())
}
