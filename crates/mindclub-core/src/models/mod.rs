//! Data models for the application
//!
//! Document-backed entities are stored as JSON bodies; the typed inputs here only
//! describe what a write must contain. Media fields stay untyped and are handled
//! by the reconciler through each entity's declared paths.

mod account;
mod document;
mod enrollment;
mod entity;
mod itinerary;
mod media;
mod online_workshop;
mod workshop;

pub use account::*;
pub use document::*;
pub use enrollment::*;
pub use entity::*;
pub use itinerary::*;
pub use media::*;
pub use online_workshop::*;
pub use workshop::*;
