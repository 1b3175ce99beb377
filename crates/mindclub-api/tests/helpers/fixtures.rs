//! Test fixtures: inline media and valid entity payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;

/// PNG of the given size as a base64 data URI.
pub fn png_data_uri(width: u32, height: u32) -> String {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// JPEG of the given size as a base64 data URI.
pub fn jpeg_data_uri(width: u32, height: u32) -> String {
    let img = RgbImage::from_pixel(width, height, Rgb([220, 180, 60]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .expect("Failed to encode JPEG");
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}

/// Tiny PDF as a data URI; stored as-is without image processing.
pub const PDF_DATA_URI: &str = "data:application/pdf;base64,JVBERi0xLjQ=";

pub fn workshop_payload(image: Value) -> Value {
    json!({
        "header": {
            "title": "Spiti Valley",
            "description": "Ten days in the mountains",
            "image": image
        },
        "workshopType": "on field",
        "about": {"title": "About", "description": "Photography retreat"},
        "startDate": "2026-05-01",
        "endDate": "2026-05-10",
        "itinerary": []
    })
}

pub fn online_workshop_payload(amount: f64) -> Value {
    json!({
        "workshopHeader": {"title": "Street Photography", "startDate": "2026-03-01", "endDate": "2026-03-02"},
        "price": {"amount": amount},
        "workshopHighlights": {"duration": "2 days", "spots": "10-20"},
        "aboutWorkshop": {"description": "Learn to see"},
        "projects": {"description": "Mentor portfolio"},
        "topics": {"title": "Composition"},
        "aboutMentors": {"title": "Mentors", "subtitle": "Who teaches"},
        "meetingLink": "https://meet.example.com/abc",
        "meetingPassword": "secret",
        "meetingID": "987 654"
    })
}

pub fn landing_payload(logo: Value) -> Value {
    json!({
        "hero": {"title": "Mind Club"},
        "footer": {"logoOrVideo": logo}
    })
}
