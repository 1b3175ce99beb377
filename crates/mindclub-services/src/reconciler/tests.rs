use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use mindclub_storage::LocalStorage;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::testing::RecordingMediaStore;

struct Fixture {
    _dir: TempDir,
    media: Arc<RecordingMediaStore>,
    reconciler: MediaReconciler,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalStorage::new(dir.path(), "http://localhost:5000/media".to_string())
        .await
        .unwrap();
    let media = Arc::new(RecordingMediaStore::new(Arc::new(local)));
    let reconciler = MediaReconciler::new(
        media.clone(),
        ImageNormalizer::default(),
        ReconcilerSettings::default(),
    );
    Fixture {
        _dir: dir,
        media,
        reconciler,
    }
}

fn png_data_uri(width: u32, height: u32) -> String {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 80, 20])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(buf.into_inner()))
}

fn uploaded_dimensions(media: &RecordingMediaStore) -> Vec<(u32, u32)> {
    media
        .uploads()
        .iter()
        .map(|u| image::load_from_memory(&u.data).unwrap().dimensions())
        .collect()
}

#[tokio::test]
async fn test_resolve_uploads_every_inline_field_and_keeps_plain_values() {
    let f = fixture().await;
    let payload = json!({
        "header": {"title": "Spiti", "image": png_data_uri(32, 16)},
        "brochure": "abc",
        "itinerary": [
            {"activities": [{"image": {"imageOrVideo": png_data_uri(8, 8)}}]}
        ]
    });

    let resolved = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap();

    assert_eq!(f.media.upload_count(), 2);
    assert_eq!(resolved["brochure"], "abc");
    assert_eq!(resolved["header"]["title"], "Spiti");

    let header = &resolved["header"]["image"];
    assert!(header["url"].as_str().unwrap().starts_with("http://localhost:5000/media/"));
    assert!(!header["fileId"].as_str().unwrap().is_empty());

    let activity = &resolved["itinerary"][0]["activities"][0]["image"]["imageOrVideo"];
    assert!(activity["fileId"].is_string());
    assert_ne!(activity["fileId"], header["fileId"]);

    for upload in f.media.uploads() {
        assert_eq!(upload.folder, "workshops");
        assert!(upload.file_name.starts_with("image_"));
        assert!(upload.file_name.ends_with(".jpg"));
    }
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let f = fixture().await;
    let payload = json!({"hero": {"backgroundImageOrVideo": png_data_uri(4, 4)}});

    let first = f.reconciler.resolve(EntityKind::Landing, &payload).await.unwrap();
    f.media.reset();
    let second = f.reconciler.resolve(EntityKind::Landing, &first).await.unwrap();

    assert_eq!(f.media.upload_count(), 0);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolve_leaves_input_untouched() {
    let f = fixture().await;
    let payload = json!({"footer": {"logoOrVideo": png_data_uri(4, 4)}});
    let before = payload.clone();

    let resolved = f.reconciler.resolve(EntityKind::Landing, &payload).await.unwrap();

    assert_eq!(payload, before);
    assert_ne!(resolved, before);
}

#[tokio::test]
async fn test_wrapper_keeps_sibling_keys() {
    let f = fixture().await;
    let payload = json!({
        "about": {"workshopVisual": [
            {"imageOrVideo": {"url": png_data_uri(4, 4), "caption": "Sunrise at Kaza"}}
        ]}
    });

    let resolved = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap();
    let visual = &resolved["about"]["workshopVisual"][0]["imageOrVideo"];

    assert_eq!(visual["caption"], "Sunrise at Kaza");
    assert!(visual["fileId"].is_string());
    assert!(visual["url"].as_str().unwrap().starts_with("http"));
}

#[tokio::test]
async fn test_standard_images_are_capped() {
    let f = fixture().await;
    let payload = json!({"hero": {"badgeImageOrVideo": png_data_uri(3840, 1080)}});

    f.reconciler.resolve(EntityKind::Landing, &payload).await.unwrap();

    assert_eq!(uploaded_dimensions(&f.media), vec![(1920, 540)]);
}

#[tokio::test]
async fn test_avatars_use_the_square_cap() {
    let f = fixture().await;
    let payload = json!({"name": "Asha", "avatar": png_data_uri(1024, 768)});

    f.reconciler.resolve(EntityKind::UserProfile, &payload).await.unwrap();

    assert_eq!(uploaded_dimensions(&f.media), vec![(512, 384)]);
    assert_eq!(f.media.uploads()[0].folder, "avatars");
}

#[tokio::test]
async fn test_small_images_are_not_upscaled() {
    let f = fixture().await;
    let payload = json!({"activities": [{"image": png_data_uri(40, 30)}]});

    f.reconciler.resolve(EntityKind::Itinerary, &payload).await.unwrap();

    assert_eq!(uploaded_dimensions(&f.media), vec![(40, 30)]);
}

#[tokio::test]
async fn test_corrupt_image_fails_with_decode_error() {
    let f = fixture().await;
    let payload = json!({"header": {"image": "data:image/png;base64,bm90IGFuIGltYWdl"}});

    let err = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap_err();

    assert!(matches!(err, AppError::MediaDecode(_)));
    assert_eq!(f.media.upload_count(), 0);
}

#[tokio::test]
async fn test_bad_base64_fails_with_decode_error() {
    let f = fixture().await;
    let payload = json!({"brochure": "data:application/pdf;base64,***"});

    let err = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap_err();
    assert!(matches!(err, AppError::MediaDecode(_)));
}

#[tokio::test]
async fn test_non_images_upload_raw_bytes() {
    let f = fixture().await;
    let payload = json!({"header": {"watchTrailer": "data:video/mp4;base64,AAAAIGZ0eXA="}});

    let resolved = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap();

    let uploads = f.media.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(&uploads[0].data[..], STANDARD.decode("AAAAIGZ0eXA=").unwrap().as_slice());
    assert!(uploads[0].file_name.starts_with("video_"));
    assert!(uploads[0].file_name.ends_with(".mp4"));
    assert!(resolved["header"]["watchTrailer"]["fileId"].is_string());
}

#[tokio::test]
async fn test_upload_failure_maps_to_media_upload() {
    let f = fixture().await;
    f.media.fail_uploads(true);
    let payload = json!({"brochure": "data:application/pdf;base64,JVBERi0xLjQ="});

    let err = f.reconciler.resolve(EntityKind::Workshop, &payload).await.unwrap_err();
    assert!(matches!(err, AppError::MediaUpload(_)));
}

#[tokio::test]
async fn test_reconcile_deletes_exactly_the_orphans() {
    let f = fixture().await;
    let old = json!({
        "header": {"image": {"url": "u1", "fileId": "keep"}},
        "brochure": {"url": "u2", "fileId": "gone"},
        "legacy": {"nested": {"fileId": "also-gone"}}
    });
    let new = json!({
        "header": {"image": {"url": "u1", "fileId": "keep"}},
        "brochure": {"url": "u3", "fileId": "fresh"}
    });

    let report = f.reconciler.reconcile_after_update(&old, &new).await;

    let mut attempted = f.media.deletes();
    attempted.sort();
    assert_eq!(attempted, vec!["also-gone", "gone"]);
    assert_eq!(report.deleted, vec!["also-gone", "gone"]);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_unchanged_document_deletes_nothing() {
    let f = fixture().await;
    let doc = json!({"avatar": {"url": "u", "fileId": "a"}});

    let report = f.reconciler.reconcile_after_update(&doc, &doc).await;

    assert_eq!(report.attempted(), 0);
    assert!(f.media.deletes().is_empty());
}

#[tokio::test]
async fn test_delete_failures_are_reported_not_raised() {
    let f = fixture().await;
    f.media.fail_delete_of("b");
    let doc = json!({"x": [{"fileId": "a"}, {"fileId": "b"}, {"fileId": "c"}]});

    let report = f.reconciler.delete_all(&doc).await;

    assert_eq!(report.deleted, vec!["a", "c"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_id, "b");
    assert!(!report.is_clean());
    assert_eq!(report.attempted(), 3);
}

#[tokio::test]
async fn test_upload_image_uses_upload_folder() {
    let f = fixture().await;

    let reference = f.reconciler.upload_image(&png_data_uri(10, 10)).await.unwrap();

    let uploads = f.media.uploads();
    assert_eq!(uploads[0].folder, "/mind-club");
    assert_eq!(uploads[0].file_id, reference.file_id);
}

#[tokio::test]
async fn test_upload_image_rejects_other_media() {
    let f = fixture().await;

    let err = f
        .reconciler
        .upload_image("data:application/pdf;base64,JVBERi0xLjQ=")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = f.reconciler.upload_image("https://cdn/x.png").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(f.media.upload_count(), 0);
}
