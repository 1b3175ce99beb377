//! Account and role checks.
//!
//! Run with: `cargo test -p mindclub-api --test auth_test`

mod helpers;

use helpers::auth::{register_admin, signup_user};
use helpers::fixtures::{landing_payload, png_data_uri};
use helpers::{api_path, setup_test_app, TEST_ADMIN_KEY};
use mindclub_core::models::AccountRole;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn test_signup_returns_token_and_profile() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/users/signup"))
        .json(&json!({
            "name": "Asha",
            "email": "  Asha@Example.com ",
            "password": "hunter22",
            "phone": "+91 98000 00000"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<Value>();
    assert!(body["data"]["token"].is_string());
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "asha@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let app = setup_test_app().await;
    let client = app.client();
    signup_user(client, "dup@example.com").await;

    let response = client
        .post(&api_path("/users/signup"))
        .json(&json!({"name": "Again", "email": "DUP@example.com", "password": "hunter22"}))
        .await;
    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn test_signup_validates_input() {
    let app = setup_test_app().await;
    let response = app
        .client()
        .post(&api_path("/users/signup"))
        .json(&json!({"name": "Short", "email": "not-an-email", "password": "123"}))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signin_checks_password() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "signin@example.com").await;

    let wrong = client
        .post(&api_path("/users/signin"))
        .json(&json!({"email": "signin@example.com", "password": "nope-nope"}))
        .await;
    assert_eq!(wrong.status_code(), 400);

    let unknown = client
        .post(&api_path("/users/signin"))
        .json(&json!({"email": "ghost@example.com", "password": "TestPassword123!"}))
        .await;
    assert_eq!(unknown.status_code(), 400);
    assert_eq!(
        wrong.json::<Value>()["error"],
        unknown.json::<Value>()["error"]
    );

    let ok = client
        .post(&api_path("/users/signin"))
        .json(&json!({"email": "SIGNIN@example.com", "password": "TestPassword123!"}))
        .await;
    assert_eq!(ok.status_code(), 200);
    assert_eq!(ok.json::<Value>()["data"]["user"]["_id"], user.id.to_string());
}

#[tokio::test]
async fn test_me_requires_a_token() {
    let app = setup_test_app().await;
    let client = app.client();

    assert_eq!(client.get(&api_path("/users/me")).await.status_code(), 401);

    let bad = client
        .get(&api_path("/users/me"))
        .authorization_bearer("not.a.jwt")
        .await;
    assert_eq!(bad.status_code(), 401);

    let user = signup_user(client, "me@example.com").await;
    let me = client
        .get(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .await;
    assert_eq!(me.status_code(), 200);
    assert_eq!(me.json::<Value>()["data"]["email"], "me@example.com");
}

#[tokio::test]
async fn test_profile_update_ignores_protected_fields() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "profile@example.com").await;

    let response = client
        .put(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .json(&json!({
            "name": "Renamed",
            "bio": "Landscape photographer",
            "role": "admin",
            "email": "hijack@example.com"
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let profile = &response.json::<Value>()["data"];
    assert_eq!(profile["name"], "Renamed");
    assert_eq!(profile["bio"], "Landscape photographer");
    assert_eq!(profile["role"], "user");
    assert_eq!(profile["email"], "profile@example.com");
}

#[tokio::test]
async fn test_replacing_avatar_deletes_previous_one() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "avatar@example.com").await;

    let first = client
        .put(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .json(&json!({"name": "Test User", "avatar": png_data_uri(600, 600)}))
        .await;
    assert_eq!(first.status_code(), 200);
    let first_id = app.media.uploads()[0].file_id.clone();
    assert!(first_id.starts_with("avatars/"));

    let second = client
        .put(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .json(&json!({"name": "Test User", "avatar": png_data_uri(300, 300)}))
        .await;

    assert_eq!(second.status_code(), 200);
    let body = second.json::<Value>();
    assert_eq!(body["cleanup"]["deleted"], 1);
    assert_eq!(app.media.upload_count(), 2);
    assert_ne!(app.media.uploads()[1].file_id, first_id);
    assert_eq!(app.media.deletes(), vec![first_id]);
}

#[tokio::test]
async fn test_profile_responses_never_expose_avatar_file_id() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "private@example.com").await;

    let updated = client
        .put(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .json(&json!({"name": "Test User", "avatar": png_data_uri(64, 64)}))
        .await
        .json::<Value>();
    let avatar = &updated["data"]["avatar"];
    assert!(avatar["url"].is_string());
    assert!(avatar.get("fileId").is_none());

    let me = client
        .get(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .await
        .json::<Value>();
    assert!(me["data"]["avatar"]["url"].is_string());
    assert!(me["data"]["avatar"].get("fileId").is_none());

    let signin = client
        .post(&api_path("/users/signin"))
        .json(&json!({"email": "private@example.com", "password": "TestPassword123!"}))
        .await
        .json::<Value>();
    assert!(signin["data"]["user"]["avatar"]["url"].is_string());
    assert!(signin["data"]["user"]["avatar"].get("fileId").is_none());

    // Echoing the public avatar back keeps the stored file
    let echoed = client
        .put(&api_path("/users/me"))
        .authorization_bearer(&user.token)
        .json(&json!({"name": "Renamed", "avatar": me["data"]["avatar"].clone()}))
        .await;
    assert_eq!(echoed.status_code(), 200);
    assert_eq!(echoed.json::<Value>()["cleanup"]["deleted"], 0);
    assert!(app.media.deletes().is_empty());
}

#[tokio::test]
async fn test_admin_registration_requires_key() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/admin/register"))
        .json(&json!({
            "name": "Mallory",
            "email": "mallory@example.com",
            "password": "password123",
            "registrationKey": "guess"
        }))
        .await;
    assert_eq!(response.status_code(), 403);

    let admin = register_admin(client).await;
    let claims = app.state.jwt.verify(&admin.token).unwrap();
    assert_eq!(claims.role, AccountRole::Admin);
    assert_eq!(claims.sub, admin.id);
}

#[tokio::test]
async fn test_admin_login_refuses_regular_accounts() {
    let app = setup_test_app().await;
    let client = app.client();
    signup_user(client, "regular@example.com").await;

    let response = client
        .post(&api_path("/admin/login"))
        .json(&json!({"email": "regular@example.com", "password": "TestPassword123!"}))
        .await;
    assert_eq!(response.status_code(), 403);

    client
        .post(&api_path("/admin/register"))
        .json(&json!({
            "name": "Boss",
            "email": "boss@example.com",
            "password": "BossPassword1",
            "registrationKey": TEST_ADMIN_KEY
        }))
        .await;
    let ok = client
        .post(&api_path("/admin/login"))
        .json(&json!({"email": "boss@example.com", "password": "BossPassword1"}))
        .await;
    assert_eq!(ok.status_code(), 200);
    assert_eq!(ok.json::<Value>()["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn test_content_mutations_are_admin_only() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "notadmin@example.com").await;

    let anonymous = client
        .post(&api_path("/landings"))
        .json(&landing_payload(json!(null)))
        .await;
    assert_eq!(anonymous.status_code(), 401);

    let as_user = client
        .post(&api_path("/landings"))
        .authorization_bearer(&user.token)
        .json(&landing_payload(json!(null)))
        .await;
    assert_eq!(as_user.status_code(), 403);

    let delete = client
        .delete(&api_path(&format!("/itineraries/{}", Uuid::new_v4())))
        .authorization_bearer(&user.token)
        .await;
    assert_eq!(delete.status_code(), 403);
    assert_eq!(app.media.upload_count(), 0);
}

#[tokio::test]
async fn test_invalid_token_on_public_read_is_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    assert_eq!(client.get(&api_path("/landings")).await.status_code(), 200);
    let response = client
        .get(&api_path("/landings"))
        .authorization_bearer("garbage")
        .await;
    assert_eq!(response.status_code(), 401);
}
