use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{api_path, TEST_ADMIN_KEY};

/// Signed-in account as seen by a test.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

fn from_auth_body(body: &Value) -> TestUser {
    let data = &body["data"];
    TestUser {
        id: data["user"]["_id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("auth response without user id"),
        email: data["user"]["email"].as_str().unwrap_or_default().to_string(),
        token: data["token"]
            .as_str()
            .expect("auth response without token")
            .to_string(),
    }
}

/// Sign up a regular account.
pub async fn signup_user(client: &TestServer, email: &str) -> TestUser {
    let response = client
        .post(&api_path("/users/signup"))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "TestPassword123!"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "signup failed: {}", response.text());
    from_auth_body(&response.json::<Value>())
}

/// Register an admin account with the configured registration key.
pub async fn register_admin(client: &TestServer) -> TestUser {
    let response = client
        .post(&api_path("/admin/register"))
        .json(&json!({
            "name": "Admin",
            "email": format!("admin-{}@example.com", Uuid::new_v4().simple()),
            "password": "AdminPassword123!",
            "registrationKey": TEST_ADMIN_KEY
        }))
        .await;
    assert_eq!(response.status_code(), 201, "admin register failed: {}", response.text());
    from_auth_body(&response.json::<Value>())
}
