//! Paid and manual enrollment, and meeting details tied to enrollment.
//!
//! Run with: `cargo test -p mindclub-api --test enrollment_test`

mod helpers;

use axum_test::TestServer;
use helpers::auth::{register_admin, signup_user, TestUser};
use helpers::fixtures::online_workshop_payload;
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

async fn create_online_workshop(client: &TestServer, admin: &TestUser, amount: f64) -> String {
    let response = client
        .post(&api_path("/online-workshops"))
        .authorization_bearer(&admin.token)
        .json(&online_workshop_payload(amount))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Value>()["data"]["_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_meeting_details_hidden_until_enrolled() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = register_admin(client).await;
    let user = signup_user(client, "student@example.com").await;
    let id = create_online_workshop(client, &admin, 1499.0).await;
    let path = api_path(&format!("/online-workshops/{}", id));

    let anonymous = client.get(&path).await.json::<Value>();
    assert_eq!(anonymous["data"]["workshopHeader"]["title"], "Street Photography");
    assert!(anonymous["data"].get("meetingLink").is_none());
    assert!(anonymous["data"].get("meetingPassword").is_none());
    assert!(anonymous["data"].get("meetingID").is_none());

    let before = client
        .get(&path)
        .authorization_bearer(&user.token)
        .await
        .json::<Value>();
    assert!(before["data"].get("meetingLink").is_none());

    let as_admin = client
        .get(&path)
        .authorization_bearer(&admin.token)
        .await
        .json::<Value>();
    assert_eq!(as_admin["data"]["meetingLink"], "https://meet.example.com/abc");

    let enroll = client
        .post(&api_path("/enrollments/manual"))
        .authorization_bearer(&admin.token)
        .json(&json!({"userId": user.id, "workshopId": id}))
        .await;
    assert_eq!(enroll.status_code(), 201);
    let enrollment = enroll.json::<Value>();
    assert_eq!(enrollment["data"]["paymentInfo"]["orderId"], "manual");

    let after = client
        .get(&path)
        .authorization_bearer(&user.token)
        .await
        .json::<Value>();
    assert_eq!(after["data"]["meetingPassword"], "secret");

    let list = client
        .get(&api_path("/online-workshops"))
        .authorization_bearer(&user.token)
        .await
        .json::<Value>();
    assert_eq!(list["data"][0]["meetingID"], "987 654");
}

#[tokio::test]
async fn test_manual_enrollment_is_admin_only_and_unique() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = register_admin(client).await;
    let user = signup_user(client, "twice@example.com").await;
    let id = create_online_workshop(client, &admin, 500.0).await;
    let body = json!({"userId": user.id, "workshopId": id});

    let as_user = client
        .post(&api_path("/enrollments/manual"))
        .authorization_bearer(&user.token)
        .json(&body)
        .await;
    assert_eq!(as_user.status_code(), 403);

    let first = client
        .post(&api_path("/enrollments/manual"))
        .authorization_bearer(&admin.token)
        .json(&body)
        .await;
    assert_eq!(first.status_code(), 201);

    let second = client
        .post(&api_path("/enrollments/manual"))
        .authorization_bearer(&admin.token)
        .json(&body)
        .await;
    assert_eq!(second.status_code(), 409);
}

#[tokio::test]
async fn test_order_and_verify_payment_enrolls_the_cart() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = register_admin(client).await;
    let user = signup_user(client, "buyer@example.com").await;
    let first = create_online_workshop(client, &admin, 1499.0).await;
    let second = create_online_workshop(client, &admin, 500.5).await;

    let order = client
        .post(&api_path("/enrollments/order"))
        .authorization_bearer(&user.token)
        .json(&json!({"cart": [{"_id": first}, {"_id": second}, {"_id": first}]}))
        .await;
    assert_eq!(order.status_code(), 200, "{}", order.text());
    let order = order.json::<Value>()["data"].clone();
    assert_eq!(order["amount"], 199_950);
    assert_eq!(order["payableWorkshops"].as_array().unwrap().len(), 2);
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(app.gateway.orders_created(), 1);

    let forged = client
        .post(&api_path("/enrollments/verify"))
        .authorization_bearer(&user.token)
        .json(&json!({
            "razorpayOrderId": order_id,
            "razorpayPaymentId": "pay_123",
            "razorpaySignature": "deadbeef"
        }))
        .await;
    assert_eq!(forged.status_code(), 400);

    let verified = client
        .post(&api_path("/enrollments/verify"))
        .authorization_bearer(&user.token)
        .json(&json!({
            "razorpayOrderId": order_id,
            "razorpayPaymentId": "pay_123",
            "razorpaySignature": app.gateway.sign(&order_id, "pay_123")
        }))
        .await;
    assert_eq!(verified.status_code(), 200);
    assert_eq!(
        verified.json::<Value>()["data"]["enrolled"]
            .as_array()
            .unwrap()
            .len(),
        2
    );

    let enrolled = client
        .get(&api_path("/online-workshops/enrolled"))
        .authorization_bearer(&user.token)
        .await
        .json::<Value>();
    assert_eq!(enrolled["count"], 2);
    assert_eq!(enrolled["data"][0]["meetingLink"], "https://meet.example.com/abc");

    // Everything in the cart is already paid for
    let again = client
        .post(&api_path("/enrollments/order"))
        .authorization_bearer(&user.token)
        .json(&json!({"cart": [{"_id": first}]}))
        .await;
    assert_eq!(again.status_code(), 400);
    assert_eq!(app.gateway.orders_created(), 1);
}

#[tokio::test]
async fn test_order_belongs_to_its_buyer() {
    let app = setup_test_app().await;
    let client = app.client();
    let admin = register_admin(client).await;
    let buyer = signup_user(client, "owner@example.com").await;
    let other = signup_user(client, "other@example.com").await;
    let id = create_online_workshop(client, &admin, 100.0).await;

    let order = client
        .post(&api_path("/enrollments/order"))
        .authorization_bearer(&buyer.token)
        .json(&json!({"cart": [{"id": id}]}))
        .await
        .json::<Value>();
    let order_id = order["data"]["id"].as_str().unwrap().to_string();

    let response = client
        .post(&api_path("/enrollments/verify"))
        .authorization_bearer(&other.token)
        .json(&json!({
            "razorpayOrderId": order_id,
            "razorpayPaymentId": "pay_999",
            "razorpaySignature": app.gateway.sign(&order_id, "pay_999")
        }))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_order_rejects_empty_and_unknown_carts() {
    let app = setup_test_app().await;
    let client = app.client();
    let user = signup_user(client, "cart@example.com").await;

    let empty = client
        .post(&api_path("/enrollments/order"))
        .authorization_bearer(&user.token)
        .json(&json!({"cart": []}))
        .await;
    assert_eq!(empty.status_code(), 400);

    let unknown = client
        .post(&api_path("/enrollments/order"))
        .authorization_bearer(&user.token)
        .json(&json!({"cart": [{"_id": uuid::Uuid::new_v4()}]}))
        .await;
    assert_eq!(unknown.status_code(), 404);
    assert_eq!(app.gateway.orders_created(), 0);
}
