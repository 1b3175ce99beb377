use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::document::Document;

pub const MANUAL_PAYMENT_REF: &str = "manual";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub order_id: String,
    pub payment_id: String,
    pub status: PaymentStatus,
}

impl PaymentInfo {
    pub fn manual() -> Self {
        Self {
            order_id: MANUAL_PAYMENT_REF.to_string(),
            payment_id: MANUAL_PAYMENT_REF.to_string(),
            status: PaymentStatus::Paid,
        }
    }
}

/// Stored body of an enrollment document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentBody {
    pub user: Uuid,
    pub workshop: Uuid,
    pub payment_info: PaymentInfo,
    pub enrolled_at: DateTime<Utc>,
}

impl EnrollmentBody {
    pub fn new(user: Uuid, workshop: Uuid, payment_info: PaymentInfo) -> Self {
        Self {
            user,
            workshop,
            payment_info,
            enrolled_at: Utc::now(),
        }
    }

    pub fn to_value(&self) -> Result<Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Containment filter matching every enrollment of `user` in `workshop`
    pub fn filter(user: Uuid, workshop: Uuid) -> Value {
        serde_json::json!({ "user": user, "workshop": workshop })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Enrollment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub body: EnrollmentBody,
}

impl Enrollment {
    pub fn from_document(doc: &Document) -> Result<Self, AppError> {
        let body = EnrollmentBody::deserialize(&doc.body).map_err(|e| {
            AppError::Internal(format!("Corrupt enrollment document {}: {}", doc.id, e))
        })?;
        Ok(Self { id: doc.id, body })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderRequest {
    #[validate(length(min = 1, message = "cart must contain at least one workshop"))]
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, message = "razorpayOrderId is required"))]
    pub razorpay_order_id: String,
    #[validate(length(min = 1, message = "razorpayPaymentId is required"))]
    pub razorpay_payment_id: String,
    #[validate(length(min = 1, message = "razorpaySignature is required"))]
    pub razorpay_signature: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualEnrollmentRequest {
    pub user_id: Uuid,
    pub workshop_id: Uuid,
}

/// Order as returned by the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub notes: Value,
}

/// Order notes written at order creation and read back when verifying payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    pub user_id: Uuid,
    /// JSON array of workshop ids; the gateway only stores string notes
    pub cart: String,
}

impl OrderNotes {
    pub fn new(user_id: Uuid, workshops: &[Uuid]) -> Result<Self, AppError> {
        Ok(Self {
            user_id,
            cart: serde_json::to_string(workshops)?,
        })
    }

    pub fn workshops(&self) -> Result<Vec<Uuid>, AppError> {
        serde_json::from_str(&self.cart)
            .map_err(|e| AppError::PaymentGateway(format!("Malformed order notes: {}", e)))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: PaymentOrder,
    pub payable_workshops: Vec<Uuid>,
    pub new_total: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub order_id: String,
    pub payment_id: String,
    pub enrolled: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_notes_round_trip_workshop_ids() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let notes = OrderNotes::new(Uuid::new_v4(), &ids).unwrap();
        assert_eq!(notes.workshops().unwrap(), ids);
    }

    #[test]
    fn test_order_request_requires_a_cart_item() {
        let empty: OrderRequest = serde_json::from_value(serde_json::json!({"cart": []})).unwrap();
        assert!(empty.validate().is_err());

        let one: OrderRequest =
            serde_json::from_value(serde_json::json!({"cart": [{"_id": Uuid::new_v4()}]})).unwrap();
        assert!(one.validate().is_ok());
    }

    #[test]
    fn test_cart_item_accepts_mongo_style_id() {
        let id = Uuid::new_v4();
        let item: CartItem = serde_json::from_value(serde_json::json!({"_id": id})).unwrap();
        assert_eq!(item.id, id);
    }

    #[test]
    fn test_manual_payment_info_is_paid() {
        let info = PaymentInfo::manual();
        assert_eq!(info.status, PaymentStatus::Paid);
        assert_eq!(info.order_id, "manual");
    }
}
