//! Online workshop enrollment: paid checkout through the payment gateway and
//! manual enrollment by an admin.

use std::collections::BTreeSet;
use std::sync::Arc;

use mindclub_core::models::{
    Collection, Document, EnrollmentBody, OrderNotes, OrderResponse, PaymentInfo, PaymentStatus,
    PriceInput, SortSpec, VerifyPaymentRequest, VerifyPaymentResponse,
};
use mindclub_core::AppError;
use mindclub_db::DocumentStore;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::payment::{NewOrder, PaymentGateway};

#[derive(Clone)]
pub struct EnrollmentService {
    store: Arc<dyn DocumentStore>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    currency: String,
}

fn price_of(workshop: &Document) -> Result<f64, AppError> {
    let price = workshop
        .body
        .get("price")
        .ok_or_else(|| AppError::Internal(format!("Online workshop {} has no price", workshop.id)))?;
    let price = PriceInput::deserialize(price).map_err(|e| {
        AppError::Internal(format!("Online workshop {} has a malformed price: {}", workshop.id, e))
    })?;
    Ok(price.amount)
}

/// Total in minor currency units
fn to_minor_units(total: f64) -> i64 {
    (total * 100.0).round() as i64
}

impl EnrollmentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gateway: Option<Arc<dyn PaymentGateway>>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            currency: currency.into(),
        }
    }

    pub fn payments_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    fn gateway(&self) -> Result<&Arc<dyn PaymentGateway>, AppError> {
        self.gateway
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Payments are not configured".to_string()))
    }

    async fn online_workshop(&self, id: Uuid) -> Result<Document, AppError> {
        self.store
            .find(Collection::OnlineWorkshops, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Online workshop {} not found", id)))
    }

    pub async fn is_enrolled(&self, user: Uuid, workshop: Uuid) -> Result<bool, AppError> {
        let found = self
            .store
            .find_by(Collection::Enrollments, &EnrollmentBody::filter(user, workshop))
            .await?;
        Ok(!found.is_empty())
    }

    /// Online workshops `user` is enrolled in, newest first
    pub async fn enrolled_workshops(&self, user: Uuid) -> Result<Vec<Document>, AppError> {
        let enrollments = self
            .store
            .find_by(Collection::Enrollments, &json!({ "user": user }))
            .await?;

        let ids: BTreeSet<Uuid> = enrollments
            .iter()
            .filter_map(|doc| doc.body.get("workshop").and_then(Value::as_str))
            .filter_map(|id| Uuid::parse_str(id).ok())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let workshops = self
            .store
            .find_all(Collection::OnlineWorkshops, SortSpec::NEWEST_FIRST)
            .await?;
        Ok(workshops
            .into_iter()
            .filter(|w| ids.contains(&w.id))
            .collect())
    }

    /// Create a gateway order for the cart items `user` is not yet enrolled in.
    #[tracing::instrument(skip(self, cart), fields(user_id = %user, cart_size = cart.len()))]
    pub async fn create_order(&self, user: Uuid, cart: &[Uuid]) -> Result<OrderResponse, AppError> {
        let gateway = self.gateway()?;

        let mut seen = BTreeSet::new();
        let mut payable = Vec::new();
        let mut total = 0.0;
        for &id in cart {
            if !seen.insert(id) {
                continue;
            }
            let workshop = self.online_workshop(id).await?;
            if self.is_enrolled(user, id).await? {
                tracing::debug!(workshop_id = %id, "Skipping workshop already enrolled");
                continue;
            }
            total += price_of(&workshop)?;
            payable.push(id);
        }

        if payable.is_empty() {
            return Err(AppError::Validation(
                "Already enrolled in every workshop in the cart".to_string(),
            ));
        }

        let notes = serde_json::to_value(OrderNotes::new(user, &payable)?)?;
        let receipt = format!("rcpt_{}", &Uuid::new_v4().simple().to_string()[..12]);
        let order = gateway
            .create_order(NewOrder {
                amount_minor: to_minor_units(total),
                currency: self.currency.clone(),
                receipt,
                notes,
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            amount = order.amount,
            workshops = payable.len(),
            "Enrollment order created"
        );

        Ok(OrderResponse {
            order,
            payable_workshops: payable,
            new_total: total,
        })
    }

    /// Enroll `user` in every workshop of a paid order after checking the checkout signature.
    #[tracing::instrument(skip(self, request), fields(user_id = %user, order_id = %request.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        user: Uuid,
        request: &VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, AppError> {
        let gateway = self.gateway()?;

        if !gateway.verify_payment_signature(
            &request.razorpay_order_id,
            &request.razorpay_payment_id,
            &request.razorpay_signature,
        ) {
            tracing::warn!("Payment signature mismatch");
            return Err(AppError::Validation("Invalid payment signature".to_string()));
        }

        let order = gateway.fetch_order(&request.razorpay_order_id).await?;
        let notes = OrderNotes::deserialize(&order.notes)
            .map_err(|e| AppError::PaymentGateway(format!("Malformed order notes: {}", e)))?;
        if notes.user_id != user {
            return Err(AppError::Forbidden(
                "Order belongs to a different account".to_string(),
            ));
        }

        let mut enrolled = Vec::new();
        for workshop in notes.workshops()? {
            if self.is_enrolled(user, workshop).await? {
                continue;
            }
            let info = PaymentInfo {
                order_id: request.razorpay_order_id.clone(),
                payment_id: request.razorpay_payment_id.clone(),
                status: PaymentStatus::Paid,
            };
            let body = EnrollmentBody::new(user, workshop, info).to_value()?;
            self.store.create(Collection::Enrollments, body).await?;
            enrolled.push(workshop);
        }

        tracing::info!(enrolled = enrolled.len(), "Payment verified");

        Ok(VerifyPaymentResponse {
            order_id: request.razorpay_order_id.clone(),
            payment_id: request.razorpay_payment_id.clone(),
            enrolled,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn manual_enroll(&self, user: Uuid, workshop: Uuid) -> Result<Document, AppError> {
        if self.store.find(Collection::Accounts, user).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user)));
        }
        self.online_workshop(workshop).await?;

        if self.is_enrolled(user, workshop).await? {
            return Err(AppError::Conflict(
                "User is already enrolled in this workshop".to_string(),
            ));
        }

        let body = EnrollmentBody::new(user, workshop, PaymentInfo::manual()).to_value()?;
        let document = self.store.create(Collection::Enrollments, body).await?;
        tracing::info!(enrollment_id = %document.id, "Manual enrollment created");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePaymentGateway;
    use mindclub_db::MemoryDocumentStore;

    struct Harness {
        store: Arc<MemoryDocumentStore>,
        gateway: Arc<FakePaymentGateway>,
        service: EnrollmentService,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryDocumentStore::new());
        let gateway = Arc::new(FakePaymentGateway::new("test_secret"));
        let service = EnrollmentService::new(
            store.clone(),
            Some(gateway.clone() as Arc<dyn PaymentGateway>),
            "INR",
        );
        Harness {
            store,
            gateway,
            service,
        }
    }

    async fn workshop(store: &MemoryDocumentStore, amount: f64) -> Uuid {
        store
            .create(
                Collection::OnlineWorkshops,
                json!({"workshopHeader": {"title": "Night skies"}, "price": {"amount": amount}}),
            )
            .await
            .unwrap()
            .id
    }

    async fn account(store: &MemoryDocumentStore) -> Uuid {
        store
            .create(Collection::Accounts, json!({"name": "Asha", "email": "a@x.io"}))
            .await
            .unwrap()
            .id
    }

    fn verify_request(h: &Harness, order_id: &str) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: order_id.to_string(),
            razorpay_payment_id: "pay_123".to_string(),
            razorpay_signature: h.gateway.sign(order_id, "pay_123"),
        }
    }

    #[tokio::test]
    async fn test_order_totals_store_prices_in_minor_units() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 1499.0).await;
        let b = workshop(&h.store, 0.5).await;

        let response = h.service.create_order(user, &[a, b, a]).await.unwrap();

        assert_eq!(response.order.amount, 149950);
        assert_eq!(response.payable_workshops, vec![a, b]);
        assert_eq!(response.order.currency, "INR");
        assert!(response.order.receipt.as_deref().unwrap().starts_with("rcpt_"));
    }

    #[tokio::test]
    async fn test_order_skips_enrolled_workshops() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;
        let b = workshop(&h.store, 200.0).await;
        h.service.manual_enroll(user, a).await.unwrap();

        let response = h.service.create_order(user, &[a, b]).await.unwrap();
        assert_eq!(response.payable_workshops, vec![b]);
        assert_eq!(response.order.amount, 20000);

        let err = h.service.create_order(user, &[a]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_order_for_unknown_workshop_is_not_found() {
        let h = harness();
        let err = h
            .service
            .create_order(Uuid::new_v4(), &[Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(h.gateway.orders_created(), 0);
    }

    #[tokio::test]
    async fn test_verify_enrolls_each_paid_workshop_once() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;
        let b = workshop(&h.store, 200.0).await;
        let order = h.service.create_order(user, &[a, b]).await.unwrap().order;

        let request = verify_request(&h, &order.id);
        let first = h.service.verify_payment(user, &request).await.unwrap();
        assert_eq!(first.enrolled, vec![a, b]);
        assert!(h.service.is_enrolled(user, a).await.unwrap());

        let second = h.service.verify_payment(user, &request).await.unwrap();
        assert!(second.enrolled.is_empty());
        assert_eq!(h.store.len(Collection::Enrollments).await, 2);
    }

    #[tokio::test]
    async fn test_verify_rejects_bad_signature() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;
        let order = h.service.create_order(user, &[a]).await.unwrap().order;

        let mut request = verify_request(&h, &order.id);
        request.razorpay_signature = "0".repeat(64);

        let err = h.service.verify_payment(user, &request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(h.store.is_empty(Collection::Enrollments).await);
    }

    #[tokio::test]
    async fn test_verify_rejects_someone_elses_order() {
        let h = harness();
        let owner = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;
        let order = h.service.create_order(owner, &[a]).await.unwrap().order;

        let err = h
            .service
            .verify_payment(Uuid::new_v4(), &verify_request(&h, &order.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_manual_enroll_checks_both_sides() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;

        assert!(matches!(
            h.service.manual_enroll(Uuid::new_v4(), a).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            h.service.manual_enroll(user, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        let doc = h.service.manual_enroll(user, a).await.unwrap();
        assert_eq!(doc.body["paymentInfo"]["orderId"], "manual");
        assert_eq!(doc.body["paymentInfo"]["status"], "paid");

        assert!(matches!(
            h.service.manual_enroll(user, a).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_enrolled_workshops_lists_only_enrolled() {
        let h = harness();
        let user = account(&h.store).await;
        let a = workshop(&h.store, 100.0).await;
        workshop(&h.store, 200.0).await;
        h.service.manual_enroll(user, a).await.unwrap();

        let listed = h.service.enrolled_workshops(user).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, a);
    }

    #[tokio::test]
    async fn test_payments_unavailable_without_gateway() {
        let store = Arc::new(MemoryDocumentStore::new());
        let service = EnrollmentService::new(store, None, "INR");
        let err = service.create_order(Uuid::new_v4(), &[Uuid::new_v4()]).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
