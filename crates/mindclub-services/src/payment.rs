//! Payment gateway seam and the Razorpay client

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use mindclub_core::models::PaymentOrder;
use mindclub_core::{AppError, PaymentConfig};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const RAZORPAY_API: &str = "https://api.razorpay.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

type HmacSha256 = Hmac<Sha256>;

/// Order to create at the gateway
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    /// Amount in minor currency units (paise for INR)
    #[serde(rename = "amount")]
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: Value,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<PaymentOrder, AppError>;

    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, AppError>;

    /// Check the signature returned by checkout for `order_id|payment_id`
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Hex HMAC-SHA256 of `order_id|payment_id` keyed with the gateway secret
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    // HMAC accepts keys of any length, so this never fails
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = payment_signature(secret, order_id, payment_id);
    if expected.is_empty() || expected.len() != signature.len() {
        return false;
    }
    expected
        .as_bytes()
        .ct_eq(signature.to_ascii_lowercase().as_bytes())
        .into()
}

#[derive(Clone)]
pub struct RazorpayGateway {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayGateway {
    pub fn new(key_id: String, key_secret: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            key_id,
            key_secret,
            base_url: RAZORPAY_API.to_string(),
        })
    }

    /// `None` when no key pair is configured
    pub fn from_config(config: &PaymentConfig) -> Result<Option<Self>, AppError> {
        match (&config.razorpay_key_id, &config.razorpay_key_secret) {
            (Some(id), Some(secret)) => Ok(Some(Self::new(id.clone(), secret.clone())?)),
            _ => Ok(None),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn read_order(response: reqwest::Response) -> Result<PaymentOrder, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PaymentGateway(format!(
                "Razorpay returned HTTP {}: {}",
                status, body
            )));
        }
        response
            .json::<PaymentOrder>()
            .await
            .map_err(|e| AppError::PaymentGateway(format!("Invalid Razorpay response: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[tracing::instrument(skip(self, order), fields(payment.amount = order.amount_minor, payment.currency = %order.currency))]
    async fn create_order(&self, order: NewOrder) -> Result<PaymentOrder, AppError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&order)
            .send()
            .await
            .map_err(|e| AppError::PaymentGateway(e.to_string()))?;

        let created = Self::read_order(response).await?;
        tracing::info!(order_id = %created.id, "Payment order created");
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, AppError> {
        let response = self
            .client
            .get(format!(
                "{}/orders/{}",
                self.base_url,
                urlencoding::encode(order_id)
            ))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| AppError::PaymentGateway(e.to_string()))?;

        Self::read_order(response).await
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(&self.key_secret, order_id, payment_id, signature)
    }
}
