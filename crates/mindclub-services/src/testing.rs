//! Test doubles shared by this crate's tests and the API integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use mindclub_core::models::PaymentOrder;
use mindclub_core::AppError;
use mindclub_storage::{FileDetails, MediaStore, StorageError, StorageResult, StoredFile};
use uuid::Uuid;

use crate::payment::{payment_signature, NewOrder, PaymentGateway};

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub file_id: String,
    pub file_name: String,
    pub folder: String,
    pub data: Bytes,
}

/// Wraps a real store and records every call; failures can be injected.
pub struct RecordingMediaStore {
    inner: Arc<dyn MediaStore>,
    uploads: Mutex<Vec<UploadRecord>>,
    deletes: Mutex<Vec<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_uploads: Mutex<bool>,
}

impl RecordingMediaStore {
    pub fn new(inner: Arc<dyn MediaStore>) -> Self {
        Self {
            inner,
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            failing_deletes: Mutex::new(HashSet::new()),
            fail_uploads: Mutex::new(false),
        }
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    /// Every delete attempted, including injected failures
    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn fail_delete_of(&self, file_id: &str) {
        self.failing_deletes
            .lock()
            .unwrap()
            .insert(file_id.to_string());
    }

    pub fn fail_uploads(&self, fail: bool) {
        *self.fail_uploads.lock().unwrap() = fail;
    }

    pub fn reset(&self) {
        self.uploads.lock().unwrap().clear();
        self.deletes.lock().unwrap().clear();
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(
        &self,
        data: Bytes,
        file_name: &str,
        folder: &str,
    ) -> StorageResult<StoredFile> {
        if *self.fail_uploads.lock().unwrap() {
            return Err(StorageError::UploadFailed("injected upload failure".to_string()));
        }
        let stored = self.inner.upload(data.clone(), file_name, folder).await?;
        self.uploads.lock().unwrap().push(UploadRecord {
            file_id: stored.file_id.clone(),
            file_name: file_name.to_string(),
            folder: folder.to_string(),
            data,
        });
        Ok(stored)
    }

    async fn delete(&self, file_id: &str) -> StorageResult<()> {
        self.deletes.lock().unwrap().push(file_id.to_string());
        if self.failing_deletes.lock().unwrap().contains(file_id) {
            return Err(StorageError::DeleteFailed(format!(
                "injected delete failure for {}",
                file_id
            )));
        }
        self.inner.delete(file_id).await
    }

    async fn get_details(&self, file_id: &str) -> StorageResult<FileDetails> {
        self.inner.get_details(file_id).await
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Payment gateway that keeps orders in memory and signs like the real one.
pub struct FakePaymentGateway {
    secret: String,
    orders: Mutex<HashMap<String, PaymentOrder>>,
    created: AtomicUsize,
}

impl FakePaymentGateway {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            orders: Mutex::new(HashMap::new()),
            created: AtomicUsize::new(0),
        }
    }

    /// Signature a checkout would hand back for this order and payment
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        payment_signature(&self.secret, order_id, payment_id)
    }

    pub fn orders_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn order(&self, order_id: &str) -> Option<PaymentOrder> {
        self.orders.lock().unwrap().get(order_id).cloned()
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_order(&self, order: NewOrder) -> Result<PaymentOrder, AppError> {
        let id = format!("order_{}", &Uuid::new_v4().simple().to_string()[..14]);
        let created = PaymentOrder {
            id: id.clone(),
            amount: order.amount_minor,
            currency: order.currency,
            receipt: Some(order.receipt),
            status: Some("created".to_string()),
            notes: order.notes,
        };
        self.orders.lock().unwrap().insert(id, created.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, AppError> {
        self.order(order_id)
            .ok_or_else(|| AppError::PaymentGateway(format!("Unknown order {}", order_id)))
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        crate::payment::verify_signature(&self.secret, order_id, payment_id, signature)
    }
}
