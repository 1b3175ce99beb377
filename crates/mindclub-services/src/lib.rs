//! Mindclub Services Layer
//!
//! Orchestration between the document store, the remote media store and the
//! payment gateway. HTTP handling stays in mindclub-api; handlers call into the
//! services here.

pub mod enrollment;
pub mod lifecycle;
pub mod payment;
pub mod reconciler;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use enrollment::EnrollmentService;
pub use lifecycle::{DeleteOutcome, EntityService, UpdateOutcome, UpdateState};
pub use payment::{NewOrder, PaymentGateway, RazorpayGateway};
pub use reconciler::{
    collect_file_ids, strip_file_ids, CleanupReport, FailedDeletion, MediaReconciler,
    ReconcilerSettings,
};
