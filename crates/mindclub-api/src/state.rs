//! Application state shared by every handler.

use std::sync::Arc;

use mindclub_core::Config;
use mindclub_db::DocumentStore;
use mindclub_services::{EnrollmentService, EntityService, MediaReconciler};

use crate::auth::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub media: Arc<MediaReconciler>,
    pub entities: EntityService,
    pub enrollments: EnrollmentService,
    pub jwt: JwtService,
    pub is_production: bool,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
