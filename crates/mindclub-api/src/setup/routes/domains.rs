//! Route groups by access level. Groups that share a path (a public GET and an
//! admin PUT on the same resource) are merged into one method router.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Signup, signin and admin registration/login
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&api("/users/signup"), post(handlers::users::signup))
        .route(&api("/users/signin"), post(handlers::users::signin))
        .route(&api("/admin/register"), post(handlers::admin::register))
        .route(&api("/admin/login"), post(handlers::admin::login))
}

/// Content reads. Anonymous callers are allowed; a valid token unlocks extra fields.
pub fn content_read_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&api("/workshops"), get(handlers::workshops::list_workshops))
        .route(&api("/workshops/{id}"), get(handlers::workshops::get_workshop))
        .route(
            &api("/online-workshops"),
            get(handlers::online_workshops::list_online_workshops),
        )
        .route(
            &api("/online-workshops/{id}"),
            get(handlers::online_workshops::get_online_workshop),
        )
        .route(&api("/landings"), get(handlers::landings::list_landings))
        .route(&api("/landings/{id}"), get(handlers::landings::get_landing))
        .route(&api("/itineraries"), get(handlers::itineraries::list_itineraries))
        .route(
            &api("/itineraries/{id}"),
            get(handlers::itineraries::get_itinerary),
        )
}

/// Routes for any signed-in account
pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &api("/users/me"),
            get(handlers::users::get_me).put(handlers::users::update_me),
        )
        .route(&api("/upload/image"), post(handlers::upload::upload_image))
        .route(
            &api("/online-workshops/enrolled"),
            get(handlers::online_workshops::list_enrolled_workshops),
        )
        .route(
            &api("/enrollments/order"),
            post(handlers::enrollments::create_order),
        )
        .route(
            &api("/enrollments/verify"),
            post(handlers::enrollments::verify_payment),
        )
}

/// Content mutations, media management and manual enrollment
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&api("/workshops"), post(handlers::workshops::create_workshop))
        .route(
            &api("/workshops/{id}"),
            put(handlers::workshops::update_workshop).delete(handlers::workshops::delete_workshop),
        )
        .route(
            &api("/online-workshops"),
            post(handlers::online_workshops::create_online_workshop),
        )
        .route(
            &api("/online-workshops/{id}"),
            put(handlers::online_workshops::update_online_workshop)
                .delete(handlers::online_workshops::delete_online_workshop),
        )
        .route(&api("/landings"), post(handlers::landings::create_landing))
        .route(
            &api("/landings/{id}"),
            put(handlers::landings::update_landing).delete(handlers::landings::delete_landing),
        )
        .route(
            &api("/itineraries"),
            post(handlers::itineraries::create_itinerary),
        )
        .route(
            &api("/itineraries/{id}"),
            put(handlers::itineraries::update_itinerary)
                .delete(handlers::itineraries::delete_itinerary),
        )
        .route(
            &api("/media/{*file_id}"),
            get(handlers::media::get_media_details).delete(handlers::media::delete_media),
        )
        .route(
            &api("/enrollments/manual"),
            post(handlers::enrollments::manual_enroll),
        )
}
