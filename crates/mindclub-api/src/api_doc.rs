//! OpenAPI documentation, served at /api/openapi.json and rendered at /docs.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use mindclub_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mindclub API",
        version = "0.1.0",
        description = "Workshop and event backend. Content documents may embed images and videos as base64 data URIs; the server uploads them to the media store, stores only URL and file id, and deletes media that a write leaves unreferenced."
    ),
    paths(
        // Auth
        handlers::users::signup,
        handlers::users::signin,
        handlers::users::get_me,
        handlers::users::update_me,
        handlers::admin::register,
        handlers::admin::login,
        // Workshops
        handlers::workshops::list_workshops,
        handlers::workshops::get_workshop,
        handlers::workshops::create_workshop,
        handlers::workshops::update_workshop,
        handlers::workshops::delete_workshop,
        // Online workshops
        handlers::online_workshops::list_online_workshops,
        handlers::online_workshops::get_online_workshop,
        handlers::online_workshops::list_enrolled_workshops,
        handlers::online_workshops::create_online_workshop,
        handlers::online_workshops::update_online_workshop,
        handlers::online_workshops::delete_online_workshop,
        // Landings
        handlers::landings::list_landings,
        handlers::landings::get_landing,
        handlers::landings::create_landing,
        handlers::landings::update_landing,
        handlers::landings::delete_landing,
        // Itineraries
        handlers::itineraries::list_itineraries,
        handlers::itineraries::get_itinerary,
        handlers::itineraries::create_itinerary,
        handlers::itineraries::update_itinerary,
        handlers::itineraries::delete_itinerary,
        // Media
        handlers::upload::upload_image,
        handlers::media::get_media_details,
        handlers::media::delete_media,
        // Enrollments
        handlers::enrollments::create_order,
        handlers::enrollments::verify_payment,
        handlers::enrollments::manual_enroll,
    ),
    components(
        schemas(
            models::AccountRole,
            models::AccountProfile,
            models::SignupRequest,
            models::SigninRequest,
            models::AdminRegisterRequest,
            models::AuthResponse,
            models::MediaReference,
            models::CartItem,
            models::OrderRequest,
            models::PaymentOrder,
            models::OrderResponse,
            models::VerifyPaymentRequest,
            models::VerifyPaymentResponse,
            models::ManualEnrollmentRequest,
            models::PaymentStatus,
            models::PaymentInfo,
            models::EnrollmentBody,
            models::Enrollment,
            handlers::upload::UploadImageRequest,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Signup, signin and the caller's profile"),
        (name = "admin", description = "Admin registration and login"),
        (name = "workshops", description = "On-field workshops"),
        (name = "online-workshops", description = "Online workshops; meeting details are limited to enrolled accounts"),
        (name = "landings", description = "Landing pages"),
        (name = "itineraries", description = "Day-by-day itineraries"),
        (name = "media", description = "Standalone uploads and stored media"),
        (name = "enrollments", description = "Paid and manual enrollment")
    )
)]
pub struct ApiDoc;
