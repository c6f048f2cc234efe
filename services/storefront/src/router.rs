use axum::{
    Router,
    routing::{get, post},
};

use bloom_core::health::healthz;
use bloom_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    admin::admin_login,
    contact::submit_contact,
    coupon::validate_coupon,
    health::readyz,
    review::{list_reviews, submit_review},
    upload::sign_upload,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Admin
        .route("/admin/login", post(admin_login))
        // Coupons
        .route("/coupons/validate", post(validate_coupon))
        // Reviews
        .route("/reviews", post(submit_review))
        .route("/products/{product_id}/reviews", get(list_reviews))
        // Contact
        .route("/contact", post(submit_contact))
        // Uploads
        .route("/uploads/signature", post(sign_upload))
        .with_state(state)
        // Outermost last: the id is set before tracing and copied onto the response.
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
