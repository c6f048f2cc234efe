use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;

use bloom_domain::pagination::{Page, PageRequest};

use crate::domain::types::Review;
use crate::error::StorefrontError;
use crate::handlers::client::ClientIp;
use crate::handlers::payload;
use crate::state::AppState;
use crate::usecase::review::{ListReviewsUseCase, SubmitReviewUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub product_id: String,
    pub user_name: String,
    pub address: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub approved: bool,
    #[serde(serialize_with = "bloom_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// The client IP stays server-side.
impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            product_id: review.product_id,
            user_name: review.user_name,
            address: review.address,
            rating: review.rating,
            comment: review.comment,
            images: review.images,
            video: review.video,
            approved: review.approved,
            created_at: review.created_at,
        }
    }
}

// ── POST /reviews ────────────────────────────────────────────────────────────

pub async fn submit_review(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewResponse>), StorefrontError> {
    let usecase = SubmitReviewUseCase {
        limiter: state.limiter(),
        products: state.product_repo(),
        reviews: state.review_repo(),
        policy: state.config.rate_limits.review,
    };
    let review = usecase.execute(&client, payload(body)).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

// ── GET /products/{product_id}/reviews ───────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ReviewResponse>>, StorefrontError> {
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
    };
    let Page {
        items,
        page,
        per_page,
        total,
    } = usecase.execute(&product_id, page).await?;
    Ok(Json(Page {
        items: items.into_iter().map(ReviewResponse::from).collect(),
        page,
        per_page,
        total,
    }))
}
