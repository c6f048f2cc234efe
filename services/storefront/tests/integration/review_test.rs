use chrono::Duration;
use serde_json::{Value, json};

use bloom_domain::pagination::PageRequest;
use bloom_storefront::domain::types::RateLimitPolicy;
use bloom_storefront::error::StorefrontError;
use bloom_storefront::usecase::rate_limit::RateLimiter;
use bloom_storefront::usecase::review::{ListReviewsUseCase, SubmitReviewUseCase};

use crate::helpers::{
    MockAttemptRepo, MockProductRepo, MockReviewRepo, approved_review, client, test_product,
};

fn usecase(
    attempts: &MockAttemptRepo,
    reviews: &MockReviewRepo,
) -> SubmitReviewUseCase<MockAttemptRepo, MockProductRepo, MockReviewRepo> {
    let mut retired = test_product("p-retired");
    retired.active = false;
    SubmitReviewUseCase {
        limiter: RateLimiter::new(attempts.clone()),
        products: MockProductRepo::new(vec![test_product("p1"), retired]),
        reviews: reviews.clone(),
        policy: RateLimitPolicy::REVIEW,
    }
}

fn review_body(comment: &str) -> Value {
    json!({
        "productId": "p1",
        "userName": "Jane",
        "rating": 4,
        "comment": comment,
    })
}

#[tokio::test]
async fn should_store_normalized_review() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let handle = reviews.reviews_handle();

    let review = usecase(&attempts, &reviews)
        .execute(
            &client("203.0.113.9"),
            json!({
                "productId": "p1",
                "userName": "  <b>Jane</b>  ",
                "rating": "5",
                "comment": "<p>Works great for my hair.</p>",
                "images": [],
                "video": null,
            }),
        )
        .await
        .unwrap();

    assert_eq!(review.user_name, "Jane");
    assert_eq!(review.rating, 5);
    assert_eq!(review.comment, "Works great for my hair.");
    assert_eq!(review.video, None);
    assert!(review.images.is_empty());
    assert!(!review.approved, "new reviews wait for moderation");
    assert_eq!(review.ip_address, "203.0.113.9");

    let stored = handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, review.id);
    assert_eq!(attempts.count_for("203.0.113.9:review"), 1);
}

#[tokio::test]
async fn should_reject_more_than_three_images_on_images_field() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let mut body = review_body("Works great for my hair.");
    body["images"] = json!([
        "https://cdn.example.com/1.jpg",
        "https://cdn.example.com/2.jpg",
        "https://cdn.example.com/3.jpg",
        "https://cdn.example.com/4.jpg",
    ]);

    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), body)
        .await;

    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors.has_path("images"));
    assert!(reviews.reviews_handle().lock().unwrap().is_empty());
    assert_eq!(attempts.failures_for("203.0.113.9:review"), 1);
}

#[tokio::test]
async fn should_reject_image_that_is_not_a_url() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let mut body = review_body("Works great for my hair.");
    body["images"] = json!(["https://cdn.example.com/1.jpg", "not a url"]);

    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), body)
        .await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert_eq!(errors.headline(), "Image 2 is not a valid URL");
}

#[tokio::test]
async fn should_accept_comment_of_exactly_ten_characters() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), review_body("0123456789"))
        .await;
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn should_reject_comment_of_nine_characters() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), review_body("012345678"))
        .await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("comment"));
}

#[tokio::test]
async fn should_reject_name_made_only_of_markup() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let mut body = review_body("Works great for my hair.");
    body["userName"] = json!("<b> </b>");

    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), body)
        .await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("userName"));
}

#[tokio::test]
async fn should_reject_rating_out_of_range() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let mut body = review_body("Works great for my hair.");
    body["rating"] = json!("6");

    let result = usecase(&attempts, &reviews)
        .execute(&client("203.0.113.9"), body)
        .await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("rating"));
}

#[tokio::test]
async fn should_return_product_not_found_for_unknown_or_inactive_product() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let uc = usecase(&attempts, &reviews);

    for product_id in ["p404", "p-retired"] {
        let mut body = review_body("Works great for my hair.");
        body["productId"] = json!(product_id);
        let result = uc.execute(&client("203.0.113.9"), body).await;
        assert!(
            matches!(result, Err(StorefrontError::ProductNotFound)),
            "{product_id}: expected ProductNotFound, got {result:?}"
        );
    }
    assert!(reviews.reviews_handle().lock().unwrap().is_empty());
    assert_eq!(attempts.failures_for("203.0.113.9:review"), 2);
}

#[tokio::test]
async fn should_rate_limit_repeated_invalid_reviews() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let uc = usecase(&attempts, &reviews);
    let ip = client("203.0.113.9");

    for _ in 0..5 {
        let result = uc.execute(&ip, review_body("short")).await;
        assert!(matches!(result, Err(StorefrontError::ValidationFailed(_))));
    }
    let result = uc.execute(&ip, review_body("Works great for my hair.")).await;
    assert!(
        matches!(result, Err(StorefrontError::RateLimited { .. })),
        "expected RateLimited, got {result:?}"
    );
    assert!(reviews.reviews_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_rate_limit_after_review_budget_is_used() {
    let attempts = MockAttemptRepo::empty();
    let reviews = MockReviewRepo::empty();
    let uc = usecase(&attempts, &reviews);
    let ip = client("203.0.113.9");

    for _ in 0..5 {
        uc.execute(&ip, review_body("Works great for my hair."))
            .await
            .unwrap();
    }
    let result = uc.execute(&ip, review_body("Works great for my hair.")).await;
    assert!(
        matches!(
            result,
            Err(StorefrontError::RateLimited {
                retry_after_secs: 3600
            })
        ),
        "expected RateLimited, got {result:?}"
    );
    assert_eq!(reviews.reviews_handle().lock().unwrap().len(), 5);
}

#[tokio::test]
async fn should_list_only_approved_reviews_newest_first() {
    let mut pending = approved_review("p1", "Pending", Duration::minutes(1));
    pending.approved = false;
    let reviews = MockReviewRepo::new(vec![
        approved_review("p1", "Older", Duration::days(2)),
        approved_review("p1", "Newer", Duration::hours(1)),
        approved_review("p2", "Elsewhere", Duration::minutes(5)),
        pending,
    ]);
    let uc = ListReviewsUseCase { reviews };

    let page = uc.execute("p1", PageRequest::default()).await.unwrap();

    assert_eq!(page.total, 2);
    let names: Vec<&str> = page.items.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(names, ["Newer", "Older"]);
}

#[tokio::test]
async fn should_clamp_page_size_when_listing() {
    let reviews = MockReviewRepo::new(vec![
        approved_review("p1", "A", Duration::hours(3)),
        approved_review("p1", "B", Duration::hours(2)),
    ]);
    let uc = ListReviewsUseCase { reviews };

    let page = uc
        .execute("p1", PageRequest { per_page: 0, page: 2 })
        .await
        .unwrap();

    assert_eq!(page.per_page, 1);
    assert_eq!(page.page, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].user_name, "A");
}
