use serde_json::{Value, json};

use bloom_storefront::domain::types::RateLimitPolicy;
use bloom_storefront::error::StorefrontError;
use bloom_storefront::usecase::contact::SubmitContactUseCase;
use bloom_storefront::usecase::rate_limit::RateLimiter;

use crate::helpers::{MockAttemptRepo, MockContactRepo, client};

fn usecase(
    attempts: &MockAttemptRepo,
    messages: &MockContactRepo,
) -> SubmitContactUseCase<MockAttemptRepo, MockContactRepo> {
    SubmitContactUseCase {
        limiter: RateLimiter::new(attempts.clone()),
        messages: messages.clone(),
        policy: RateLimitPolicy::CONTACT,
    }
}

fn body() -> Value {
    json!({
        "name": "<i>Sam</i> Rivera",
        "email": " sam@example.com ",
        "phone": "",
        "message": "Do you ship to Lisbon?  ",
    })
}

#[tokio::test]
async fn should_store_sanitized_message() {
    let attempts = MockAttemptRepo::empty();
    let messages = MockContactRepo::empty();

    let stored = usecase(&attempts, &messages)
        .execute(&client("203.0.113.9"), body())
        .await
        .unwrap();

    assert_eq!(stored.name, "Sam Rivera");
    assert_eq!(stored.email, "sam@example.com");
    assert_eq!(stored.phone, None);
    assert_eq!(stored.message, "Do you ship to Lisbon?");
    assert_eq!(stored.ip_address, "203.0.113.9");
    assert_eq!(messages.messages.lock().unwrap().len(), 1);
    assert_eq!(attempts.count_for("203.0.113.9:contact"), 1);
}

#[tokio::test]
async fn should_report_every_invalid_field() {
    let attempts = MockAttemptRepo::empty();
    let messages = MockContactRepo::empty();

    let result = usecase(&attempts, &messages)
        .execute(
            &client("203.0.113.9"),
            json!({ "name": "S", "email": "nope", "message": "hi" }),
        )
        .await;

    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["email", "message", "name"]);
    assert_eq!(attempts.failures_for("203.0.113.9:contact"), 1);
}

#[tokio::test]
async fn should_rate_limit_repeated_invalid_messages() {
    let attempts = MockAttemptRepo::empty();
    let messages = MockContactRepo::empty();
    let uc = usecase(&attempts, &messages);
    let ip = client("203.0.113.9");

    for _ in 0..5 {
        let result = uc.execute(&ip, json!({ "name": "S" })).await;
        assert!(matches!(result, Err(StorefrontError::ValidationFailed(_))));
    }
    let result = uc.execute(&ip, body()).await;
    assert!(
        matches!(result, Err(StorefrontError::RateLimited { .. })),
        "expected RateLimited, got {result:?}"
    );
    assert!(messages.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_body_that_is_not_an_object() {
    let attempts = MockAttemptRepo::empty();
    let messages = MockContactRepo::empty();

    let result = usecase(&attempts, &messages)
        .execute(&client("203.0.113.9"), Value::Null)
        .await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("body"));
}

#[tokio::test]
async fn should_rate_limit_after_contact_budget_is_used() {
    let attempts = MockAttemptRepo::empty();
    let messages = MockContactRepo::empty();
    let uc = usecase(&attempts, &messages);
    let ip = client("203.0.113.9");

    for _ in 0..5 {
        uc.execute(&ip, body()).await.unwrap();
    }
    let result = uc.execute(&ip, body()).await;
    assert!(
        matches!(result, Err(StorefrontError::RateLimited { .. })),
        "expected RateLimited, got {result:?}"
    );
    assert_eq!(messages.messages.lock().unwrap().len(), 5);
}
