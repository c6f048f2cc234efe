use chrono::{Duration, Utc};
use serde_json::json;

use bloom_storefront::domain::coupon::CouponRejection;
use bloom_storefront::domain::types::DiscountKind;
use bloom_storefront::error::StorefrontError;
use bloom_storefront::usecase::coupon::CheckCouponUseCase;

use crate::helpers::{MockCouponRepo, dec, test_coupon};

#[tokio::test]
async fn should_quote_coupon_matched_case_insensitively() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![test_coupon("GLOW10")]),
    };

    let quote = uc
        .execute(json!({ "code": " glow10 ", "subtotal": 49.99, "productIds": ["p1"] }))
        .await
        .unwrap();

    assert_eq!(quote.code, "GLOW10");
    assert_eq!(quote.discount_kind, DiscountKind::Percentage);
    assert_eq!(quote.discount_amount, dec("5.00"));
}

#[tokio::test]
async fn should_accept_subtotal_as_numeric_string() {
    let mut coupon = test_coupon("FIVEOFF");
    coupon.discount_kind = DiscountKind::FixedAmount;
    coupon.discount_value = dec("5");
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![coupon]),
    };

    let quote = uc
        .execute(json!({ "code": "FIVEOFF", "subtotal": "30.00" }))
        .await
        .unwrap();
    assert_eq!(quote.discount_amount, dec("5"));
}

#[tokio::test]
async fn should_reject_unknown_code() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![]),
    };
    let result = uc.execute(json!({ "code": "NOPE", "subtotal": 10 })).await;
    assert!(
        matches!(
            result,
            Err(StorefrontError::CouponRejected(CouponRejection::NotFound))
        ),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_subtotal() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![test_coupon("GLOW10")]),
    };
    let result = uc.execute(json!({ "code": "GLOW10" })).await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("subtotal"));
}

#[tokio::test]
async fn should_reject_negative_subtotal() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![test_coupon("GLOW10")]),
    };
    let result = uc.execute(json!({ "code": "GLOW10", "subtotal": -1 })).await;
    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert_eq!(errors.headline(), "Subtotal cannot be negative");
}

#[tokio::test]
async fn should_report_expired_before_limit_reached() {
    let mut coupon = test_coupon("OLD");
    coupon.expires_at = Some(Utc::now() - Duration::days(1));
    coupon.usage_limit = Some(10);
    coupon.usage_count = 10;
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![coupon]),
    };

    let result = uc.execute(json!({ "code": "OLD", "subtotal": 10 })).await;
    assert!(matches!(
        result,
        Err(StorefrontError::CouponRejected(CouponRejection::Expired))
    ));
}

#[tokio::test]
async fn should_quote_minimum_in_rejection() {
    let mut coupon = test_coupon("BIG");
    coupon.min_order_amount = Some(dec("50.00"));
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![coupon]),
    };

    let err = uc
        .execute(json!({ "code": "BIG", "subtotal": 20 }))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "order subtotal must be at least 50.00");
}

#[tokio::test]
async fn should_apply_restricted_coupon_only_to_matching_cart() {
    let mut coupon = test_coupon("OILS");
    coupon.applies_to_all = false;
    coupon.eligible_product_ids = ["p1".to_owned()].into_iter().collect();
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![coupon]),
    };

    let outside = uc
        .execute(json!({ "code": "OILS", "subtotal": 20, "productIds": ["p2", "p3"] }))
        .await;
    assert!(matches!(
        outside,
        Err(StorefrontError::CouponRejected(
            CouponRejection::NotApplicableToCart
        ))
    ));

    let matching = uc
        .execute(json!({ "code": "OILS", "subtotal": 20, "productIds": ["p2", "p1"] }))
        .await;
    assert!(matching.is_ok(), "got {matching:?}");
}

#[tokio::test]
async fn should_reject_subtotal_at_decimal_max_as_field_error() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![test_coupon("GLOW10")]),
    };

    let result = uc
        .execute(json!({ "code": "GLOW10", "subtotal": "79228162514264337593543950335" }))
        .await;

    let Err(StorefrontError::ValidationFailed(errors)) = result else {
        panic!("expected ValidationFailed, got {result:?}");
    };
    assert!(errors.has_path("subtotal"));
    assert_eq!(errors.headline(), "Subtotal is too large");
}

#[tokio::test]
async fn should_quote_largest_accepted_subtotal() {
    let uc = CheckCouponUseCase {
        coupons: MockCouponRepo::new(vec![test_coupon("GLOW10")]),
    };

    let quote = uc
        .execute(json!({ "code": "GLOW10", "subtotal": "1000000000000" }))
        .await
        .unwrap();
    assert_eq!(quote.discount_amount, dec("100000000000"));
}
