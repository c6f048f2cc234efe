//! SeaORM entities for the storefront database.

pub mod attempts;
pub mod contact_messages;
pub mod coupon_products;
pub mod coupons;
pub mod products;
pub mod reviews;
