pub mod coupon;
pub mod repository;
pub mod types;
pub mod upload;
pub mod validation;
