pub mod admin_login;
pub mod contact;
pub mod coupon;
pub mod rate_limit;
pub mod review;
pub mod upload;
