
mod contact_test;
mod coupon_test;
mod review_test;
