use sea_orm_migration::prelude::*;

mod m20261001_000001_create_attempts;
mod m20261001_000002_create_products;
mod m20261001_000003_create_coupons;
mod m20261001_000004_create_coupon_products;
mod m20261001_000005_create_reviews;
mod m20261001_000006_create_contact_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_attempts::Migration),
            Box::new(m20261001_000002_create_products::Migration),
            Box::new(m20261001_000003_create_coupons::Migration),
            Box::new(m20261001_000004_create_coupon_products::Migration),
            Box::new(m20261001_000005_create_reviews::Migration),
            Box::new(m20261001_000006_create_contact_messages::Migration),
        ]
    }
}
