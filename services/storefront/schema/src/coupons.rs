use sea_orm::entity::prelude::*;

/// Discount coupon. `code` is matched case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    /// `percentage` or `fixed_amount`.
    pub discount_kind: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub discount_value: Decimal,
    pub active: bool,
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub min_order_amount: Option<Decimal>,
    pub applies_to_all: bool,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coupon_products::Entity")]
    CouponProducts,
}

impl Related<super::coupon_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
