use sea_orm::entity::prelude::*;

/// Customer review. Created unapproved; moderation flips `approved`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: String,
    pub user_name: String,
    pub address: Option<String>,
    pub rating: i16,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    /// JSON array of image URLs (at most 3).
    pub images: Json,
    pub video: Option<String>,
    pub approved: bool,
    pub ip_address: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Product,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
