use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CouponProducts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CouponProducts::CouponId).uuid().not_null())
                    .col(ColumnDef::new(CouponProducts::ProductId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(CouponProducts::CouponId)
                            .col(CouponProducts::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CouponProducts::Table, CouponProducts::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CouponProducts::Table, CouponProducts::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CouponProducts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CouponProducts {
    Table,
    CouponId,
    ProductId,
}

#[derive(Iden)]
enum Coupons {
    Table,
    Id,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
