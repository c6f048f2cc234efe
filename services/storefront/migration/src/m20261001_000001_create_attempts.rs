use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attempts::Key).string().not_null())
                    .col(ColumnDef::new(Attempts::Succeeded).boolean().not_null())
                    .col(
                        ColumnDef::new(Attempts::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Window counts filter on key and a lower time bound.
        manager
            .create_index(
                Index::create()
                    .table(Attempts::Table)
                    .col(Attempts::Key)
                    .col(Attempts::OccurredAt)
                    .name("idx_attempts_key_occurred_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attempts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attempts {
    Table,
    Id,
    Key,
    Succeeded,
    OccurredAt,
}
