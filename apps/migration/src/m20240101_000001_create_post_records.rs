use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostRecords::PostId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostRecords::Status).string().not_null())
                    .col(ColumnDef::new(PostRecords::CreatedAt).string().not_null())
                    .col(ColumnDef::new(PostRecords::Record).json_binary().not_null())
                    .to_owned(),
            )
            .await?;

        // Serves the published feed: status filter, created_at ordering.
        manager
            .create_index(
                Index::create()
                    .name("idx_post_records_status_created_at")
                    .table(PostRecords::Table)
                    .col(PostRecords::Status)
                    .col(PostRecords::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PostRecords {
    Table,
    PostId,
    Status,
    CreatedAt,
    Record,
}
