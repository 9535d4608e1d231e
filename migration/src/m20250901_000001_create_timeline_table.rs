use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Timeline::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timeline::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timeline::CaseName).string().not_null())
                    .col(ColumnDef::new(Timeline::AreaOfLaw).string().not_null())
                    .col(ColumnDef::new(Timeline::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Timeline::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // The dashboard always lists newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_timeline_created_at")
                    .table(Timeline::Table)
                    .col(Timeline::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Timeline::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Timeline {
    Table,
    Id,
    CaseName,
    AreaOfLaw,
    CreatedAt,
    UpdatedAt,
}
