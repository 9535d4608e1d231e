use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_timeline_table::Timeline;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(File::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(File::TimelineId).uuid().not_null())
                    .col(ColumnDef::new(File::FileName).string().not_null())
                    .col(ColumnDef::new(File::Url).string().not_null())
                    .col(ColumnDef::new(File::Size).big_integer().not_null())
                    .col(ColumnDef::new(File::MimeType).string())
                    .col(ColumnDef::new(File::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(File::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_file_timeline_id")
                            .from(File::Table, File::TimelineId)
                            .to(Timeline::Table, Timeline::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_file_timeline_id")
                    .table(File::Table)
                    .col(File::TimelineId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(File::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum File {
    Table,
    Id,
    TimelineId,
    FileName,
    Url,
    Size,
    MimeType,
    CreatedAt,
    UpdatedAt,
}
