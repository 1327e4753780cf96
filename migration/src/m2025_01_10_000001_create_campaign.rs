//! Migration to create the campaign table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaign::CampaignId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaign::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Campaign::Status)
                            .string_len(64)
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(Campaign::StartDate).date().null())
                    .col(ColumnDef::new(Campaign::EndDate).date().null())
                    .col(
                        ColumnDef::new(Campaign::BudgetCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaign::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_campaign_created_at")
                    .table(Campaign::Table)
                    .col(Campaign::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_campaign_created_at")
                    .table(Campaign::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Campaign {
    Table,
    CampaignId,
    Name,
    Status,
    StartDate,
    EndDate,
    BudgetCents,
    CreatedAt,
}
