//! Migration to create the per-day campaign metrics table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignDailyMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::CampaignId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::MetricDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::Impressions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::SpendCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CampaignDailyMetrics::RevenueCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_campaign_daily_metrics")
                            .col(CampaignDailyMetrics::CampaignId)
                            .col(CampaignDailyMetrics::MetricDate),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_metrics_campaign_id")
                            .from(
                                CampaignDailyMetrics::Table,
                                CampaignDailyMetrics::CampaignId,
                            )
                            .to(Campaign::Table, Campaign::CampaignId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CampaignDailyMetrics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CampaignDailyMetrics {
    Table,
    CampaignId,
    MetricDate,
    Impressions,
    Clicks,
    SpendCents,
    RevenueCents,
}

#[derive(DeriveIden)]
enum Campaign {
    Table,
    CampaignId,
}
