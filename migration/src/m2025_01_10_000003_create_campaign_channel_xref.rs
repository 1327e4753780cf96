//! Migration to create the campaign/channel association table.
//!
//! The composite primary key allows at most one row per pair; both foreign
//! keys cascade so deleting either parent drops its links.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignChannelXref::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignChannelXref::CampaignId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignChannelXref::ChannelId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_campaign_channel_xref")
                            .col(CampaignChannelXref::CampaignId)
                            .col(CampaignChannelXref::ChannelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xref_campaign_id")
                            .from(CampaignChannelXref::Table, CampaignChannelXref::CampaignId)
                            .to(Campaign::Table, Campaign::CampaignId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_xref_channel_id")
                            .from(CampaignChannelXref::Table, CampaignChannelXref::ChannelId)
                            .to(Channel::Table, Channel::ChannelId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookups (campaigns for a channel, channel reference counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_xref_channel_id")
                    .table(CampaignChannelXref::Table)
                    .col(CampaignChannelXref::ChannelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_xref_channel_id")
                    .table(CampaignChannelXref::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CampaignChannelXref::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CampaignChannelXref {
    Table,
    CampaignId,
    ChannelId,
}

#[derive(DeriveIden)]
enum Campaign {
    Table,
    CampaignId,
}

#[derive(DeriveIden)]
enum Channel {
    Table,
    ChannelId,
}
