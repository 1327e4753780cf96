//! Campaign daily metrics entity
//!
//! One row per campaign per calendar day; rewritten in place on upsert.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

/// Performance counters recorded for a single campaign day
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign_daily_metrics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub campaign_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub metric_date: Date,

    pub impressions: i64,

    pub clicks: i64,

    pub spend_cents: i64,

    pub revenue_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::CampaignId",
        on_delete = "Cascade"
    )]
    Campaign,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
