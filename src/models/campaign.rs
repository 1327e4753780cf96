//! Campaign entity model
//!
//! This module contains the SeaORM entity model for the campaign table.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Default status assigned to newly created campaigns
pub const DEFAULT_STATUS: &str = "planned";

/// Campaign entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaign")]
pub struct Model {
    /// Auto-assigned identifier (primary key)
    #[sea_orm(primary_key)]
    pub campaign_id: i32,

    /// Display name, never blank
    pub name: String,

    /// Free-text lifecycle label (normalized to lowercase)
    pub status: String,

    /// Optional first day of the campaign
    pub start_date: Option<Date>,

    /// Optional last day of the campaign (never before `start_date`)
    pub end_date: Option<Date>,

    /// Budget in cents, non-negative
    pub budget_cents: i64,

    /// Timestamp when the campaign was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campaign_channel_xref::Entity")]
    CampaignChannelXref,
    #[sea_orm(has_many = "super::campaign_daily_metric::Entity")]
    CampaignDailyMetric,
}

impl Related<super::campaign_channel_xref::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignChannelXref.def()
    }
}

impl Related<super::campaign_daily_metric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignDailyMetric.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
