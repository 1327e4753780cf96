//! Channel entity model
//!
//! This module contains the SeaORM entity model for the channel table,
//! the catalog of places a campaign can run (search, social, email, ...).

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Default category for channels created without a type
pub const DEFAULT_TYPE: &str = "Other";

/// Channel entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "channel")]
pub struct Model {
    /// Auto-assigned identifier (primary key)
    #[sea_orm(primary_key)]
    pub channel_id: i32,

    /// Unique channel name
    pub name: String,

    /// Free-text category
    #[sea_orm(column_name = "type")]
    pub channel_type: String,

    /// Timestamp when the channel was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campaign_channel_xref::Entity")]
    CampaignChannelXref,
}

impl Related<super::campaign_channel_xref::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CampaignChannelXref.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
