//! Campaign ↔ channel link repository
//!
//! Links live in `campaign_channel_xref`, keyed by the (campaign, channel)
//! pair. Functions suffixed `_with` take any [`ConnectionTrait`] so the
//! service layer can compose them inside a transaction.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::sync::Arc;

use crate::error::RepositoryError;
use crate::models::{
    Campaign, CampaignChannelXref, Channel, campaign, campaign_channel_xref as xref, channel,
};

/// One link joined with both parents' names
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct MappingRow {
    pub campaign_id: i32,
    pub campaign_name: String,
    pub channel_id: i32,
    pub channel_name: String,
}

/// Aggregate counters over the link table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub links: u64,
    pub campaigns_with_channels: u64,
    pub channels_with_campaigns: u64,
}

/// Repository for link database operations
#[derive(Debug, Clone)]
pub struct LinkRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl LinkRepository {
    /// Creates a new LinkRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts the link if absent. Returns true only when a row was created.
    pub async fn link(&self, campaign_id: i32, channel_id: i32) -> Result<bool, RepositoryError> {
        Self::link_with(&*self.db, campaign_id, channel_id).await
    }

    /// De-duplicating insert on a caller-supplied connection.
    ///
    /// PostgreSQL and SQLite use `ON CONFLICT DO NOTHING`. MySQL has no
    /// portable equivalent, so the primary-key violation is caught instead;
    /// either way a duplicate reports `false`.
    pub async fn link_with<C: ConnectionTrait>(
        conn: &C,
        campaign_id: i32,
        channel_id: i32,
    ) -> Result<bool, RepositoryError> {
        let link = xref::ActiveModel {
            campaign_id: Set(campaign_id),
            channel_id: Set(channel_id),
        };

        let mut insert = CampaignChannelXref::insert(link);
        if conn.get_database_backend() != DbBackend::MySql {
            insert = insert.on_conflict(
                OnConflict::columns([xref::Column::CampaignId, xref::Column::ChannelId])
                    .do_nothing()
                    .to_owned(),
            );
        }

        match insert.exec_without_returning(conn).await {
            Ok(rows) => Ok(rows == 1),
            Err(err) => match RepositoryError::database_error(err) {
                RepositoryError::Conflict(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    /// Returns whether the pair is linked
    pub async fn exists(&self, campaign_id: i32, channel_id: i32) -> Result<bool, RepositoryError> {
        Self::exists_with(&*self.db, campaign_id, channel_id).await
    }

    /// Existence check on a caller-supplied connection
    pub async fn exists_with<C: ConnectionTrait>(
        conn: &C,
        campaign_id: i32,
        channel_id: i32,
    ) -> Result<bool, RepositoryError> {
        let found = CampaignChannelXref::find_by_id((campaign_id, channel_id))
            .one(conn)
            .await?;
        Ok(found.is_some())
    }

    /// Removes the link, returning the number of rows removed (0 or 1)
    pub async fn unlink(&self, campaign_id: i32, channel_id: i32) -> Result<u64, RepositoryError> {
        let result = CampaignChannelXref::delete_many()
            .filter(xref::Column::CampaignId.eq(campaign_id))
            .filter(xref::Column::ChannelId.eq(channel_id))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Number of channels linked to a campaign
    pub async fn count_channels_for_campaign(&self, campaign_id: i32) -> Result<u64, RepositoryError> {
        Ok(CampaignChannelXref::find()
            .filter(xref::Column::CampaignId.eq(campaign_id))
            .count(&*self.db)
            .await?)
    }

    /// Number of campaigns linked to a channel
    pub async fn count_campaigns_for_channel(&self, channel_id: i32) -> Result<u64, RepositoryError> {
        Ok(CampaignChannelXref::find()
            .filter(xref::Column::ChannelId.eq(channel_id))
            .count(&*self.db)
            .await?)
    }

    /// Every link with both names, ordered by campaign id then channel id
    pub async fn list_all_mappings(&self) -> Result<Vec<MappingRow>, RepositoryError> {
        Ok(CampaignChannelXref::find()
            .select_only()
            .column(xref::Column::CampaignId)
            .column_as(campaign::Column::Name, "campaign_name")
            .column(xref::Column::ChannelId)
            .column_as(channel::Column::Name, "channel_name")
            .join(JoinType::InnerJoin, xref::Relation::Campaign.def())
            .join(JoinType::InnerJoin, xref::Relation::Channel.def())
            .order_by_asc(xref::Column::CampaignId)
            .order_by_asc(xref::Column::ChannelId)
            .into_model::<MappingRow>()
            .all(&*self.db)
            .await?)
    }

    /// Channels linked to a campaign, ordered by name
    pub async fn list_channels_for_campaign(
        &self,
        campaign_id: i32,
    ) -> Result<Vec<channel::Model>, RepositoryError> {
        Ok(Channel::find()
            .join(JoinType::InnerJoin, channel::Relation::CampaignChannelXref.def())
            .filter(xref::Column::CampaignId.eq(campaign_id))
            .order_by_asc(channel::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Campaigns linked to a channel, newest first
    pub async fn list_campaigns_for_channel(
        &self,
        channel_id: i32,
    ) -> Result<Vec<campaign::Model>, RepositoryError> {
        Ok(Campaign::find()
            .join(JoinType::InnerJoin, campaign::Relation::CampaignChannelXref.def())
            .filter(xref::Column::ChannelId.eq(channel_id))
            .order_by_desc(campaign::Column::CreatedAt)
            .order_by_desc(campaign::Column::CampaignId)
            .all(&*self.db)
            .await?)
    }

    /// Raw link rows, paged
    pub async fn list_links(&self, limit: u64, offset: u64) -> Result<Vec<xref::Model>, RepositoryError> {
        Ok(CampaignChannelXref::find()
            .order_by_asc(xref::Column::CampaignId)
            .order_by_asc(xref::Column::ChannelId)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?)
    }

    /// Removes every link of a campaign, returning the number removed
    pub async fn purge_campaign_with<C: ConnectionTrait>(
        conn: &C,
        campaign_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = CampaignChannelXref::delete_many()
            .filter(xref::Column::CampaignId.eq(campaign_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Removes every link of a channel, returning the number removed
    pub async fn purge_channel_with<C: ConnectionTrait>(
        conn: &C,
        channel_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = CampaignChannelXref::delete_many()
            .filter(xref::Column::ChannelId.eq(channel_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Total links plus the number of distinct campaigns and channels that
    /// take part in at least one
    pub async fn stats(&self) -> Result<LinkStats, RepositoryError> {
        let links = CampaignChannelXref::find().count(&*self.db).await?;
        let campaigns_with_channels = CampaignChannelXref::find()
            .select_only()
            .column(xref::Column::CampaignId)
            .distinct()
            .count(&*self.db)
            .await?;
        let channels_with_campaigns = CampaignChannelXref::find()
            .select_only()
            .column(xref::Column::ChannelId)
            .distinct()
            .count(&*self.db)
            .await?;

        Ok(LinkStats {
            links,
            campaigns_with_channels,
            channels_with_campaigns,
        })
    }
}
