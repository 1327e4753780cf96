//! Read-only dump of the store for `inspect:db`

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::{campaign, channel};
use crate::repositories::{
    CampaignRepository, ChannelRepository, LinkRepository, LinkStats, MappingRow,
};

/// Rows fetched per round trip while walking a table
const SNAPSHOT_PAGE: u64 = 500;

/// Everything `inspect:db` prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSnapshot {
    pub campaigns: Vec<campaign::Model>,
    pub channels: Vec<channel::Model>,
    pub mappings: Vec<MappingRow>,
    pub stats: LinkStats,
}

#[derive(Debug, Clone)]
pub struct InspectService {
    campaigns: CampaignRepository,
    channels: ChannelRepository,
    links: LinkRepository,
}

impl InspectService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            campaigns: CampaignRepository::new(db.clone()),
            channels: ChannelRepository::new(db.clone()),
            links: LinkRepository::new(db),
        }
    }

    /// Every campaign, channel and link, paged through in full
    pub async fn snapshot(&self) -> Result<DbSnapshot, ServiceError> {
        let mut campaigns = Vec::new();
        loop {
            let page = self
                .campaigns
                .list(SNAPSHOT_PAGE, campaigns.len() as u64, None)
                .await?;
            let done = (page.len() as u64) < SNAPSHOT_PAGE;
            campaigns.extend(page);
            if done {
                break;
            }
        }

        let mut channels = Vec::new();
        loop {
            let page = self
                .channels
                .list(SNAPSHOT_PAGE, channels.len() as u64, None)
                .await?;
            let done = (page.len() as u64) < SNAPSHOT_PAGE;
            channels.extend(page);
            if done {
                break;
            }
        }

        Ok(DbSnapshot {
            campaigns,
            channels,
            mappings: self.links.list_all_mappings().await?,
            stats: self.links.stats().await?,
        })
    }
}
