//! Channel orchestration

use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::campaign::DeleteOutcome;
use super::validation;
use crate::error::{RepositoryError, ServiceError};
use crate::models::channel::DEFAULT_TYPE;
use crate::models::{campaign, channel};
use crate::repositories::{ChannelRepository, ChannelUpdate, LinkRepository, NewChannel};

/// Channel business operations
#[derive(Debug, Clone)]
pub struct ChannelService {
    db: Arc<DatabaseConnection>,
    channels: ChannelRepository,
    links: LinkRepository,
}

impl ChannelService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            channels: ChannelRepository::new(db.clone()),
            links: LinkRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a channel; a blank or missing type becomes `"Other"`.
    ///
    /// A duplicate name is reported as [`ServiceError::Conflict`].
    #[instrument(skip(self))]
    pub async fn create_channel(
        &self,
        name: &str,
        channel_type: Option<&str>,
    ) -> Result<i32, ServiceError> {
        let name = validation::required_name("name", name)?;
        let channel_type = channel_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TYPE)
            .to_string();

        let channel_id = self
            .channels
            .create(NewChannel {
                name: name.clone(),
                channel_type,
            })
            .await
            .map_err(|err| duplicate_name(err, &name))?;

        info!(channel_id, "Channel created");
        Ok(channel_id)
    }

    pub async fn get_channel(&self, channel_id: i32) -> Result<Option<channel::Model>, ServiceError> {
        Ok(self.channels.get(channel_id).await?)
    }

    pub async fn list_channels(
        &self,
        limit: u64,
        offset: u64,
        q: Option<&str>,
    ) -> Result<Vec<channel::Model>, ServiceError> {
        Ok(self.channels.list(limit, offset, q).await?)
    }

    /// Applies a partial update; an empty update returns 0 without a write
    #[instrument(skip(self, update))]
    pub async fn update_channel(
        &self,
        channel_id: i32,
        update: ChannelUpdate,
    ) -> Result<u64, ServiceError> {
        if update.is_empty() {
            debug!("Empty channel update ignored");
            return Ok(0);
        }

        let update = ChannelUpdate {
            name: update
                .name
                .map(|name| validation::required_name("name", &name))
                .transpose()?,
            channel_type: update
                .channel_type
                .map(|t| validation::required_name("type", &t))
                .transpose()?,
        };

        let rows = match self.channels.update(channel_id, &update).await {
            Ok(rows) => rows,
            Err(err) => {
                let name = update.name.as_deref().unwrap_or_default();
                return Err(duplicate_name(err, name));
            }
        };

        info!(rows, "Channel updated");
        Ok(rows)
    }

    /// Deletes a channel unless campaigns are still linked to it; `force`
    /// purges the links first, in the same transaction
    #[instrument(skip(self))]
    pub async fn delete_channel_safe(
        &self,
        channel_id: i32,
        force: bool,
    ) -> Result<DeleteOutcome, ServiceError> {
        let linked_count = self.links.count_campaigns_for_channel(channel_id).await?;
        if linked_count > 0 && !force {
            debug!(linked_count, "Channel delete refused, campaigns still linked");
            return Ok(DeleteOutcome {
                deleted: false,
                linked_count,
            });
        }

        let txn = self.db.begin().await?;
        LinkRepository::purge_channel_with(&txn, channel_id).await?;
        let removed = ChannelRepository::delete_with(&txn, channel_id).await?;
        txn.commit().await?;

        let deleted = removed == 1;
        if deleted {
            info!(linked_count, force, "Channel deleted");
        }
        Ok(DeleteOutcome {
            deleted,
            linked_count,
        })
    }

    /// Campaigns linked to a channel, newest first
    pub async fn campaigns_for_channel(
        &self,
        channel_id: i32,
    ) -> Result<Vec<campaign::Model>, ServiceError> {
        if self.channels.get(channel_id).await?.is_none() {
            return Err(ServiceError::not_found("channel", channel_id));
        }
        Ok(self.links.list_campaigns_for_channel(channel_id).await?)
    }
}

fn duplicate_name(err: RepositoryError, name: &str) -> ServiceError {
    match err {
        RepositoryError::Conflict(_) => {
            ServiceError::Conflict(format!("channel name '{name}' already exists"))
        }
        other => other.into(),
    }
}
