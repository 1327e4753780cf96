//! Campaign orchestration
//!
//! Validates input, checks that referenced records exist and composes
//! repository calls. Multi-statement writes (forced delete, and attach on
//! MySQL) run in a single transaction.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, TransactionTrait};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::performance::PerformanceReport;
use super::validation::{self, StatusPolicy};
use crate::error::ServiceError;
use crate::models::{campaign, campaign_daily_metric, channel};
use crate::repositories::{
    CampaignRepository, CampaignUpdate, ChannelRepository, DailyMetricInput, LinkRepository,
    MetricsRepository, NewCampaign,
};

/// Counters for one campaign day, as accepted by
/// [`CampaignService::upsert_daily_metric`]
pub type MetricInput = DailyMetricInput;

/// Result of a safe delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the record was removed
    pub deleted: bool,
    /// Number of links found before the delete
    pub linked_count: u64,
}

/// A campaign together with its linked channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDetail {
    pub campaign: campaign::Model,
    pub channels: Vec<channel::Model>,
}

/// Campaign business operations
#[derive(Debug, Clone)]
pub struct CampaignService {
    db: Arc<DatabaseConnection>,
    campaigns: CampaignRepository,
    channels: ChannelRepository,
    links: LinkRepository,
    metrics: MetricsRepository,
    status_policy: StatusPolicy,
}

impl CampaignService {
    /// Creates a service with an open status policy
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            campaigns: CampaignRepository::new(db.clone()),
            channels: ChannelRepository::new(db.clone()),
            links: LinkRepository::new(db.clone()),
            metrics: MetricsRepository::new(db.clone()),
            db,
            status_policy: StatusPolicy::default(),
        }
    }

    /// Replaces the status policy
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Validates and inserts a campaign, returning its id
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create_campaign(&self, new: NewCampaign) -> Result<i32, ServiceError> {
        let name = validation::required_name("name", &new.name)?;
        validation::non_negative("budget_cents", new.budget_cents)?;
        validation::date_order(new.start_date, new.end_date)?;

        let campaign_id = self.campaigns.create(NewCampaign { name, ..new }).await?;
        info!(campaign_id, "Campaign created");
        Ok(campaign_id)
    }

    pub async fn get_campaign(
        &self,
        campaign_id: i32,
    ) -> Result<Option<campaign::Model>, ServiceError> {
        Ok(self.campaigns.get(campaign_id).await?)
    }

    /// Campaign plus linked channels; `None` when the campaign is absent
    pub async fn get_campaign_with_channels(
        &self,
        campaign_id: i32,
    ) -> Result<Option<CampaignDetail>, ServiceError> {
        let Some(campaign) = self.campaigns.get(campaign_id).await? else {
            return Ok(None);
        };
        let channels = self.links.list_channels_for_campaign(campaign_id).await?;
        Ok(Some(CampaignDetail { campaign, channels }))
    }

    pub async fn list_campaigns(
        &self,
        limit: u64,
        offset: u64,
        q: Option<&str>,
    ) -> Result<Vec<campaign::Model>, ServiceError> {
        Ok(self.campaigns.list(limit, offset, q).await?)
    }

    /// Applies a partial update and returns the number of rows changed.
    ///
    /// An empty update returns 0 without touching the store. When only one
    /// of the dates is supplied it is checked against the stored other one;
    /// a missing campaign then yields 0.
    #[instrument(skip(self, update))]
    pub async fn update_campaign(
        &self,
        campaign_id: i32,
        update: CampaignUpdate,
    ) -> Result<u64, ServiceError> {
        if update.is_empty() {
            debug!("Empty campaign update ignored");
            return Ok(0);
        }

        let mut update = update;
        if let Some(name) = &update.name {
            update.name = Some(validation::required_name("name", name)?);
        }
        if let Some(budget_cents) = update.budget_cents {
            validation::non_negative("budget_cents", budget_cents)?;
        }
        if let Some(status) = &update.status {
            update.status = Some(self.status_policy.normalize(status)?);
        }

        match (update.start_date, update.end_date) {
            (Some(start), Some(end)) => validation::date_order(start, end)?,
            (Some(start), None) => {
                let Some(stored) = self.campaigns.get(campaign_id).await? else {
                    return Ok(0);
                };
                validation::date_order(start, stored.end_date)?;
            }
            (None, Some(end)) => {
                let Some(stored) = self.campaigns.get(campaign_id).await? else {
                    return Ok(0);
                };
                validation::date_order(stored.start_date, end)?;
            }
            (None, None) => {}
        }

        let rows = self.campaigns.update(campaign_id, &update).await?;
        info!(rows, "Campaign updated");
        Ok(rows)
    }

    /// Assigns a status label, trimmed and lowercased
    #[instrument(skip(self))]
    pub async fn set_status(&self, campaign_id: i32, status: &str) -> Result<u64, ServiceError> {
        let status = self.status_policy.normalize(status)?;
        let update = CampaignUpdate {
            status: Some(status),
            ..Default::default()
        };

        let rows = self.campaigns.update(campaign_id, &update).await?;
        info!(rows, "Campaign status set");
        Ok(rows)
    }

    /// Deletes a campaign unless it still has linked channels.
    ///
    /// With `force`, links and daily metrics are purged and the campaign
    /// removed in one transaction. The link count is read before that
    /// transaction begins.
    #[instrument(skip(self))]
    pub async fn delete_campaign_safe(
        &self,
        campaign_id: i32,
        force: bool,
    ) -> Result<DeleteOutcome, ServiceError> {
        let linked_count = self.links.count_channels_for_campaign(campaign_id).await?;
        self.delete_counted(campaign_id, force, linked_count).await
    }

    /// Second half of a safe delete, acting on a previously read link count.
    /// Links created after that count are purged along with the campaign.
    async fn delete_counted(
        &self,
        campaign_id: i32,
        force: bool,
        linked_count: u64,
    ) -> Result<DeleteOutcome, ServiceError> {
        if linked_count > 0 && !force {
            debug!(linked_count, "Campaign delete refused, channels still linked");
            return Ok(DeleteOutcome {
                deleted: false,
                linked_count,
            });
        }

        let txn = self.db.begin().await?;
        LinkRepository::purge_campaign_with(&txn, campaign_id).await?;
        MetricsRepository::purge_campaign_with(&txn, campaign_id).await?;
        let removed = CampaignRepository::delete_with(&txn, campaign_id).await?;
        txn.commit().await?;

        let deleted = removed == 1;
        if deleted {
            info!(linked_count, force, "Campaign deleted");
        }
        Ok(DeleteOutcome {
            deleted,
            linked_count,
        })
    }

    /// Links a channel to a campaign; `false` when the link already existed
    #[instrument(skip(self))]
    pub async fn attach_channel(
        &self,
        campaign_id: i32,
        channel_id: i32,
    ) -> Result<bool, ServiceError> {
        self.ensure_campaign(campaign_id).await?;
        if self.channels.get(channel_id).await?.is_none() {
            return Err(ServiceError::not_found("channel", channel_id));
        }

        // `ON CONFLICT DO NOTHING` is atomic on its own. A read before the
        // write would leave SQLite unable to upgrade its lock under contention.
        let created = if self.db.get_database_backend() == DbBackend::MySql {
            let txn = self.db.begin().await?;
            let created = if LinkRepository::exists_with(&txn, campaign_id, channel_id).await? {
                false
            } else {
                LinkRepository::link_with(&txn, campaign_id, channel_id).await?
            };
            txn.commit().await?;
            created
        } else {
            self.links.link(campaign_id, channel_id).await?
        };

        if created {
            info!("Channel attached");
        } else {
            debug!("Channel already attached");
        }
        Ok(created)
    }

    /// Removes a link; a missing pair is not an error and yields 0
    #[instrument(skip(self))]
    pub async fn detach_channel(
        &self,
        campaign_id: i32,
        channel_id: i32,
    ) -> Result<u64, ServiceError> {
        let rows = self.links.unlink(campaign_id, channel_id).await?;
        info!(rows, "Channel detached");
        Ok(rows)
    }

    pub async fn channels_for_campaign(
        &self,
        campaign_id: i32,
    ) -> Result<Vec<channel::Model>, ServiceError> {
        self.ensure_campaign(campaign_id).await?;
        Ok(self.links.list_channels_for_campaign(campaign_id).await?)
    }

    /// Records one day of counters, replacing any row for the same day
    #[instrument(skip(self, input), fields(campaign_id = input.campaign_id, date = %input.metric_date))]
    pub async fn upsert_daily_metric(&self, input: MetricInput) -> Result<(), ServiceError> {
        validation::non_negative("impressions", input.impressions)?;
        validation::non_negative("clicks", input.clicks)?;
        validation::non_negative("spend_cents", input.spend_cents)?;
        validation::non_negative("revenue_cents", input.revenue_cents)?;
        self.ensure_campaign(input.campaign_id).await?;

        self.metrics.upsert_daily_metric(&input).await?;
        info!("Daily metric recorded");
        Ok(())
    }

    /// Aggregates a campaign's counters over an optional inclusive range
    #[instrument(skip(self))]
    pub async fn campaign_performance(
        &self,
        campaign_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PerformanceReport, ServiceError> {
        validation::date_order(start, end)?;
        self.ensure_campaign(campaign_id).await?;

        let totals = self
            .metrics
            .aggregate_performance(campaign_id, start, end)
            .await?;
        Ok(PerformanceReport::from_totals(
            campaign_id,
            start,
            end,
            totals,
        ))
    }

    /// Per-day rows behind [`CampaignService::campaign_performance`]
    pub async fn daily_metrics(
        &self,
        campaign_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<campaign_daily_metric::Model>, ServiceError> {
        validation::date_order(start, end)?;
        self.ensure_campaign(campaign_id).await?;
        Ok(self.metrics.list_daily(campaign_id, start, end).await?)
    }

    async fn ensure_campaign(&self, campaign_id: i32) -> Result<(), ServiceError> {
        match self.campaigns.get(campaign_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("campaign", campaign_id)),
        }
    }
}
