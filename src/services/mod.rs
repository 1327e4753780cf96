//! # Service Layer
//!
//! Business rules on top of the repositories: input validation, existence
//! checks, safe deletes, transactional multi-step writes and performance
//! ratios. Services share one pool handle, passed in at construction.

pub mod campaign;
pub mod channel;
pub mod inspect;
pub mod performance;
mod validation;

pub use campaign::{CampaignDetail, CampaignService, DeleteOutcome, MetricInput};
pub use channel::ChannelService;
pub use inspect::{DbSnapshot, InspectService};
pub use performance::PerformanceReport;
pub use validation::StatusPolicy;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;

/// The services a console session dispatches to
#[derive(Debug, Clone)]
pub struct Services {
    pub campaigns: CampaignService,
    pub channels: ChannelService,
    pub inspect: InspectService,
}

impl Services {
    /// Builds every service over the same pool
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self {
            campaigns: CampaignService::new(db.clone())
                .with_status_policy(StatusPolicy::from_config(&config.campaign)),
            channels: ChannelService::new(db.clone()),
            inspect: InspectService::new(db),
        }
    }
}
