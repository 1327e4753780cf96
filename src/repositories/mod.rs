//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for the campaign, channel, link and daily metric tables. Repositories return
//! records and row counts; business rules live in [`crate::services`].

pub mod campaign;
pub mod channel;
pub mod link;
pub mod metrics;

pub use campaign::{CampaignRepository, CampaignUpdate, NewCampaign};
pub use channel::{ChannelRepository, ChannelUpdate, NewChannel};
pub use link::{LinkRepository, LinkStats, MappingRow};
pub use metrics::{DailyMetricInput, MetricsRepository, PerformanceTotals};
