//! # Data Models
//!
//! SeaORM entities for the four tables managed by the console.

pub mod campaign;
pub mod campaign_channel_xref;
pub mod campaign_daily_metric;
pub mod channel;

pub use campaign::Entity as Campaign;
pub use campaign_channel_xref::Entity as CampaignChannelXref;
pub use campaign_daily_metric::Entity as CampaignDailyMetric;
pub use channel::Entity as Channel;
