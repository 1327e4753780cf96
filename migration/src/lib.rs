//! Database migrations for the campaigns console.
//!
//! Creates the campaign, channel, link and daily metrics tables using
//! SeaORM Migration so the same schema applies to MySQL, Postgres and SQLite.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_campaign;
mod m2025_01_10_000002_create_channel;
mod m2025_01_10_000003_create_campaign_channel_xref;
mod m2025_01_10_000004_create_campaign_daily_metrics;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_campaign::Migration),
            Box::new(m2025_01_10_000002_create_channel::Migration),
            Box::new(m2025_01_10_000003_create_campaign_channel_xref::Migration),
            Box::new(m2025_01_10_000004_create_campaign_daily_metrics::Migration),
        ]
    }
}
