//! Daily performance metrics repository

use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

use crate::error::RepositoryError;
use crate::models::{CampaignDailyMetric, campaign_daily_metric as metric};

/// Counters for one campaign day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyMetricInput {
    pub campaign_id: i32,
    pub metric_date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub spend_cents: i64,
    pub revenue_cents: i64,
}

/// Summed counters over a date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceTotals {
    pub impressions: i64,
    pub clicks: i64,
    pub spend_cents: i64,
    pub revenue_cents: i64,
}

impl PerformanceTotals {
    fn add(mut self, row: &metric::Model) -> Self {
        self.impressions = self.impressions.saturating_add(row.impressions);
        self.clicks = self.clicks.saturating_add(row.clicks);
        self.spend_cents = self.spend_cents.saturating_add(row.spend_cents);
        self.revenue_cents = self.revenue_cents.saturating_add(row.revenue_cents);
        self
    }
}

/// Repository for daily metric database operations
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl MetricsRepository {
    /// Creates a new MetricsRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Inserts the day's counters or overwrites the existing row for that day
    pub async fn upsert_daily_metric(&self, input: &DailyMetricInput) -> Result<(), RepositoryError> {
        let model = metric::ActiveModel {
            campaign_id: Set(input.campaign_id),
            metric_date: Set(input.metric_date),
            impressions: Set(input.impressions),
            clicks: Set(input.clicks),
            spend_cents: Set(input.spend_cents),
            revenue_cents: Set(input.revenue_cents),
        };

        CampaignDailyMetric::insert(model)
            .on_conflict(
                OnConflict::columns([metric::Column::CampaignId, metric::Column::MetricDate])
                    .update_columns([
                        metric::Column::Impressions,
                        metric::Column::Clicks,
                        metric::Column::SpendCents,
                        metric::Column::RevenueCents,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await?;

        Ok(())
    }

    /// Daily rows for a campaign, oldest first. Both bounds are inclusive and
    /// either may be omitted.
    pub async fn list_daily(
        &self,
        campaign_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<metric::Model>, RepositoryError> {
        let mut query =
            CampaignDailyMetric::find().filter(metric::Column::CampaignId.eq(campaign_id));
        if let Some(start) = start {
            query = query.filter(metric::Column::MetricDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(metric::Column::MetricDate.lte(end));
        }

        Ok(query
            .order_by_asc(metric::Column::MetricDate)
            .all(&*self.db)
            .await?)
    }

    /// Sums the counters of every day within the optional inclusive range.
    ///
    /// A range with no rows yields all-zero totals.
    pub async fn aggregate_performance(
        &self,
        campaign_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PerformanceTotals, RepositoryError> {
        // Summed here rather than in SQL: SUM's result type differs per backend.
        let rows = self.list_daily(campaign_id, start, end).await?;
        Ok(rows
            .iter()
            .fold(PerformanceTotals::default(), PerformanceTotals::add))
    }

    /// Removes every metric row of a campaign, returning the number removed
    pub async fn purge_campaign_with<C: ConnectionTrait>(
        conn: &C,
        campaign_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = CampaignDailyMetric::delete_many()
            .filter(metric::Column::CampaignId.eq(campaign_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::campaign::{CampaignRepository, NewCampaign};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    async fn setup() -> (MetricsRepository, i32) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let db = Arc::new(db);
        let campaign_id = CampaignRepository::new(db.clone())
            .create(NewCampaign {
                name: "Launch".to_string(),
                start_date: None,
                end_date: None,
                budget_cents: 10_000,
            })
            .await
            .unwrap();
        (MetricsRepository::new(db), campaign_id)
    }

    fn input(campaign_id: i32, date: NaiveDate, impressions: i64, clicks: i64) -> DailyMetricInput {
        DailyMetricInput {
            campaign_id,
            metric_date: date,
            impressions,
            clicks,
            spend_cents: 500,
            revenue_cents: 1000,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_day() {
        let (repo, campaign_id) = setup().await;

        repo.upsert_daily_metric(&input(campaign_id, day(1), 100, 10))
            .await
            .unwrap();
        repo.upsert_daily_metric(&input(campaign_id, day(1), 300, 12))
            .await
            .unwrap();

        let rows = repo.list_daily(campaign_id, Some(day(1)), Some(day(1))).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].impressions, 300);
        assert_eq!(rows[0].clicks, 12);
    }

    #[tokio::test]
    async fn test_aggregate_respects_inclusive_range() {
        let (repo, campaign_id) = setup().await;

        for (d, impressions) in [(1, 100), (2, 50), (5, 1000)] {
            repo.upsert_daily_metric(&input(campaign_id, day(d), impressions, 5))
                .await
                .unwrap();
        }

        let totals = repo
            .aggregate_performance(campaign_id, Some(day(1)), Some(day(2)))
            .await
            .unwrap();
        assert_eq!(
            totals,
            PerformanceTotals {
                impressions: 150,
                clicks: 10,
                spend_cents: 1000,
                revenue_cents: 2000,
            }
        );

        let empty = repo
            .aggregate_performance(campaign_id, Some(day(10)), Some(day(20)))
            .await
            .unwrap();
        assert_eq!(empty, PerformanceTotals::default());

        let open_ended = repo
            .aggregate_performance(campaign_id, Some(day(2)), None)
            .await
            .unwrap();
        assert_eq!(open_ended.impressions, 1050);
    }
}
