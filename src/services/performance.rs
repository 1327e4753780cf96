//! Derived performance ratios

use chrono::NaiveDate;

use crate::repositories::PerformanceTotals;

/// Summed counters for a campaign over a date range plus derived ratios
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub campaign_id: i32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub totals: PerformanceTotals,
    /// clicks / impressions
    pub ctr: f64,
    /// Average cost per click in currency units
    pub cpc: f64,
    /// revenue / spend
    pub roas: f64,
}

impl PerformanceReport {
    /// Derives the ratios; a zero denominator yields 0.0 for that ratio.
    pub fn from_totals(
        campaign_id: i32,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        totals: PerformanceTotals,
    ) -> Self {
        Self {
            campaign_id,
            start,
            end,
            ctr: ratio(totals.clicks, totals.impressions),
            cpc: ratio(totals.spend_cents, totals.clicks) / 100.0,
            roas: ratio(totals.revenue_cents, totals.spend_cents),
            totals,
        }
    }
}

fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
