//! Campaign repository for database operations
//!
//! This module provides the CampaignRepository struct which encapsulates
//! SeaORM operations for the campaign table. It returns records and row
//! counts only; validation lives in the service layer.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;

use crate::error::RepositoryError;
use crate::models::campaign::{self, DEFAULT_STATUS, Entity as Campaign};

/// Fields required to insert a campaign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaign {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget_cents: i64,
}

/// Partial update for a campaign; `None` leaves a column untouched.
///
/// Dates are doubly optional so a date can be cleared
/// (`Some(None)`) as well as left alone (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub budget_cents: Option<i64>,
}

impl CampaignUpdate {
    /// Returns true when no column would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.budget_cents.is_none()
    }
}

/// Repository for campaign database operations
#[derive(Debug, Clone)]
pub struct CampaignRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl CampaignRepository {
    /// Creates a new CampaignRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetches one campaign; a missing id is `Ok(None)`, not an error
    pub async fn get(&self, campaign_id: i32) -> Result<Option<campaign::Model>, RepositoryError> {
        Ok(Campaign::find_by_id(campaign_id).one(&*self.db).await?)
    }

    /// Lists campaigns newest first, optionally filtered by a name substring
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of rows to return
    /// * `offset` - Number of rows to skip
    /// * `name_filter` - Optional substring matched against the name
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
        name_filter: Option<&str>,
    ) -> Result<Vec<campaign::Model>, RepositoryError> {
        let mut query = Campaign::find();

        if let Some(q) = name_filter
            && !q.is_empty()
        {
            query = query.filter(campaign::Column::Name.contains(q));
        }

        Ok(query
            .order_by_desc(campaign::Column::CreatedAt)
            .order_by_desc(campaign::Column::CampaignId)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?)
    }

    /// Inserts a campaign with the default status and returns its new id
    pub async fn create(&self, new: NewCampaign) -> Result<i32, RepositoryError> {
        let model = campaign::ActiveModel {
            name: Set(new.name),
            status: Set(DEFAULT_STATUS.to_string()),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            budget_cents: Set(new.budget_cents),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = Campaign::insert(model).exec(&*self.db).await?;
        Ok(result.last_insert_id)
    }

    /// Applies a partial update and returns the number of rows changed.
    ///
    /// An empty update issues no statement and returns 0.
    pub async fn update(
        &self,
        campaign_id: i32,
        update: &CampaignUpdate,
    ) -> Result<u64, RepositoryError> {
        if update.is_empty() {
            return Ok(0);
        }

        let mut query = Campaign::update_many();
        if let Some(name) = &update.name {
            query = query.col_expr(campaign::Column::Name, Expr::value(name.clone()));
        }
        if let Some(status) = &update.status {
            query = query.col_expr(campaign::Column::Status, Expr::value(status.clone()));
        }
        if let Some(start_date) = update.start_date {
            query = query.col_expr(campaign::Column::StartDate, Expr::value(start_date));
        }
        if let Some(end_date) = update.end_date {
            query = query.col_expr(campaign::Column::EndDate, Expr::value(end_date));
        }
        if let Some(budget_cents) = update.budget_cents {
            query = query.col_expr(campaign::Column::BudgetCents, Expr::value(budget_cents));
        }

        let result = query
            .filter(campaign::Column::CampaignId.eq(campaign_id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes a campaign, returning the number of rows removed (0 or 1)
    pub async fn delete(&self, campaign_id: i32) -> Result<u64, RepositoryError> {
        Self::delete_with(&*self.db, campaign_id).await
    }

    /// Same as [`CampaignRepository::delete`] on a caller-supplied connection
    /// or transaction
    pub async fn delete_with<C: ConnectionTrait>(
        conn: &C,
        campaign_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = Campaign::delete_by_id(campaign_id).exec(conn).await?;
        Ok(result.rows_affected)
    }
}
