//! Channel repository for database operations
//!
//! This module provides the ChannelRepository struct which encapsulates
//! SeaORM operations for the channel table. Duplicate names are rejected by
//! the table's unique constraint and surface as [`RepositoryError::Conflict`].

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;

use crate::error::RepositoryError;
use crate::models::channel::{self, Entity as Channel};

/// Fields required to insert a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChannel {
    pub name: String,
    pub channel_type: String,
}

/// Partial update for a channel; `None` leaves a column untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUpdate {
    pub name: Option<String>,
    pub channel_type: Option<String>,
}

impl ChannelUpdate {
    /// Returns true when no column would be written
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.channel_type.is_none()
    }
}

/// Repository for channel database operations
#[derive(Debug, Clone)]
pub struct ChannelRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl ChannelRepository {
    /// Creates a new ChannelRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Fetches one channel; a missing id is `Ok(None)`
    pub async fn get(&self, channel_id: i32) -> Result<Option<channel::Model>, RepositoryError> {
        Ok(Channel::find_by_id(channel_id).one(&*self.db).await?)
    }

    /// Fetches a channel by its exact name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<channel::Model>, RepositoryError> {
        Ok(Channel::find()
            .filter(channel::Column::Name.eq(name))
            .one(&*self.db)
            .await?)
    }

    /// Lists channels in id order, optionally filtered by a name substring
    pub async fn list(
        &self,
        limit: u64,
        offset: u64,
        name_filter: Option<&str>,
    ) -> Result<Vec<channel::Model>, RepositoryError> {
        let mut query = Channel::find();

        if let Some(q) = name_filter
            && !q.is_empty()
        {
            query = query.filter(channel::Column::Name.contains(q));
        }

        Ok(query
            .order_by_asc(channel::Column::ChannelId)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?)
    }

    /// Inserts a channel and returns its new id
    pub async fn create(&self, new: NewChannel) -> Result<i32, RepositoryError> {
        let model = channel::ActiveModel {
            name: Set(new.name),
            channel_type: Set(new.channel_type),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let result = Channel::insert(model).exec(&*self.db).await?;
        Ok(result.last_insert_id)
    }

    /// Applies a partial update; an empty update returns 0 without a write
    pub async fn update(
        &self,
        channel_id: i32,
        update: &ChannelUpdate,
    ) -> Result<u64, RepositoryError> {
        if update.is_empty() {
            return Ok(0);
        }

        let mut query = Channel::update_many();
        if let Some(name) = &update.name {
            query = query.col_expr(channel::Column::Name, Expr::value(name.clone()));
        }
        if let Some(channel_type) = &update.channel_type {
            query = query.col_expr(
                channel::Column::ChannelType,
                Expr::value(channel_type.clone()),
            );
        }

        let result = query
            .filter(channel::Column::ChannelId.eq(channel_id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes a channel, returning the number of rows removed (0 or 1)
    pub async fn delete(&self, channel_id: i32) -> Result<u64, RepositoryError> {
        Self::delete_with(&*self.db, channel_id).await
    }

    /// Same as [`ChannelRepository::delete`] on a caller-supplied connection
    pub async fn delete_with<C: ConnectionTrait>(
        conn: &C,
        channel_id: i32,
    ) -> Result<u64, RepositoryError> {
        let result = Channel::delete_by_id(channel_id).exec(conn).await?;
        Ok(result.rows_affected)
    }
}
