//! Content browsing and submission service
//!
//! The community feed, per-category browsing, the caller's own
//! submissions, and new submissions (which award a point with a paired
//! ledger entry).

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use surrealdb::sql::Datetime;

use crate::datastore::Datastore;
use crate::entities::{ContentEntity, NewContent};
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;
use crate::services::hydration::{hydrate_many, HydratedContent};

#[derive(Deserialize)]
struct CountRow {
    total: i64,
}

const SUBMIT_TXN: &str = "\
BEGIN TRANSACTION; \
CREATE content CONTENT $data; \
UPDATE user SET points_balance += 1, total_points_earned += 1 WHERE user_id = $user_id; \
CREATE points_ledger CONTENT { \
    entry_id: $entry_id, \
    user_id: $user_id, \
    amount: 1, \
    entry_type: 'earned', \
    description: 'Content submission', \
    created_at: $now \
}; \
COMMIT TRANSACTION;";

pub struct ContentService {
    datastore: Arc<Datastore>,
    ids: IdGenerator,
}

impl ContentService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            datastore,
            ids: IdGenerator::new(),
        }
    }

    /// `ORDER BY` target for a sort mode; `top_rated` orders by the
    /// projected vote score, anything else by recency
    fn order_column(sort: &str) -> &'static str {
        if sort == "top_rated" {
            "score"
        } else {
            "created_at"
        }
    }

    async fn page(
        &self,
        filter: &str,
        sort: &str,
        bind_key: Option<(&'static str, String)>,
        viewer: Option<&str>,
        page: u32,
        limit: u32,
    ) -> StoreResult<(Vec<HydratedContent>, i64)> {
        let start = i64::from(page.saturating_sub(1)) * i64::from(limit);
        let select = format!(
            "SELECT *, upvotes - downvotes AS score FROM content WHERE {filter} \
             ORDER BY {} DESC LIMIT $limit START $start",
            Self::order_column(sort)
        );
        let count = format!("SELECT count() AS total FROM content WHERE {filter} GROUP ALL");

        let mut query = self
            .datastore
            .client()
            .query(select)
            .query(count)
            .bind(("limit", i64::from(limit)))
            .bind(("start", start));
        if let Some((key, value)) = bind_key {
            query = query.bind((key, value));
        }
        let mut response = query
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let items: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let count: Option<CountRow> = response
            .take(1)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let hydrated = hydrate_many(&self.datastore, items, viewer).await?;
        Ok((hydrated, count.map(|c| c.total).unwrap_or(0)))
    }

    /// Community feed: user-submitted active content only
    pub async fn feed(
        &self,
        viewer: Option<&str>,
        page: u32,
        limit: u32,
        sort: &str,
    ) -> StoreResult<(Vec<HydratedContent>, i64)> {
        self.page(
            "submitted_by != NONE AND status = 'active'",
            sort,
            None,
            viewer,
            page,
            limit,
        )
        .await
    }

    /// Active content in a category
    pub async fn browse(
        &self,
        category: &str,
        viewer: Option<&str>,
        page: u32,
        limit: u32,
        sort: &str,
    ) -> StoreResult<(Vec<HydratedContent>, i64)> {
        self.page(
            "category = $category AND status = 'active'",
            sort,
            Some(("category", category.to_string())),
            viewer,
            page,
            limit,
        )
        .await
    }

    /// The caller's own submissions, regardless of status
    pub async fn mine(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> StoreResult<(Vec<HydratedContent>, i64)> {
        self.page(
            "submitted_by = $user_id",
            "newest",
            Some(("user_id", user_id.to_string())),
            Some(user_id),
            page,
            limit,
        )
        .await
    }

    /// Submit a new content item. Awards one point with a paired ledger
    /// entry in the same transaction as the insert.
    pub async fn submit(&self, user_id: &str, submission: NewContent) -> StoreResult<ContentEntity> {
        if submission.category.trim().is_empty() {
            return Err(StoreError::Validation("Category is required".to_string()));
        }

        let content_id = self.ids.next("content");
        let entity = submission.into_entity(content_id.clone(), Some(user_id.to_string()));

        self.datastore
            .client()
            .query(SUBMIT_TXN)
            .bind(("data", entity))
            .bind(("user_id", user_id.to_string()))
            .bind(("entry_id", self.ids.next("ledger")))
            .bind(("now", Datetime::from(Utc::now())))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .check()
            .map_err(StoreError::from_db)?;

        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content WHERE content_id = $content_id LIMIT 1")
            .bind(("content_id", content_id.clone()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let created: Option<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        created.ok_or_else(|| StoreError::Query(format!("Content {content_id} not persisted")))
    }
}
