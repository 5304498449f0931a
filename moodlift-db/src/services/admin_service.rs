//! Moderation service
//!
//! Soft-deletes reported content, lists reported items with their report
//! rows, and aggregates platform-wide counters.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::datastore::Datastore;
use crate::entities::{ContentEntity, ReportEntity};
use crate::error::{StoreError, StoreResult};

/// Platform-wide counters for the admin dashboard
#[derive(Debug, Clone)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_content: i64,
    pub total_reports: i64,
    pub active_content: i64,
}

/// A reported content item with its report rows, most-reported first
#[derive(Debug, Clone)]
pub struct ReportedContent {
    pub content: ContentEntity,
    pub submitter_username: Option<String>,
    pub reports: Vec<ReportEntity>,
}

#[derive(Deserialize)]
struct CountRow {
    total: i64,
}

#[derive(Deserialize)]
struct UserRef {
    user_id: String,
    username: String,
}

pub struct AdminService {
    datastore: Arc<Datastore>,
}

impl AdminService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self { datastore }
    }

    /// Soft-delete a content item. Returns `false` when no such item
    /// exists; the row itself is never removed.
    pub async fn delete_content(&self, content_id: &str) -> StoreResult<bool> {
        let mut response = self
            .datastore
            .client()
            .query(
                "UPDATE content SET status = 'deleted' \
                 WHERE content_id = $content_id RETURN AFTER",
            )
            .bind(("content_id", content_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let updated: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if !updated.is_empty() {
            tracing::info!("Content {content_id} soft-deleted");
        }
        Ok(!updated.is_empty())
    }

    /// All content with at least one report, most-reported first, each
    /// with its report rows attached
    pub async fn reported(&self) -> StoreResult<Vec<ReportedContent>> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content WHERE report_count > 0 ORDER BY report_count DESC")
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let contents: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if contents.is_empty() {
            return Ok(Vec::new());
        }

        let content_ids: Vec<String> = contents.iter().map(|c| c.content_id.clone()).collect();
        let submitter_ids: Vec<String> = contents
            .iter()
            .filter_map(|c| c.submitted_by.clone())
            .collect();

        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content_report WHERE content_id INSIDE $content_ids")
            .query("SELECT user_id, username FROM user WHERE user_id INSIDE $submitter_ids")
            .bind(("content_ids", content_ids))
            .bind(("submitter_ids", submitter_ids))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let reports: Vec<ReportEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let refs: Vec<UserRef> = response
            .take(1)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let usernames: HashMap<String, String> = refs
            .into_iter()
            .map(|r| (r.user_id, r.username))
            .collect();
        let mut by_content: HashMap<String, Vec<ReportEntity>> = HashMap::new();
        for report in reports {
            by_content
                .entry(report.content_id.clone())
                .or_default()
                .push(report);
        }

        Ok(contents
            .into_iter()
            .map(|content| {
                let submitter_username = content
                    .submitted_by
                    .as_ref()
                    .and_then(|id| usernames.get(id).cloned());
                let reports = by_content.remove(&content.content_id).unwrap_or_default();
                ReportedContent {
                    content,
                    submitter_username,
                    reports,
                }
            })
            .collect())
    }

    /// Platform-wide counters
    pub async fn stats(&self) -> StoreResult<AdminStats> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT count() AS total FROM user GROUP ALL")
            .query("SELECT count() AS total FROM content GROUP ALL")
            .query("SELECT count() AS total FROM content_report GROUP ALL")
            .query("SELECT count() AS total FROM content WHERE status = 'active' GROUP ALL")
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let next = |index: usize, response: &mut surrealdb::Response| -> StoreResult<i64> {
            let row: Option<CountRow> = response
                .take(index)
                .map_err(|e| StoreError::Query(e.to_string()))?;
            Ok(row.map(|c| c.total).unwrap_or(0))
        };

        Ok(AdminStats {
            total_users: next(0, &mut response)?,
            total_content: next(1, &mut response)?,
            total_reports: next(2, &mut response)?,
            active_content: next(3, &mut response)?,
        })
    }
}
