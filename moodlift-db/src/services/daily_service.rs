//! Daily content allocator
//!
//! Assigns each (user, category, day) a stable, position-ranked set of up
//! to ten content items the user has not seen before. The set is created
//! on the first access of the day and reused on every subsequent access;
//! the unique index on the assignment slot resolves creation races by
//! failing the losing transaction, which then re-reads the winner's set.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use surrealdb::sql::Datetime;

use crate::datastore::Datastore;
use crate::entities::{AssignmentEntity, ContentEntity, ViewedContentEntity};
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;
use crate::services::hydration::{hydrate_many, HydratedContent};

/// Items assigned per category per day
const DAILY_LIMIT: usize = 10;

/// One hydrated slot of a user's daily set
#[derive(Debug, Clone)]
pub struct DailyItem {
    pub assignment: AssignmentEntity,
    pub content: HydratedContent,
}

pub struct DailyService {
    datastore: Arc<Datastore>,
    ids: IdGenerator,
}

impl DailyService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            datastore,
            ids: IdGenerator::new(),
        }
    }

    /// Today's content set for the user and category, creating it on the
    /// first access of the day. Returns an empty list when no eligible
    /// content exists.
    pub async fn daily(&self, user_id: &str, category: &str) -> StoreResult<Vec<DailyItem>> {
        let today = Utc::now().date_naive().to_string();

        let existing = self.assignments(user_id, category, &today).await?;
        if !existing.is_empty() {
            return self.hydrate(user_id, existing).await;
        }

        let chosen = self.sample_unseen(user_id, category).await?;
        if chosen.is_empty() {
            return Ok(Vec::new());
        }

        if let Err(e) = self.persist(user_id, category, &today, &chosen).await {
            // A concurrent first access already created today's set; fall
            // through and return whatever was persisted.
            match e {
                StoreError::AlreadyExists(_) => {}
                other => return Err(other),
            }
        }

        let assigned = self.assignments(user_id, category, &today).await?;
        self.hydrate(user_id, assigned).await
    }

    async fn assignments(
        &self,
        user_id: &str,
        category: &str,
        date: &str,
    ) -> StoreResult<Vec<AssignmentEntity>> {
        let mut response = self
            .datastore
            .client()
            .query(
                "SELECT * FROM daily_assignment \
                 WHERE user_id = $user_id AND category = $category AND assignment_date = $date \
                 ORDER BY position_in_day ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("category", category.to_string()))
            .bind(("date", date.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    /// Unweighted random sample (without replacement) of active content
    /// in the category that the user has never been shown
    async fn sample_unseen(&self, user_id: &str, category: &str) -> StoreResult<Vec<String>> {
        let mut response = self
            .datastore
            .client()
            .query(
                "SELECT * FROM content \
                 WHERE category = $category AND status = 'active' \
                   AND content_id NOTINSIDE \
                       (SELECT VALUE content_id FROM viewed_content WHERE user_id = $user_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("category", category.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let eligible: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut ids: Vec<String> = eligible.into_iter().map(|c| c.content_id).collect();
        let mut rng = StdRng::from_entropy();
        ids.shuffle(&mut rng);
        ids.truncate(DAILY_LIMIT);
        Ok(ids)
    }

    /// Persist the chosen set with sequential positions, together with the
    /// paired view-log rows, in one transaction
    async fn persist(
        &self,
        user_id: &str,
        category: &str,
        date: &str,
        content_ids: &[String],
    ) -> StoreResult<()> {
        let now = Datetime::from(Utc::now());

        let mut statements = vec!["BEGIN TRANSACTION;".to_string()];
        for (index, _) in content_ids.iter().enumerate() {
            statements.push(format!(
                "CREATE type::thing('daily_assignment', $slot_key_{index}) CONTENT $assignment_{index};"
            ));
            statements.push(format!(
                "UPSERT type::thing('viewed_content', $view_key_{index}) CONTENT $viewed_{index};"
            ));
        }
        statements.push("COMMIT TRANSACTION;".to_string());

        let mut query = self.datastore.client().query(statements.join(" "));
        for (index, content_id) in content_ids.iter().enumerate() {
            let position = index + 1;
            let assignment = AssignmentEntity {
                assignment_id: self.ids.next("assignment"),
                user_id: user_id.to_string(),
                category: category.to_string(),
                content_id: content_id.clone(),
                position_in_day: position as i64,
                assignment_date: date.to_string(),
            };
            let viewed = ViewedContentEntity {
                user_id: user_id.to_string(),
                content_id: content_id.clone(),
                viewed_at: now.clone(),
            };
            query = query
                .bind((
                    format!("slot_key_{index}"),
                    format!("{user_id}:{category}:{date}:{position}"),
                ))
                .bind((format!("assignment_{index}"), assignment))
                .bind((
                    format!("view_key_{index}"),
                    format!("{user_id}:{content_id}"),
                ))
                .bind((format!("viewed_{index}"), viewed));
        }

        query
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .check()
            .map_err(StoreError::from_db)?;

        tracing::debug!(
            "Created {} daily assignments for {user_id}/{category} on {date}",
            content_ids.len()
        );
        Ok(())
    }

    async fn hydrate(
        &self,
        user_id: &str,
        assignments: Vec<AssignmentEntity>,
    ) -> StoreResult<Vec<DailyItem>> {
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = assignments.iter().map(|a| a.content_id.clone()).collect();
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content WHERE content_id INSIDE $ids")
            .bind(("ids", ids))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let contents: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let hydrated = hydrate_many(&self.datastore, contents, Some(user_id)).await?;
        let mut by_id: std::collections::HashMap<String, HydratedContent> = hydrated
            .into_iter()
            .map(|h| (h.content.content_id.clone(), h))
            .collect();

        // Preserve assignment order; drop slots whose content row vanished
        Ok(assignments
            .into_iter()
            .filter_map(|assignment| {
                by_id
                    .remove(&assignment.content_id)
                    .map(|content| DailyItem {
                        assignment,
                        content,
                    })
            })
            .collect())
    }
}
