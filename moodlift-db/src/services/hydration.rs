//! Viewer-aware content hydration
//!
//! Attaches submitter usernames and, for authenticated viewers, the
//! viewer's own vote and unlock status to content rows.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::datastore::Datastore;
use crate::entities::{ContentEntity, UnlockEntity, VoteEntity};
use crate::error::{StoreError, StoreResult};

/// Content row decorated for a specific viewer
#[derive(Debug, Clone)]
pub struct HydratedContent {
    pub content: ContentEntity,
    pub submitter_username: Option<String>,
    /// The viewer's own vote, if any
    pub user_vote: Option<String>,
    pub is_unlocked: bool,
}

#[derive(Deserialize)]
struct UserRef {
    user_id: String,
    username: String,
}

/// Hydrate a batch of content rows for an optional viewer
pub(crate) async fn hydrate_many(
    datastore: &Datastore,
    items: Vec<ContentEntity>,
    viewer: Option<&str>,
) -> StoreResult<Vec<HydratedContent>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let submitter_ids: Vec<String> = items
        .iter()
        .filter_map(|c| c.submitted_by.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let mut usernames: HashMap<String, String> = HashMap::new();
    if !submitter_ids.is_empty() {
        let mut response = datastore
            .client()
            .query("SELECT user_id, username FROM user WHERE user_id INSIDE $ids")
            .bind(("ids", submitter_ids))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let refs: Vec<UserRef> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        usernames.extend(refs.into_iter().map(|r| (r.user_id, r.username)));
    }

    let mut votes: HashMap<String, String> = HashMap::new();
    let mut unlocked: HashSet<String> = HashSet::new();
    if let Some(user_id) = viewer {
        let content_ids: Vec<String> = items.iter().map(|c| c.content_id.clone()).collect();
        let mut response = datastore
            .client()
            .query("SELECT * FROM content_vote WHERE user_id = $user_id AND content_id INSIDE $ids")
            .query("SELECT * FROM content_unlock WHERE user_id = $user_id AND content_id INSIDE $ids")
            .bind(("user_id", user_id.to_string()))
            .bind(("ids", content_ids))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let vote_rows: Vec<VoteEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let unlock_rows: Vec<UnlockEntity> = response
            .take(1)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        votes.extend(vote_rows.into_iter().map(|v| (v.content_id, v.vote_type)));
        unlocked.extend(unlock_rows.into_iter().map(|u| u.content_id));
    }

    Ok(items
        .into_iter()
        .map(|content| {
            let submitter_username = content
                .submitted_by
                .as_ref()
                .and_then(|id| usernames.get(id).cloned());
            let user_vote = votes.get(&content.content_id).cloned();
            let is_unlocked = unlocked.contains(&content.content_id);
            HydratedContent {
                content,
                submitter_username,
                user_vote,
                is_unlocked,
            }
        })
        .collect())
}

/// Hydrate a single content row
pub(crate) async fn hydrate_one(
    datastore: &Datastore,
    content: ContentEntity,
    viewer: Option<&str>,
) -> StoreResult<HydratedContent> {
    let mut hydrated = hydrate_many(datastore, vec![content], viewer).await?;
    hydrated
        .pop()
        .ok_or_else(|| StoreError::Query("Hydration returned no rows".to_string()))
}
