//! Process-local link storage used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    by_code: HashMap<String, Link>,
    /// Live links only.
    code_by_url: HashMap<String, String>,
}

/// In-memory [`LinkRepository`].
///
/// Contents are lost on restart. Enforces the same uniqueness rules as the
/// `links` table: one link per code and one live link per long URL.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.tables.write().await;

        if tables.by_code.contains_key(&new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_code_key" }),
            ));
        }
        if tables.code_by_url.contains_key(&new_link.long_url) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_long_url_key" }),
            ));
        }

        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            new_link.code,
            new_link.long_url,
            new_link.owner_id,
            Utc::now(),
            false,
        );

        tables
            .code_by_url
            .insert(link.long_url.clone(), link.code.clone());
        tables.by_code.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.tables.read().await.by_code.get(code).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read().await;

        Ok(tables
            .code_by_url
            .get(long_url)
            .and_then(|code| tables.by_code.get(code))
            .filter(|link| !link.is_deleted())
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let tables = self.tables.read().await;

        let mut links: Vec<Link> = tables
            .by_code
            .values()
            .filter(|link| link.is_owned_by(owner_id) && !link.is_deleted())
            .cloned()
            .collect();
        links.sort_by_key(|link| link.id);

        Ok(links)
    }

    async fn delete_batch(&self, owner_id: i64, codes: Vec<String>) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;

        for code in &codes {
            let Some(link) = tables.by_code.get_mut(code) else {
                continue;
            };
            if !link.is_owned_by(owner_id) || link.is_deleted() {
                continue;
            }

            link.deleted = true;
            let long_url = link.long_url.clone();
            if tables.code_by_url.get(&long_url) == Some(code) {
                tables.code_by_url.remove(&long_url);
            }
        }

        Ok(())
    }

    async fn stats(&self) -> Result<LinkStats, AppError> {
        let tables = self.tables.read().await;

        let owners: HashSet<i64> = tables.by_code.values().map(|link| link.owner_id).collect();

        Ok(LinkStats {
            urls: tables.code_by_url.len() as i64,
            users: owners.len() as i64,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
