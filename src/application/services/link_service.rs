//! Link creation, lookup and deletion service.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::application::audit_publisher::AuditPublisher;
use crate::application::deletion_aggregator::DeletionAggregator;
use crate::domain::audit_event::AuditEvent;
use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_code;
use crate::utils::url_normalizer::normalize_url;

/// Largest batch accepted by [`LinkService::shorten_batch`].
pub const MAX_BATCH_LEN: usize = 1000;

/// Outcome of [`LinkService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new code was issued.
    Created(Link),
    /// The URL had already been shortened; the existing link is returned.
    Existing(Link),
}

impl Shortened {
    pub fn link(&self) -> &Link {
        match self {
            Shortened::Created(link) | Shortened::Existing(link) => link,
        }
    }
}

/// Service for creating, resolving and deleting shortened links.
///
/// Deletions are not applied inline: they are handed to the
/// [`DeletionAggregator`] and reach storage in batches. Every shortening
/// request is recorded on the [`AuditPublisher`].
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    deletions: Arc<DeletionAggregator>,
    audit: Arc<AuditPublisher>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is prefixed verbatim to codes, so it should end with `/`.
    pub fn new(
        link_repository: Arc<L>,
        deletions: Arc<DeletionAggregator>,
        audit: Arc<AuditPublisher>,
        base_url: String,
    ) -> Self {
        Self {
            link_repository,
            deletions,
            audit,
            base_url,
        }
    }

    /// Shortens `long_url` on behalf of `owner_id`.
    ///
    /// # Deduplication
    ///
    /// If the normalized URL has a live link, it is returned as
    /// [`Shortened::Existing`] instead of issuing a new code. A deleted link
    /// does not count: the URL gets a fresh code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not a valid HTTP(S) URL.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, owner_id: i64, long_url: &str) -> Result<Shortened, AppError> {
        let normalized_url = normalize_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        self.record(AuditEvent::shorten(owner_id, long_url)).await;

        if let Some(existing) = self.find_live(&normalized_url).await? {
            return Ok(Shortened::Existing(existing));
        }

        let code = self.generate_unique_code().await?;
        let new_link = NewLink {
            code,
            long_url: normalized_url.clone(),
            owner_id,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => Ok(Shortened::Created(link)),
            // Lost a race against a concurrent request for the same URL.
            Err(AppError::Conflict { .. }) => self
                .find_live(&normalized_url)
                .await?
                .map(Shortened::Existing)
                .ok_or_else(|| {
                    AppError::internal(
                        "Failed to create short link",
                        json!({ "reason": "Conflicting insert vanished" }),
                    )
                }),
            Err(e) => Err(e),
        }
    }

    /// Shortens every URL of a batch on behalf of `owner_id`.
    ///
    /// The whole batch is validated before anything is stored. Outcomes are
    /// returned in input order; URLs already shortened yield
    /// [`Shortened::Existing`], like [`Self::shorten`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty or oversized batch, or
    /// when any URL is invalid (details carry its index).
    /// Returns [`AppError::Internal`] on storage errors; links created before
    /// the failure are kept.
    pub async fn shorten_batch(
        &self,
        owner_id: i64,
        long_urls: &[String],
    ) -> Result<Vec<Shortened>, AppError> {
        if long_urls.is_empty() {
            return Err(AppError::bad_request("Batch is empty", json!({})));
        }
        if long_urls.len() > MAX_BATCH_LEN {
            return Err(AppError::bad_request(
                "Batch is too large",
                json!({ "max": MAX_BATCH_LEN, "actual": long_urls.len() }),
            ));
        }

        for (index, long_url) in long_urls.iter().enumerate() {
            normalize_url(long_url).map_err(|e| {
                AppError::bad_request(
                    "Invalid URL format",
                    json!({ "index": index, "reason": e.to_string() }),
                )
            })?;
        }

        let mut outcomes = Vec::with_capacity(long_urls.len());
        for long_url in long_urls {
            outcomes.push(self.shorten(owner_id, long_url).await?);
        }

        Ok(outcomes)
    }

    /// Resolves a short code to its link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes and [`AppError::Gone`]
    /// for deleted links.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        if link.is_deleted() {
            return Err(AppError::gone(
                "Short link has been deleted",
                json!({ "code": code }),
            ));
        }

        Ok(link)
    }

    /// Lists the owner's live links.
    pub async fn list_user_links(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Schedules deletion of the owner's `codes`.
    ///
    /// Returns as soon as the request is queued; codes not owned by
    /// `owner_id` are left untouched when the batch reaches storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the deletion pipeline has stopped.
    pub async fn delete_user_links(&self, owner_id: i64, codes: Vec<String>) -> Result<(), AppError> {
        self.deletions.add_task(owner_id, codes).await?;
        Ok(())
    }

    /// Counts live links and distinct users.
    pub async fn stats(&self) -> Result<LinkStats, AppError> {
        self.link_repository.stats().await
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}{}", self.base_url, code)
    }

    async fn find_live(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .link_repository
            .find_by_long_url(long_url)
            .await?
            .filter(|link| !link.is_deleted()))
    }

    async fn record(&self, event: AuditEvent) {
        if let Err(e) = self.audit.publish(event).await {
            warn!(error = %e, "Audit event dropped");
        }
    }

    /// Generates a unique short code with collision retry.
    ///
    /// Attempts up to 10 times before failing.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let code = generate_code().map_err(|e| {
                AppError::internal("Failed to generate code", json!({ "reason": e.to_string() }))
            })?;

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}
