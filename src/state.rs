//! Shared application state injected into every handler.

use std::sync::Arc;

use sqlx::types::ipnetwork::IpNetwork;

use crate::application::services::LinkService;
use crate::application::{AuditPublisher, DeletionAggregator};
use crate::domain::repositories::LinkRepository;

/// Application state shared across all HTTP handlers.
///
/// Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub deletions: Arc<DeletionAggregator>,
    pub audit: Arc<AuditPublisher>,
    /// Clients allowed on internal endpoints; `None` admits nobody.
    pub trusted_subnet: Option<IpNetwork>,
}

impl AppState {
    /// Wires the link service to the given storage and pipelines.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        deletions: Arc<DeletionAggregator>,
        audit: Arc<AuditPublisher>,
        base_url: String,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            deletions.clone(),
            audit.clone(),
            base_url,
        ));

        Self {
            link_service,
            link_repository,
            deletions,
            audit,
            trusted_subnet: None,
        }
    }

    /// Opens internal endpoints to clients in `subnet`.
    pub fn with_trusted_subnet(mut self, subnet: Option<IpNetwork>) -> Self {
        self.trusted_subnet = subnet;
        self
    }
}
