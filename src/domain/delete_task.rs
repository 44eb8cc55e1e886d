//! Deletion request model for the batching pipeline.

/// A request to soft-delete some of one owner's codes.
///
/// Created by request handlers and handed to
/// [`crate::application::deletion_aggregator::DeletionAggregator::add_task`].
/// Tasks for the same owner are merged before they reach storage, so a task
/// never maps one-to-one onto a storage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTask {
    pub owner_id: i64,
    pub codes: Vec<String>,
}

impl DeleteTask {
    pub fn new(owner_id: i64, codes: Vec<String>) -> Self {
        Self { owner_id, codes }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
