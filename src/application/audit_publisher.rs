//! Fan-out of audit events to independently paced observers.
//!
//! ```text
//! publish ──► central queue ──► dispatch loop ──┬─► observer queue ──► delivery loop ──► observer.notify
//!                                               └─► observer queue ──► delivery loop ──► observer.notify
//! ```
//!
//! The dispatch loop never calls an observer itself; it only copies each event
//! into every observer's private queue. Each observer is driven by its own
//! loop, so ordering holds per observer and a failing observer only affects
//! itself.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::lifecycle::Lifecycle;
use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_observer::AuditObserver;
use crate::error::PipelineError;

/// Queue sizes for the audit pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Capacity of the central queue fed by [`AuditPublisher::publish`].
    pub queue_capacity: usize,
    /// Capacity of each observer's private queue.
    pub observer_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            observer_capacity: 10,
        }
    }
}

/// Messages carried by the central queue.
///
/// Registrations share the queue with events, so an observer sees exactly the
/// events published after its registration was accepted.
enum Dispatch {
    Event(AuditEvent),
    Register {
        name: String,
        queue: mpsc::Sender<AuditEvent>,
    },
}

struct ObserverQueue {
    name: String,
    queue: mpsc::Sender<AuditEvent>,
}

/// Publishes audit events to every registered [`AuditObserver`].
///
/// Shared between producers behind an `Arc`. Must be started inside a Tokio
/// runtime.
pub struct AuditPublisher {
    queue: mpsc::Sender<Dispatch>,
    observer_capacity: usize,
    lifecycle: Lifecycle,
}

impl AuditPublisher {
    /// Spawns the dispatch loop.
    pub fn start(config: AuditConfig) -> Self {
        let (queue, queue_rx) = mpsc::channel(config.queue_capacity.max(1));
        let lifecycle = Lifecycle::new();

        lifecycle.spawn(dispatch(queue_rx, lifecycle.token()));
        info!(
            queue_capacity = config.queue_capacity,
            observer_capacity = config.observer_capacity,
            "Audit publisher started"
        );

        Self {
            queue,
            observer_capacity: config.observer_capacity.max(1),
            lifecycle,
        }
    }

    /// Attaches an observer with its own queue and delivery loop.
    ///
    /// There is no replay: the observer receives events published after this
    /// call returns.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PublisherStopped`] once [`Self::stop`] has been called.
    pub async fn register(&self, observer: Arc<dyn AuditObserver>) -> Result<(), PipelineError> {
        if self.lifecycle.is_stopped() {
            return Err(PipelineError::PublisherStopped);
        }

        let name = observer.name().to_string();
        let (queue, events) = mpsc::channel(self.observer_capacity);

        self.queue
            .send(Dispatch::Register {
                name: name.clone(),
                queue,
            })
            .await
            .map_err(|_| PipelineError::PublisherStopped)?;

        self.lifecycle.spawn(deliver(observer, events));
        info!(observer = %name, "Audit observer registered");

        Ok(())
    }

    /// Queues an event for every registered observer.
    ///
    /// Waits only while the central queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PublisherStopped`] once [`Self::stop`] has been called.
    pub async fn publish(&self, event: AuditEvent) -> Result<(), PipelineError> {
        if self.lifecycle.is_stopped() {
            return Err(PipelineError::PublisherStopped);
        }

        self.queue
            .send(Dispatch::Event(event))
            .await
            .map_err(|_| PipelineError::PublisherStopped)
    }

    pub fn is_stopped(&self) -> bool {
        self.lifecycle.is_stopped()
    }

    /// Free slots in the central queue.
    pub fn available_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Closes the central queue and waits until every observer has processed
    /// its backlog.
    ///
    /// Every event accepted by [`Self::publish`] before this call is offered to
    /// each observer registered before it. Later calls return immediately.
    pub async fn stop(&self) {
        let initiated = self.lifecycle.signal();
        if initiated {
            info!("Stopping audit publisher");
        }

        self.lifecycle.wait().await;

        if initiated {
            info!("Audit publisher stopped");
        }
    }
}

async fn dispatch(mut queue: mpsc::Receiver<Dispatch>, shutdown: CancellationToken) {
    let mut observers: Vec<ObserverQueue> = Vec::new();

    loop {
        let message = tokio::select! {
            _ = shutdown.cancelled() => break,
            message = queue.recv() => message,
        };

        match message {
            Some(message) => route(message, &mut observers).await,
            None => break,
        }
    }

    queue.close();
    while let Some(message) = queue.recv().await {
        route(message, &mut observers).await;
    }

    debug!(observers = observers.len(), "Audit dispatch loop stopped");
    // Dropping the observer senders ends each delivery loop after its backlog.
}

async fn route(message: Dispatch, observers: &mut Vec<ObserverQueue>) {
    match message {
        Dispatch::Register { name, queue } => observers.push(ObserverQueue { name, queue }),
        Dispatch::Event(event) => {
            let mut i = 0;
            while i < observers.len() {
                if observers[i].queue.send(event.clone()).await.is_err() {
                    let gone = observers.remove(i);
                    warn!(observer = %gone.name, "Audit observer loop exited, observer removed");
                } else {
                    i += 1;
                }
            }
        }
    }
}

async fn deliver(observer: Arc<dyn AuditObserver>, mut events: mpsc::Receiver<AuditEvent>) {
    debug!(observer = observer.name(), "Audit delivery loop started");

    while let Some(event) = events.recv().await {
        if let Err(e) = observer.notify(&event).await {
            warn!(
                observer = observer.name(),
                action = %event.action,
                owner_id = event.owner_id,
                error = %e,
                "Audit delivery failed"
            );
        }
    }

    debug!(observer = observer.name(), "Audit delivery loop stopped");
}
