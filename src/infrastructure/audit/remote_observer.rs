//! HTTP audit collector.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_observer::{AuditError, AuditObserver};

/// Default request timeout.
///
/// Delivery is sequential and a full observer queue holds back the dispatch
/// loop, so while a collector hangs, `publish` (and with it shortening) is
/// throttled to one event per timeout. Keep it short.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(2);

/// POSTs every event as a JSON body to a collector URL.
///
/// Any 2xx answer counts as delivered. The event is not retried.
pub struct RemoteAuditObserver {
    url: String,
    client: reqwest::Client,
}

impl RemoteAuditObserver {
    /// Creates an observer with [`REMOTE_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, REMOTE_TIMEOUT)
    }

    /// Creates an observer whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AuditObserver for RemoteAuditObserver {
    fn name(&self) -> &str {
        "remote"
    }

    async fn notify(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuditError::Transport(format!("request to {} timed out", self.url))
                } else {
                    AuditError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        Err(AuditError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    async fn spawn_collector(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let app = Router::new().route(
            "/audit",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().await.push(body);
                    (status, "collector says no")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/audit"), received)
    }

    #[tokio::test]
    async fn test_posts_event_as_json() {
        let (url, received) = spawn_collector(StatusCode::OK).await;
        let observer = RemoteAuditObserver::new(url).unwrap();

        observer
            .notify(&AuditEvent::at(9, "shorten", 12, "https://a.com"))
            .await
            .unwrap();

        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["ts"], 9);
        assert_eq!(received[0]["action"], "shorten");
        assert_eq!(received[0]["user_id"], "12");
        assert_eq!(received[0]["url"], "https://a.com");
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let (url, _received) = spawn_collector(StatusCode::INTERNAL_SERVER_ERROR).await;
        let observer = RemoteAuditObserver::new(url).unwrap();

        let result = observer
            .notify(&AuditEvent::at(1, "shorten", 1, "https://a.com"))
            .await;

        match result {
            Err(AuditError::Rejected { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "collector says no");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let observer = RemoteAuditObserver::with_timeout(
            format!("http://{addr}/audit"),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = observer
            .notify(&AuditEvent::at(1, "shorten", 1, "https://a.com"))
            .await;

        assert!(matches!(result, Err(AuditError::Transport(_))));
    }

    #[tokio::test]
    async fn test_hanging_collector_times_out() {
        let app = Router::new().route(
            "/audit",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                StatusCode::OK
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let observer = RemoteAuditObserver::with_timeout(
            format!("http://{addr}/audit"),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            observer.notify(&AuditEvent::at(1, "shorten", 1, "https://a.com")),
        )
        .await
        .expect("client timeout was not applied");

        match result {
            Err(AuditError::Transport(message)) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
