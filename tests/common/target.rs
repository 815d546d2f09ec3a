//! Local HTTP server the fetch jobs point at
//!
//! Keeps the tests off the network: every job in the suite fetches from here
//! (or from an address that refuses connections).

use super::constants::*;
use axum::{http::StatusCode, routing::get, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TargetServer {
    /// Base URL, e.g. "http://127.0.0.1:12345"
    pub base_url: String,

    /// Number of requests served so far, across all routes
    hits: Arc<AtomicUsize>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TargetServer {
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = |body: &'static str, hits: Arc<AtomicUsize>| {
            move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                body
            }
        };

        let error_hits = hits.clone();
        let app = Router::new()
            .route("/ok", get(counter(OK_BODY, hits.clone())))
            .route("/a", get(counter(A_BODY, hits.clone())))
            .route("/b", get(counter(B_BODY, hits.clone())))
            .route(
                "/error",
                get(move || async move {
                    error_hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY)
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind target server");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Target server failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Full URL of one of the target's routes
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[allow(dead_code)]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for TargetServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
