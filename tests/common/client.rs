//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per management endpoint.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn fetcher_url(&self) -> String {
        format!("{}/api/fetcher", self.base_url)
    }

    /// POST /api/fetcher without an id
    pub async fn put_fetcher(&self, url: &str, interval: u64) -> Response {
        self.post_fetcher_json(&json!({ "url": url, "interval": interval }))
            .await
    }

    /// POST /api/fetcher with an explicit id
    pub async fn put_fetcher_with_id(&self, id: i64, url: &str, interval: u64) -> Response {
        self.post_fetcher_json(&json!({ "id": id, "url": url, "interval": interval }))
            .await
    }

    /// POST /api/fetcher with an arbitrary JSON body
    pub async fn post_fetcher_json(&self, body: &Value) -> Response {
        self.client
            .post(self.fetcher_url())
            .json(body)
            .send()
            .await
            .expect("Put fetcher request failed")
    }

    /// POST /api/fetcher with a raw body
    #[allow(dead_code)]
    pub async fn post_fetcher_raw(&self, body: impl Into<reqwest::Body>) -> Response {
        self.client
            .post(self.fetcher_url())
            .body(body)
            .send()
            .await
            .expect("Put fetcher request failed")
    }

    /// POST /api/fetcher and return the assigned id, asserting success
    pub async fn put_fetcher_id(&self, url: &str, interval: u64) -> i64 {
        let response = self.put_fetcher(url, interval).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Invalid put response");
        body["id"].as_i64().expect("Missing id in put response")
    }

    /// DELETE /api/fetcher/{id}
    pub async fn delete_fetcher(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .delete(format!("{}/{}", self.fetcher_url(), id))
            .send()
            .await
            .expect("Delete fetcher request failed")
    }

    /// GET /api/fetcher
    pub async fn list_fetchers(&self) -> Response {
        self.client
            .get(self.fetcher_url())
            .send()
            .await
            .expect("List fetchers request failed")
    }

    /// GET /api/fetcher/{id}/history
    pub async fn get_history(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/{}/history", self.fetcher_url(), id))
            .send()
            .await
            .expect("History request failed")
    }

    /// GET /api/fetcher/{id}/history, decoded, asserting success
    pub async fn history_records(&self, id: i64) -> Vec<Value> {
        let response = self.get_history(id).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Invalid history response")
    }
}
