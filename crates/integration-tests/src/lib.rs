//! Integration test harness for Toko.
//!
//! [`TestApp`] runs the full router (middleware included) in-process against
//! the in-memory stores and a cheap Argon2 cost, so the HTTP contract can be
//! exercised without a database or a listening socket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toko-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use argon2::Params;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use toko_api::build_router;
use toko_api::db::{MemoryProductStore, MemoryUserStore};
use toko_api::services::auth::{Argon2Hasher, RandomTokenIssuer};
use toko_api::state::AppState;

/// An in-process application with inspectable storage.
pub struct TestApp {
    router: Router,
    pub users: Arc<MemoryUserStore>,
    pub products: Arc<MemoryProductStore>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

impl TestApp {
    /// Build a fresh application with empty stores.
    ///
    /// # Panics
    ///
    /// Panics if the router cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let products = Arc::new(MemoryProductStore::new());
        let hasher = Argon2Hasher::new(Params::new(1024, 1, 1, None).expect("valid argon2 params"));

        let state = AppState::new(
            users.clone(),
            products.clone(),
            Arc::new(hasher),
            Arc::new(RandomTokenIssuer),
        );
        let router = build_router(state, &[]).expect("router builds");

        Self {
            router,
            users,
            products,
        }
    }

    /// Send a request, with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send(request).await
    }

    /// Send a request with a raw body and content type.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &'static str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("valid request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
