//! Storage failures surface as 500s with a generic message.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use shelf_app::modules::books::{
    self,
    models::{Book, BookInput},
    store::{BookStore, StoreError},
};
use shelf_kernel::ModuleRegistry;

use common::{body_json, send, test_settings};

/// A store whose backend is always unreachable.
struct UnreachableStore;

fn unreachable() -> StoreError {
    StoreError::Storage(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl BookStore for UnreachableStore {
    async fn create(&self, _input: &BookInput) -> Result<Book, StoreError> {
        Err(unreachable())
    }

    async fn read(&self, _id: &str) -> Result<Book, StoreError> {
        Err(unreachable())
    }

    async fn update(&self, _id: &str, _input: &BookInput) -> Result<Book, StoreError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(unreachable())
    }

    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Err(unreachable())
    }
}

fn failing_app() -> axum::Router {
    let mut registry = ModuleRegistry::new();
    registry
        .register(books::create_module(Arc::new(UnreachableStore)))
        .unwrap();
    shelf_http::build_router(&registry, &test_settings())
}

#[tokio::test]
async fn every_operation_maps_storage_errors_to_500() {
    let app = failing_app();
    let valid = json!({"title": "Dune", "author": "Herbert"});

    let cases = [
        (Method::GET, "/api/books", None, "Failed to fetch books"),
        (Method::POST, "/api/books", Some(valid.clone()), "Failed to create book"),
        (Method::GET, "/api/books/abc", None, "Failed to fetch book"),
        (Method::PUT, "/api/books/abc", Some(valid.clone()), "Failed to update book"),
        (Method::DELETE, "/api/books/abc", None, "Failed to delete book"),
    ];

    for (method, uri, body, message) in cases {
        let response = send(&app, method.clone(), uri, body).await;
        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{method} {uri}"
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], message);
        assert_eq!(body["code"], "internal_error");
        assert!(!body.to_string().contains("pool"), "{method} {uri} leaked details");
    }
}

#[tokio::test]
async fn validation_runs_before_the_store_is_touched() {
    let app = failing_app();

    let response = send(&app, Method::POST, "/api/books", Some(json!({"title": "Dune"}))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "author");
}
