//! HTTP collection service for todo items.
//!
//! # Overview
//! Serves one in-memory list of todos over a small REST contract:
//!
//! ```text
//! GET    /            greeting
//! GET    /todos       {"todoList": [...]}
//! POST   /todo        append an item (caller supplies the id)
//! PATCH  /todo/{id}   merge fields into an item
//! DELETE /todo/{id}   remove an item, respond with what is left
//! ```
//!
//! # Design
//! The storage handle is built by the caller and passed to [`app`], so tests
//! and the binary each own their collection. Missing ids answer 404 and
//! duplicate ids on create answer 409. Cross-origin requests are always
//! allowed.

pub mod collection;

use std::future::Future;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use collection::{Collection, CollectionError, Item, ItemId};

pub const GREETING: &str = "Hello World!";

/// Body of `GET /todos`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(rename = "todoList")]
    pub todo_list: Vec<Item>,
}

pub fn app(collection: Collection) -> Router {
    Router::new()
        .route("/", get(greet))
        .route("/todos", get(list_todos))
        .route("/todo", post(create_todo))
        .route("/todo/{id}", patch(update_todo).delete(delete_todo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(collection)
}

pub async fn run(listener: TcpListener, collection: Collection) -> Result<(), std::io::Error> {
    run_until(listener, collection, std::future::pending()).await
}

/// Serve until `shutdown` resolves, letting in-flight requests finish.
pub async fn run_until<F>(
    listener: TcpListener,
    collection: Collection,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(collection))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on ctrl-c. If the handler cannot be installed the error is
/// logged and the future never resolves, so the server keeps running.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("ctrl-c handler unavailable: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn greet() -> &'static str {
    GREETING
}

async fn list_todos(State(collection): State<Collection>) -> Json<TodoList> {
    Json(TodoList {
        todo_list: collection.list().await,
    })
}

async fn create_todo(
    State(collection): State<Collection>,
    Json(item): Json<Item>,
) -> Result<StatusCode, CollectionError> {
    let id = item.id;
    collection
        .create(item)
        .await
        .inspect_err(|e| tracing::warn!("create rejected: {e}"))?;
    tracing::debug!(id, "todo created");
    Ok(StatusCode::OK)
}

async fn update_todo(
    State(collection): State<Collection>,
    Path(id): Path<ItemId>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<StatusCode, CollectionError> {
    collection
        .update(id, patch)
        .await
        .inspect_err(|e| tracing::warn!("update rejected: {e}"))?;
    tracing::debug!(id, "todo updated");
    Ok(StatusCode::OK)
}

async fn delete_todo(
    State(collection): State<Collection>,
    Path(id): Path<ItemId>,
) -> Result<Json<Vec<Item>>, CollectionError> {
    let remaining = collection
        .delete(id)
        .await
        .inspect_err(|e| tracing::warn!("delete rejected: {e}"))?;
    tracing::debug!(id, remaining = remaining.len(), "todo deleted");
    Ok(Json(remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_list_uses_camel_case_key() {
        let item = serde_json::from_value(json!({"id": 1, "completed": false})).unwrap();
        let body = TodoList {
            todo_list: vec![item],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!({"todoList": [{"id": 1, "completed": false}]}));
    }

    #[test]
    fn todo_list_parses_empty() {
        let body: TodoList = serde_json::from_str(r#"{"todoList":[]}"#).unwrap();
        assert!(body.todo_list.is_empty());
    }

    #[tokio::test]
    async fn run_until_returns_once_shutdown_resolves() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        run_until(listener, Collection::new(), async {})
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn shutdown_signal_stays_pending_without_ctrl_c() {
        let signal = shutdown_signal();
        tokio::pin!(signal);
        for _ in 0..16 {
            tokio::select! {
                biased;
                _ = &mut signal => panic!("shutdown resolved without a signal"),
                _ = tokio::task::yield_now() => {}
            }
        }
    }
}
