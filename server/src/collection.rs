//! In-memory backing list for the todo collection.
//!
//! # Design
//! `Collection` is a cloneable handle around one shared `Vec<Item>` guarded by
//! a tokio `RwLock`. The router receives it as state, so every handler works
//! on the same list and writers are serialized by the lock. Insertion order is
//! preserved; lookups are linear scans.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

pub type ItemId = u64;

/// A stored todo: a required numeric `id` plus any other JSON fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("no todo with id {0}")]
    NotFound(ItemId),

    #[error("a todo with id {0} already exists")]
    DuplicateId(ItemId),
}

impl IntoResponse for CollectionError {
    fn into_response(self) -> Response {
        let status = match self {
            CollectionError::NotFound(_) => StatusCode::NOT_FOUND,
            CollectionError::DuplicateId(_) => StatusCode::CONFLICT,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Collection {
    items: Arc<RwLock<Vec<Item>>>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection preloaded with `items`, rejecting repeated ids.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CollectionError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CollectionError::DuplicateId(item.id));
            }
        }
        Ok(Self {
            items: Arc::new(RwLock::new(items)),
        })
    }

    pub async fn list(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    pub async fn create(&self, item: Item) -> Result<(), CollectionError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(CollectionError::DuplicateId(item.id));
        }
        items.push(item);
        Ok(())
    }

    /// Overwrite each field of `patch` on the item with `id`. An `id` key in
    /// the patch is ignored so ids stay unique.
    pub async fn update(
        &self,
        id: ItemId,
        patch: Map<String, Value>,
    ) -> Result<(), CollectionError> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        for (key, value) in patch {
            if key != "id" {
                item.fields.insert(key, value);
            }
        }
        Ok(())
    }

    /// Remove the item with `id` and return what is left.
    pub async fn delete(&self, id: ItemId) -> Result<Vec<Item>, CollectionError> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        items.remove(index);
        Ok(items.clone())
    }
}
