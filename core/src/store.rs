//! Local cache of the remote todo collection.
//!
//! # Design
//! `Store` owns an `ItemList` seeded once from `GET /todos` when it is opened.
//! Reads are answered from the cache alone. Each mutation changes the cache
//! first and then issues the matching REST call through the transport; a
//! failed call is returned to the caller but the cache is not rolled back, so
//! the two sides may drift. There is no re-sync after opening.
//!
//! Mutations take `&mut self`, so a cache change and its network call always
//! run back to back with nothing interleaved.

use std::fmt;

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::StoreConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Counts, Item, ItemList, ItemQuery, ItemUpdate};

pub struct Store<T> {
    client: TodoClient,
    transport: T,
    items: ItemList,
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("client", &self.client)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl Store<UreqTransport> {
    /// Open a store over HTTP using `config`.
    pub fn connect(config: &StoreConfig) -> Result<Self, ApiError> {
        let client = TodoClient::new(&config.api_url);
        Self::open(client, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> Store<T> {
    /// Fetch the full remote list and seed the cache with it. Returns once
    /// that initial sync has completed.
    pub fn open(client: TodoClient, transport: T) -> Result<Self, ApiError> {
        let mut store = Self {
            client,
            transport,
            items: Vec::new(),
        };
        let request = store.client.build_list_items();
        store.items = store.send(request, TodoClient::parse_list_items)?;
        debug!(
            count = store.items.len(),
            url = store.client.base_url(),
            "store synced"
        );
        Ok(store)
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// The cached items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items whose fields equal every key of `query`. Local only, so the
    /// result can be stale relative to the server.
    pub fn find(&self, query: &ItemQuery) -> ItemList {
        self.items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect()
    }

    /// Append `item` to the cache, then create it remotely. No duplicate-id
    /// check is made locally.
    pub fn insert(&mut self, item: Item) -> Result<(), ApiError> {
        let request = self.client.build_create_item(&item)?;
        self.items.push(item);
        self.send(request, TodoClient::parse_create_item)
    }

    /// Patch the last cached item carrying `update.id()`, then patch it
    /// remotely. The remote call is made even when nothing was cached under
    /// that id.
    pub fn update(&mut self, update: &ItemUpdate) -> Result<(), ApiError> {
        match self.items.iter_mut().rev().find(|item| item.id() == update.id()) {
            Some(item) => update.apply_to(item),
            None => debug!(id = update.id(), "update target not cached"),
        }
        let request = self.client.build_update_item(update)?;
        self.send(request, TodoClient::parse_update_item)
    }

    /// Drop every cached item matching `query` and delete each one remotely.
    ///
    /// All deletes are attempted. On success the retained list is returned;
    /// otherwise the first failure is, with the cache already filtered.
    pub fn remove(&mut self, query: &ItemQuery) -> Result<ItemList, ApiError> {
        let (removed, retained): (ItemList, ItemList) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| query.matches(item));
        self.items = retained;

        let mut first_error = None;
        for item in &removed {
            let request = self.client.build_delete_item(item.id());
            if let Err(e) = self.send(request, TodoClient::parse_delete_item) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(self.items.clone()),
        }
    }

    /// Total, active, and completed tallies over the whole cache.
    pub fn count(&self) -> Counts {
        Counts::of(&self.items)
    }

    fn send<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let method = request.method.as_str();
        let path = request.path.clone();
        debug!(method, path = %path, "sending");

        self.transport
            .execute(request)
            .and_then(|response| parse(&self.client, response))
            .inspect_err(|e| {
                warn!(method, path = %path, "remote call failed, cache may diverge: {e}")
            })
    }
}
