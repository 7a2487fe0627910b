//! Client core for the todo collection service.
//!
//! # Overview
//! `Store` keeps a local copy of the remote todo list, answers queries from
//! it, and mirrors every insert, update, and remove to the server. Requests
//! are built and parsed by `TodoClient` as plain data (host-does-IO); a
//! `Transport` performs the round-trip.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - Each REST operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Store mutations report remote failures through `Result` but never roll
//!   back the cache.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::StoreConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::Store;
pub use transport::{Transport, UreqTransport};
pub use types::{Counts, Item, ItemId, ItemList, ItemQuery, ItemUpdate, TodoList};
