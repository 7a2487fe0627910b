//! Store lifecycle tests against the live collection server.
//!
//! # Design
//! Starts `todo-server` on a random port with a seeded collection, then drives
//! a `Store` over real HTTP through `UreqTransport`. Validates that the core's
//! request building and response parsing agree with the actual server.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use todo_core::{
    ApiError, Counts, HttpMethod, HttpRequest, Item, ItemQuery, ItemUpdate, Store, StoreConfig,
    TodoClient, Transport, UreqTransport,
};
use todo_server::Collection;

/// Spawn the server on its own runtime thread and return its address.
fn start_server(collection: Collection) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, collection).await
        })
        .unwrap();
    });

    addr
}

fn seeded(items: serde_json::Value) -> Collection {
    Collection::from_items(serde_json::from_value(items).unwrap()).unwrap()
}

fn config(addr: SocketAddr) -> StoreConfig {
    StoreConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(10))
}

/// What the server currently holds, read through a fresh request.
fn remote_items(addr: SocketAddr) -> Vec<Item> {
    let client = TodoClient::new(&format!("http://{addr}"));
    let response = UreqTransport::default()
        .execute(client.build_list_items())
        .unwrap();
    client.parse_list_items(response).unwrap()
}

fn counts(total: usize, active: usize, completed: usize) -> Counts {
    Counts {
        total,
        active,
        completed,
    }
}

#[test]
fn ready_store_counts_seeded_items() {
    let addr = start_server(seeded(json!([
        {"id": 1, "completed": false},
        {"id": 2, "completed": true}
    ])));

    let store = Store::connect(&config(addr)).unwrap();

    assert_eq!(store.count(), counts(2, 1, 1));
}

#[test]
fn store_lifecycle() {
    let collection = Collection::new();
    let addr = start_server(collection.clone());

    // Step 1: open against an empty server.
    let mut store = Store::connect(&config(addr)).unwrap();
    assert!(store.items().is_empty());

    // Step 2: insert three todos; the server sees each.
    let buy_milk = Item::new(1)
        .with("title", "Buy milk")
        .with("completed", false);
    store.insert(buy_milk.clone()).unwrap();
    store
        .insert(Item::new(2).with("title", "Walk dog").with("completed", true))
        .unwrap();
    store
        .insert(Item::new(3).with("title", "Feed cat").with("completed", false))
        .unwrap();
    assert_eq!(store.count(), counts(3, 2, 1));
    assert_eq!(remote_items(addr), store.items());

    // Step 3: update one field.
    store
        .update(&ItemUpdate::new(3).with("completed", true))
        .unwrap();
    let updated = store.find(&ItemQuery::by_id(3));
    assert_eq!(updated[0].field("completed"), Some(&json!(true)));
    assert_eq!(remote_items(addr), store.items());

    // Step 4: remove the completed ones.
    let retained = store
        .remove(&ItemQuery::all().with("completed", true))
        .unwrap();
    assert_eq!(retained, vec![buy_milk]);
    assert_eq!(remote_items(addr), retained);

    // Step 5: a second store sees the same state.
    let other = Store::connect(&config(addr)).unwrap();
    assert_eq!(other.items(), store.items());
}

#[test]
fn duplicate_insert_is_reported_but_cached() {
    let addr = start_server(seeded(json!([{"id": 1, "title": "first"}])));
    let mut store = Store::connect(&config(addr)).unwrap();

    let err = store
        .insert(Item::new(1).with("title", "second"))
        .unwrap_err();

    assert!(matches!(err, ApiError::HttpError { status: 409, .. }));
    assert_eq!(store.find(&ItemQuery::by_id(1)).len(), 2);
    assert_eq!(remote_items(addr).len(), 1);
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let addr = start_server(Collection::new());
    let mut store = Store::connect(&config(addr)).unwrap();

    let err = store
        .update(&ItemUpdate::new(7).with("completed", true))
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound));
    assert!(store.items().is_empty());
}

#[test]
fn cache_diverges_when_another_writer_deletes() {
    let collection = seeded(json!([{"id": 1}, {"id": 2}]));
    let addr = start_server(collection.clone());
    let mut store = Store::connect(&config(addr)).unwrap();

    // Remove item 2 behind the store's back.
    let client = TodoClient::new(&format!("http://{addr}"));
    let response = UreqTransport::default()
        .execute(client.build_delete_item(2))
        .unwrap();
    client.parse_delete_item(response).unwrap();

    assert_eq!(store.items().len(), 2);
    let err = store.remove(&ItemQuery::by_id(2)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert_eq!(store.items(), &[Item::new(1)]);
}

#[test]
fn transport_sends_request_headers() {
    let addr = start_server(Collection::new());
    let client = TodoClient::new(&format!("http://{addr}"));
    let transport = UreqTransport::default();

    // Without a content type the server refuses the JSON body.
    let bare = HttpRequest {
        method: HttpMethod::Post,
        path: format!("http://{addr}/todo"),
        headers: Vec::new(),
        body: Some(r#"{"id":1}"#.to_string()),
    };
    let response = transport.execute(bare).unwrap();
    assert_eq!(response.status, 415);

    let request = client.build_create_item(&Item::new(1)).unwrap();
    let response = transport.execute(request).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(remote_items(addr), vec![Item::new(1)]);
}

#[test]
fn connect_to_closed_port_is_a_network_failure() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = Store::connect(&config(addr)).unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}
