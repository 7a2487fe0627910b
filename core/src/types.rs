//! Domain types for the todo API.
//!
//! # Design
//! Items are open JSON records: only `id` is required, every other field is
//! kept as-is. `Item` and `ItemUpdate` hold the id apart from the remaining
//! fields and convert through a flat JSON object on the wire, so an `id` key
//! can never appear twice. These types mirror the server's schema but are
//! defined independently; the integration tests catch drift.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ItemId = u64;

/// An insertion-ordered list of items.
pub type ItemList = Vec<Item>;

const ID_KEY: &str = "id";
const COMPLETED_KEY: &str = "completed";

/// Split a flat JSON object into its numeric `id` and the other fields.
fn split_id(mut fields: Map<String, Value>) -> Result<(ItemId, Map<String, Value>), String> {
    let id = fields
        .remove(ID_KEY)
        .ok_or_else(|| "missing field `id`".to_string())?;
    let id = id
        .as_u64()
        .ok_or_else(|| format!("`id` must be a non-negative integer, got {id}"))?;
    Ok((id, fields))
}

fn join_id(id: ItemId, fields: Map<String, Value>) -> Map<String, Value> {
    let mut object = Map::with_capacity(fields.len() + 1);
    object.insert(ID_KEY.to_string(), Value::from(id));
    object.extend(fields);
    object
}

/// JavaScript-style truthiness of a JSON value.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// JavaScript `===` over JSON values. Numbers compare by value, so `2` and
/// `2.0` are equal; everything else compares structurally.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            x.as_f64() == y.as_f64()
        }
        _ => a == b,
    }
}

/// A todo record: a numeric `id` plus free-form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Item {
    id: ItemId,
    fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Builder form of [`Item::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Look up a field other than `id`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Overwrite one field. Writing `id` only takes effect for a non-negative
    /// integer value; anything else is ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if key == ID_KEY {
            if let Some(id) = value.as_u64() {
                self.id = id;
            }
            return;
        }
        self.fields.insert(key, value);
    }

    /// Strict equality of one field against `expected`. A missing field never
    /// matches, not even `null`.
    pub fn field_equals(&self, key: &str, expected: &Value) -> bool {
        if key == ID_KEY {
            return strict_eq(&Value::from(self.id), expected);
        }
        self.fields
            .get(key)
            .is_some_and(|actual| strict_eq(actual, expected))
    }

    /// Whether the conventional `completed` flag is truthy.
    pub fn is_completed(&self) -> bool {
        self.fields.get(COMPLETED_KEY).is_some_and(truthy)
    }
}

impl TryFrom<Map<String, Value>> for Item {
    type Error = String;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let (id, fields) = split_id(object)?;
        Ok(Self { id, fields })
    }
}

impl From<Item> for Map<String, Value> {
    fn from(item: Item) -> Self {
        join_id(item.id, item.fields)
    }
}

/// A partial record used as a filter. Every key present must equal the item's
/// value for that key; the empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemQuery(Map<String, Value>);

impl ItemQuery {
    /// The query that matches every item.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: ItemId) -> Self {
        Self::all().with(ID_KEY, id)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.0
            .iter()
            .all(|(key, value)| item.field_equals(key, value))
    }
}

/// A partial record naming the item to patch by `id` and the fields to
/// overwrite on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ItemUpdate {
    id: ItemId,
    fields: Map<String, Value>,
}

impl ItemUpdate {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Add a field to overwrite. An `id` key is ignored; the target is fixed
    /// at construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != ID_KEY {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Overwrite every named field on `item`, leaving the rest alone.
    pub fn apply_to(&self, item: &mut Item) {
        for (key, value) in &self.fields {
            item.set(key.clone(), value.clone());
        }
    }
}

impl TryFrom<Map<String, Value>> for ItemUpdate {
    type Error = String;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let (id, fields) = split_id(object)?;
        Ok(Self { id, fields })
    }
}

impl From<ItemUpdate> for Map<String, Value> {
    fn from(update: ItemUpdate) -> Self {
        join_id(update.id, update.fields)
    }
}

/// Envelope returned by `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(rename = "todoList")]
    pub todo_list: ItemList,
}

/// Totals reported by `Store::count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(items: &[Item]) -> Self {
        let completed = items.iter().filter(|item| item.is_completed()).count();
        Self {
            total: items.len(),
            active: items.len() - completed,
            completed,
        }
    }
}
