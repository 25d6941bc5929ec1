//! Document-store abstraction and an in-memory implementation.
//!
//! Documents are JSON objects grouped into named collections. Writes may
//! contain [`server_timestamp()`] values, which the store replaces with its
//! own clock at write time.

use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Sentinel replaced by the store's clock on write.
pub const SERVER_TIMESTAMP: &str = "__server_timestamp__";

/// A value asking the store to stamp the field with its current time.
pub fn server_timestamp() -> Value {
    Value::String(SERVER_TIMESTAMP.to_string())
}

/// A stored document: its id and its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Deserialize the body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// A top-level string field.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}

/// Sort order for [`DocumentStore::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// A remote (or in-memory) document database.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Insert a document under a store-assigned id and return the id.
    async fn create(&self, collection: &str, data: Value) -> Result<String>;

    /// Insert or replace the document with the given id.
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Documents whose `field` equals `value`, optionally sorted.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>>;

    /// Every document in the collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Merge `partial` into an existing document.
    ///
    /// # Errors
    ///
    /// [`RecipeError::NotFound`] when the document does not exist.
    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<()>;
}

/// Thread-safe in-memory [`DocumentStore`].
///
/// Server timestamps come from a clock that never repeats, so ordering by a
/// timestamp field is total.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a `Store` error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecipeError::Store("writes are disabled".to_string()));
        }
        Ok(())
    }

    /// Strictly increasing timestamp.
    fn stamp(&self) -> Result<String> {
        let mut last = self
            .last_stamp
            .lock()
            .map_err(|_| RecipeError::Store("clock lock poisoned".to_string()))?;
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + chrono::Duration::microseconds(1);
            }
        }
        *last = Some(now);
        Ok(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn prepare(&self, data: Value) -> Result<Map<String, Value>> {
        let Value::Object(mut obj) = data else {
            return Err(RecipeError::Store(
                "document data must be a JSON object".to_string(),
            ));
        };
        let mut stamp: Option<String> = None;
        for value in obj.values_mut() {
            if value.as_str() == Some(SERVER_TIMESTAMP) {
                let ts = match &stamp {
                    Some(ts) => ts.clone(),
                    None => {
                        let ts = self.stamp()?;
                        stamp = Some(ts.clone());
                        ts
                    }
                };
                *value = Value::String(ts);
            }
        }
        Ok(obj)
    }

    fn poisoned() -> RecipeError {
        RecipeError::Store("store lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, data: Value) -> Result<String> {
        self.check_writable()?;
        let data = self.prepare(data)?;
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data: Value::Object(data),
            });
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        self.check_writable()?;
        let data = Value::Object(self.prepare(data)?);
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => doc.data = data,
            None => docs.push(Document {
                id: id.to_string(),
                data,
            }),
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>> {
        let mut matches: Vec<Document> = {
            let collections = self.collections.read().map_err(|_| Self::poisoned())?;
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|d| d.data.get(field) == Some(value))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(order) = order_by {
            matches.sort_by(|a, b| {
                let ord = compare_fields(a.data.get(&order.field), b.data.get(&order.field));
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        Ok(matches)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, partial: Value) -> Result<()> {
        self.check_writable()?;
        let partial = self.prepare(partial)?;
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| RecipeError::NotFound(format!("{}/{}", collection, id)))?;

        match &mut doc.data {
            Value::Object(existing) => existing.extend(partial),
            other => *other = Value::Object(partial),
        }
        Ok(())
    }
}

/// Missing fields sort first; numbers numerically; strings lexically.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Less,
        (Some(_), None) => CmpOrdering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(CmpOrdering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
