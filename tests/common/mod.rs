#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use flight_booking::db::{Database, DbError, Query};
use flight_booking::rate_limit::{RateLimitConfig, RateLimiter};
use flight_booking::routes::app;
use flight_booking::state::AppState;

/// In-process stand-in for the hosted database.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
}

fn primary_key(table: &str) -> (&'static str, bool) {
    match table {
        "flights" => ("flight_id", true),
        "bookings" => ("booking_id", false),
        _ => ("id", true),
    }
}

fn cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, field: &str, value: &str) -> bool {
    row.get(field).map(cell).as_deref() == Some(value)
}

impl MemoryDatabase {
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn query(&self, table: &str, query: &Query) -> Result<Vec<Value>, DbError> {
        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|row| query.filters.iter().all(|(f, v)| matches(row, f, v)))
            .collect();

        if let Some((column, ascending)) = &query.order_by {
            rows.sort_by_key(|row| row.get(column).map(cell).unwrap_or_default());
            if !ascending {
                rows.reverse();
            }
        }

        // same as the PostgREST client: offset rides on a limit
        let (offset, limit) = match query.limit {
            Some(limit) => (query.offset.unwrap_or(0), limit),
            None => (0, usize::MAX),
        };
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Value, DbError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (key, numeric) = primary_key(table);
        let key_value = if numeric {
            Value::from(id)
        } else {
            Value::from(format!("bk-{id}"))
        };
        if let Some(obj) = row.as_object_mut() {
            obj.insert(key.to_string(), key_value);
        }

        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
        patch: Value,
    ) -> Result<Option<Value>, DbError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(None);
        };

        let mut updated = None;
        for row in rows.iter_mut().filter(|r| matches(r, field, value)) {
            if let (Some(obj), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                for (k, v) in changes {
                    obj.insert(k.clone(), v.clone());
                }
            }
            updated.get_or_insert_with(|| row.clone());
        }
        Ok(updated)
    }

    async fn delete_by_field(&self, table: &str, field: &str, value: &str) -> Result<(), DbError> {
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|r| !matches(r, field, value));
        }
        Ok(())
    }

    async fn ping(&self) -> bool {
        true
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub db: Arc<MemoryDatabase>,
}

pub fn test_app(config: RateLimitConfig, trust_proxy: bool) -> TestApp {
    let db = Arc::new(MemoryDatabase::default());
    let limiter = Arc::new(RateLimiter::new(config));
    let state = Arc::new(AppState::new(db.clone(), limiter, trust_proxy));
    TestApp {
        router: app(state.clone()),
        state,
        db,
    }
}

/// Generous limits so CRUD tests never trip the limiter.
pub fn unlimited_app() -> TestApp {
    test_app(
        RateLimitConfig {
            max_requests: 10_000,
            ..RateLimitConfig::default()
        },
        false,
    )
}

pub fn request(method: &str, uri: &str, ip: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
