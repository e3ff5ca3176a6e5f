mod supabase;

pub use supabase::SupabaseClient;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("request to database failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("database returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no row returned from {0}")]
    EmptyResult(String),

    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Select options for [`Database::query`]. Filters are equality matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order_by: Option<(String, bool)>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some((column.into(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Row-level access to the hosted database. Rows travel as JSON objects.
#[async_trait]
pub trait Database: Send + Sync {
    async fn query(&self, table: &str, query: &Query) -> Result<Vec<Value>, DbError>;

    async fn insert(&self, table: &str, row: Value) -> Result<Value, DbError>;

    /// Returns the updated row, or `None` when nothing matched.
    async fn update_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
        patch: Value,
    ) -> Result<Option<Value>, DbError>;

    async fn delete_by_field(&self, table: &str, field: &str, value: &str) -> Result<(), DbError>;

    async fn ping(&self) -> bool;
}

pub fn decode<T: DeserializeOwned>(row: Value) -> Result<T, DbError> {
    Ok(serde_json::from_value(row)?)
}

pub fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, DbError> {
    rows.into_iter().map(decode).collect()
}

pub fn encode<T: Serialize>(row: &T) -> Result<Value, DbError> {
    Ok(serde_json::to_value(row)?)
}
