use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{Database, DbError, Query};

/// PostgREST client for the hosted Supabase database.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(client: reqwest::Client, url: &str, anon_key: impl Into<String>) -> Self {
        let base_url = format!("{}/rest/v1", url.trim_end_matches('/'));
        info!(%base_url, "Supabase client initialized");
        Self {
            client,
            base_url,
            anon_key: anon_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .timeout(Duration::from_secs(10))
    }

    async fn send(&self, table: &str, req: RequestBuilder) -> Result<Response, DbError> {
        let res = self.authed(req).send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        error!(table, status = status.as_u16(), %body, "Supabase request failed");
        Err(DbError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// PostgREST query-string parameters for a select.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{value}")));
    }

    if let Some((column, ascending)) = &query.order_by {
        let dir = if *ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{column}.{dir}")));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    // offset only applies alongside a limit
    if let (Some(offset), Some(_)) = (query.offset, query.limit) {
        params.push(("offset".to_string(), offset.to_string()));
    }

    params
}

fn eq_filter(field: &str, value: &str) -> [(String, String); 1] {
    [(field.to_string(), format!("eq.{value}"))]
}

#[async_trait]
impl Database for SupabaseClient {
    async fn query(&self, table: &str, query: &Query) -> Result<Vec<Value>, DbError> {
        debug!(table, ?query, "select");
        let req = self.client.get(self.table_url(table)).query(&query_params(query));
        let rows = self.send(table, req).await?.json::<Vec<Value>>().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, DbError> {
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let rows = self.send(table, req).await?.json::<Vec<Value>>().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DbError::EmptyResult(table.to_string()))
    }

    async fn update_by_field(
        &self,
        table: &str,
        field: &str,
        value: &str,
        patch: Value,
    ) -> Result<Option<Value>, DbError> {
        let req = self
            .client
            .patch(self.table_url(table))
            .query(&eq_filter(field, value))
            .header("Prefer", "return=representation")
            .json(&patch);
        let rows = self.send(table, req).await?.json::<Vec<Value>>().await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_by_field(&self, table: &str, field: &str, value: &str) -> Result<(), DbError> {
        let req = self
            .client
            .delete(self.table_url(table))
            .query(&eq_filter(field, value));
        self.send(table, req).await?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        let query = Query::new().limit(1);
        match self.query("flights", &query).await {
            Ok(_) => {
                info!("Supabase connection test successful");
                true
            }
            Err(e) => {
                error!(error = %e, "Supabase connection test failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_select_params() {
        let q = Query::new()
            .eq("origin", "BOM")
            .eq("flight_id", 7)
            .order("departure_time", false)
            .limit(10)
            .offset(20);
        let params = query_params(&q);
        let expect: Vec<(String, String)> = [
            ("select", "*"),
            ("origin", "eq.BOM"),
            ("flight_id", "eq.7"),
            ("order", "departure_time.desc"),
            ("limit", "10"),
            ("offset", "20"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(params, expect);
    }

    #[test]
    fn offset_without_limit_is_dropped() {
        let params = query_params(&Query::new().offset(5));
        assert_eq!(params, vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn trims_trailing_slash() {
        let c = SupabaseClient::new(reqwest::Client::new(), "https://x.supabase.co/", "k");
        assert_eq!(c.table_url("flights"), "https://x.supabase.co/rest/v1/flights");
    }
}
