//! PostgREST table client
//!
//! A small query builder over the PostgREST HTTP API, the ORM-style client
//! the salon booking store talks to.
//!
//! # Features
//!
//! - Query API (`select`, `insert`, `update`, `delete`)
//! - Filtering (`eq`, `neq`, `gt`, `gte`, `lt`, `lte`)
//! - Ordering and pagination
//! - Typed rows through `serde`

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Error body returned by PostgREST on a failed request
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostgrestApiErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl fmt::Display for PostgrestApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(code) = &self.code {
            parts.push(format!("Code: {}", code));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message: {}", message));
        }
        if let Some(details) = &self.details {
            parts.push(format!("Details: {}", details));
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("Hint: {}", hint));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum PostgrestError {
    #[error("API error: {details} (Status: {status})")]
    ApiError {
        details: PostgrestApiErrorDetails,
        status: reqwest::StatusCode,
    },

    #[error("API error (unparsed): {message} (Status: {status})")]
    UnparsedApiError {
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl PostgrestError {
    /// HTTP status of an API failure, if the server answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            PostgrestError::ApiError { status, .. } => Some(*status),
            PostgrestError::UnparsedApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Client for a single PostgREST table
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    base_url: String,
    table: String,
    http_client: Client,
    headers: HeaderMap,
    query_params: HashMap<String, String>,
}

impl PostgrestClient {
    /// Create a client for `table` under `{base_url}/rest/v1`
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        http_client: Client,
    ) -> Result<Self, PostgrestError> {
        let client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            http_client,
            headers: HeaderMap::new(),
            query_params: HashMap::new(),
        };

        client
            .with_header("apikey", api_key)?
            .with_header("Content-Type", "application/json")
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, PostgrestError> {
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header value for {}", key))
        })?;
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            PostgrestError::InvalidParameters(format!("Invalid header name: {}", key))
        })?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Send requests with a bearer token instead of the bare API key role
    pub fn with_auth(self, token: &str) -> Result<Self, PostgrestError> {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.query_params
            .insert("select".to_string(), columns.to_string());
        self
    }

    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: &str) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gt(self, column: &str, value: &str) -> Self {
        self.filter(column, "gt", value)
    }

    pub fn gte(self, column: &str, value: &str) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: &str) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn lte(self, column: &str, value: &str) -> Self {
        self.filter(column, "lte", value)
    }

    fn filter(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.query_params
            .insert(column.to_string(), format!("{}.{}", operator, value));
        self
    }

    /// Order by one or more columns; later calls append tie-breakers
    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        let direction = match order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        let term = format!("{}.{}", column, direction);
        self.query_params
            .entry("order".to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&term);
            })
            .or_insert(term);
        self
    }

    pub fn limit(mut self, count: u32) -> Self {
        self.query_params
            .insert("limit".to_string(), count.to_string());
        self
    }

    pub fn offset(mut self, count: u32) -> Self {
        self.query_params
            .insert("offset".to_string(), count.to_string());
        self
    }

    /// Fetch the rows matching the current filters
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, PostgrestError> {
        let url = self.build_url()?;
        log::debug!("GET {}", url);

        let request = self.http_client.get(&url).headers(self.headers.clone());
        let body = self.send(request).await?;
        parse_rows(&body)
    }

    /// Insert `values` and return the stored representation
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        values: T,
    ) -> Result<Vec<R>, PostgrestError> {
        let url = self.build_url()?;
        log::debug!("POST {}", url);

        let request = self
            .http_client
            .post(&url)
            .headers(self.representation_headers())
            .json(&values);
        let body = self.send(request).await?;
        parse_rows(&body)
    }

    /// Patch the rows matching the current filters and return them
    ///
    /// An empty result means no row matched.
    pub async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        values: T,
    ) -> Result<Vec<R>, PostgrestError> {
        self.require_filter("update")?;
        let url = self.build_url()?;
        log::debug!("PATCH {}", url);

        let request = self
            .http_client
            .patch(&url)
            .headers(self.representation_headers())
            .json(&values);
        let body = self.send(request).await?;
        parse_rows(&body)
    }

    /// Delete the rows matching the current filters and return them
    pub async fn delete<R: DeserializeOwned>(&self) -> Result<Vec<R>, PostgrestError> {
        self.require_filter("delete")?;
        let url = self.build_url()?;
        log::debug!("DELETE {}", url);

        let request = self
            .http_client
            .delete(&url)
            .headers(self.representation_headers());
        let body = self.send(request).await?;
        parse_rows(&body)
    }

    fn representation_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static("return=representation"),
        );
        headers
    }

    // PostgREST applies an unfiltered PATCH/DELETE to the whole table.
    fn require_filter(&self, operation: &str) -> Result<(), PostgrestError> {
        let filtered = self
            .query_params
            .keys()
            .any(|key| !matches!(key.as_str(), "select" | "order" | "limit" | "offset"));
        if filtered {
            Ok(())
        } else {
            Err(PostgrestError::InvalidParameters(format!(
                "{} on {} requires a filter",
                operation, self.table
            )))
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, PostgrestError> {
        let response = request.send().await.map_err(PostgrestError::NetworkError)?;
        let status = response.status();

        if status.is_success() {
            return response.text().await.map_err(|e| {
                PostgrestError::DeserializationError(format!("Failed to read response body: {}", e))
            });
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        log::warn!("{} request on {} failed: {}", status, self.table, error_text);

        match serde_json::from_str::<PostgrestApiErrorDetails>(&error_text) {
            Ok(details) => Err(PostgrestError::ApiError { details, status }),
            Err(_) => Err(PostgrestError::UnparsedApiError {
                message: error_text,
                status,
            }),
        }
    }

    fn build_url(&self) -> Result<String, PostgrestError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, self.table))?;

        for (key, value) in &self.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }
}

// 204 No Content and `return=minimal` both leave the body empty.
fn parse_rows<R: DeserializeOwned>(body: &str) -> Result<Vec<R>, PostgrestError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<R>>(body)
        .map_err(|e| PostgrestError::DeserializationError(e.to_string()))
}
