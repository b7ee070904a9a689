//! Backend HTTP Client
//!
//! Thin wrapper over `reqwest` for the backend surfaces the client uses:
//! row queries and upserts on REST tables, serverless function invocations
//! and the signed-in user endpoint.

use std::sync::Arc;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;

/// Backend call failure
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout or TLS failure
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx response with a body we cannot read
    #[error("Unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Transport(e) if e.is_timeout() => ErrorKind::RequestTimeout,
            BackendError::Transport(_) => ErrorKind::ServiceUnavailable,
            BackendError::Status { status, .. } => ErrorKind::from_status(*status),
            BackendError::Decode(_) => ErrorKind::InternalServerError,
        }
    }

    /// Member-facing message (backend message for status errors)
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
            BackendError::Transport(_) => "Could not reach the server".to_string(),
            _ => "Operation failed".to_string(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.user_message())
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::new(err.kind(), err.user_message()).with_source(err)
    }
}

/// Backend client bound to one project (and optionally one member session)
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: Arc<BackendConfig>,
    access_token: Option<Arc<str>>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            access_token: None,
        })
    }

    /// Same client, authorised as a signed-in member
    pub fn with_access_token(&self, token: impl Into<Arc<str>>) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            access_token: Some(token.into()),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(self.config.anon_key.as_str());
        request
            .header("apikey", self.config.anon_key.as_str())
            .bearer_auth(bearer)
    }

    /// Whether at least one row of `table` matches all equality `filters`
    pub async fn select_exists(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<bool, BackendError> {
        let query = filters
            .iter()
            .fold(RowQuery::new("id").limit(1), |q, (column, value)| {
                q.eq(*column, value)
            });
        let rows: Vec<serde_json::Value> = self.select_rows(table, &query).await?;
        Ok(!rows.is_empty())
    }

    /// Rows of `table` selected by `query`
    pub async fn select_rows<R: DeserializeOwned>(
        &self,
        table: &str,
        query: &RowQuery,
    ) -> Result<Vec<R>, BackendError> {
        tracing::debug!(table = %table, "Backend row lookup");

        let response = self
            .authorize(self.http.get(self.config.rest_url(table)))
            .query(&query.to_pairs())
            .send()
            .await?;

        read_json(response).await
    }

    /// Insert `row` into `table`, merging into an existing row on key conflict
    pub async fn upsert_row<B>(&self, table: &str, row: &B) -> Result<(), BackendError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(table = %table, "Backend row upsert");

        let response = self
            .authorize(self.http.post(self.config.rest_url(table)))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await?;
        Err(BackendError::Status {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    /// POST `body` as JSON to a serverless function and decode the reply
    pub async fn invoke_function<B, R>(&self, name: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(function = %name, "Backend function invocation");

        let response = self
            .authorize(self.http.post(self.config.function_url(name)))
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Profile of the member owning the access token
    ///
    /// `None` without a token or when the backend rejects it.
    pub async fn current_user<R: DeserializeOwned>(&self) -> Result<Option<R>, BackendError> {
        if self.access_token.is_none() {
            return Ok(None);
        }

        let response = self
            .authorize(self.http.get(self.config.auth_user_url()))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::debug!("Access token rejected");
            return Ok(None);
        }

        read_json(response).await.map(Some)
    }
}

/// Projection, equality filters, ordering and limit for a REST table read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    columns: String,
    filters: Vec<(String, String)>,
    order: Vec<(String, bool)>,
    limit: Option<usize>,
}

impl RowQuery {
    /// `columns` uses the REST select syntax, embedded relations included
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), value.to_string()));
        self
    }

    /// Add a sort key; earlier keys take precedence
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push((column.into(), ascending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in the REST layer's syntax
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        for (column, value) in &self.filters {
            pairs.push((column.clone(), format!("eq.{value}")));
        }
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|(column, ascending)| {
                    format!("{column}.{}", if *ascending { "asc" } else { "desc" })
                })
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, BackendError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            message: extract_message(&body),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Pull a human-readable message out of an error body
///
/// Functions answer `{"error": ".."}`, the REST layer `{"message": ".."}`;
/// anything else is returned as trimmed text.
pub(crate) fn extract_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}
