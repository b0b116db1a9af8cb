//! How GraphQL requests reach the server.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{field::Empty, Instrument, Level};

use crate::error::{ClientError, ClientResult};

/// Carries one GraphQL request and hands back the raw `{data, errors}`
/// envelope. Decoding is done by the caller.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> ClientResult<Value>;
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: Value,
}

/// POSTs JSON requests to a single GraphQL endpoint.
#[derive(Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Reuse a preconfigured reqwest client (timeouts, proxies...).
    pub fn with_client(inner: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            inner,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, query: &str, variables: Value) -> ClientResult<Value> {
        let response = self
            .inner
            .post(&self.endpoint)
            .json(&RequestBody { query, variables })
            .send()
            .await
            .map_err(|e| ClientError::http(&self.endpoint, e))?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::http(&self.endpoint, e))?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        // Some servers reject with 4xx but still send a GraphQL envelope.
        match serde_json::from_str::<Value>(&body) {
            Ok(v) if v.get("errors").is_some() => Ok(v),
            _ => Err(ClientError::status(status.as_u16(), body)),
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, query: &str, variables: Value) -> ClientResult<Value> {
        let span = tracing::span!(
            Level::INFO, "outgoing_graphql",
            http.url = %self.endpoint,
            graphql.operation = operation_name(query).unwrap_or("anonymous"),
            http.status_code = Empty,
        );
        self.send(query, variables).instrument(span).await
    }
}

/// Name of the first operation in `query`, e.g. `FindAllStudents`.
fn operation_name(query: &str) -> Option<&str> {
    let query = query.trim_start();
    let rest = query
        .strip_prefix("query")
        .or_else(|| query.strip_prefix("mutation"))?
        .trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
