use thiserror::Error;

/// Failures seen by the client data layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, DNS, timeout...).
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status and no GraphQL envelope.
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the shape we asked for.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope carried `errors`.
    #[error("{}", .messages.join("; "))]
    Graphql {
        messages: Vec<String>,
        codes: Vec<String>,
    },

    /// The envelope had neither `data` nor `errors`.
    #[error("response contained no data")]
    MissingData,
}

impl ClientError {
    pub fn http(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn graphql(messages: Vec<String>, codes: Vec<String>) -> Self {
        Self::Graphql { messages, codes }
    }

    /// `extensions.code` of the first GraphQL error, if the server set one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Graphql { codes, .. } => codes.first().map(String::as_str),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
