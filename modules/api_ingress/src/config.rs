use serde::{Deserialize, Serialize};

/// `modules.api_ingress` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiIngressConfig {
    /// Answer cross-origin requests from any origin.
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
    pub request_timeout_sec: u64,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            cors_enabled: true,
            body_limit_bytes: 16 * 1024 * 1024,
            request_timeout_sec: 30,
        }
    }
}
