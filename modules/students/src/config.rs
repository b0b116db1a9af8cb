use serde::{Deserialize, Serialize};

/// `modules.students` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentsConfig {
    /// Path the GraphQL endpoint is mounted at.
    #[serde(default = "default_path")]
    pub path: String,
    /// Serve the GraphiQL page on `GET <path>`.
    #[serde(default = "default_graphiql")]
    pub graphiql: bool,
}

impl Default for StudentsConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            graphiql: default_graphiql(),
        }
    }
}

fn default_path() -> String {
    "/students".to_string()
}

fn default_graphiql() -> bool {
    true
}
