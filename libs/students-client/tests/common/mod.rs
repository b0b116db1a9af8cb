#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_graphql::{Request, Variables};
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;

use students::{api::graphql::StudentsSchema, config::StudentsConfig, Students};
use students_client::{ClientResult, GraphqlTransport, StudentsStore, StudentsView};

/// Executes requests directly against a students schema and counts them.
pub struct SchemaTransport {
    schema: StudentsSchema,
    calls: AtomicUsize,
}

impl SchemaTransport {
    pub fn new(schema: StudentsSchema) -> Arc<Self> {
        Arc::new(Self {
            schema,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphqlTransport for SchemaTransport {
    async fn execute(&self, query: &str, variables: Value) -> ClientResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request = Request::new(query).variables(Variables::from_json(variables));
        let response = self.schema.execute(request).await;
        Ok(serde_json::to_value(&response)?)
    }
}

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Students::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_module() -> Students {
    Students::init(create_test_db().await, StudentsConfig::default())
}

/// A view wired to a fresh database, plus the transport for call counting.
pub async fn create_test_view() -> (StudentsView, Arc<SchemaTransport>) {
    let transport = SchemaTransport::new(create_test_module().await.schema());
    let store = Arc::new(StudentsStore::new(transport.clone()));
    (StudentsView::new(store), transport)
}
