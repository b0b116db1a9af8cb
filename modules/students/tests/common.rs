#![allow(dead_code)]

use async_graphql::{Request, Variables};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;

use students::{api::graphql::StudentsSchema, config::StudentsConfig, Students};

/// Fresh in-memory SQLite DB with migrations applied.
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

/// Run one GraphQL request and return the whole response envelope as JSON.
pub async fn exec(schema: &StudentsSchema, query: &str, vars: Value) -> Value {
    let request = Request::new(query).variables(Variables::from_json(vars));
    let response = schema.execute(request).await;
    serde_json::to_value(&response).expect("response serializes")
}

pub fn error_code(envelope: &Value) -> Option<&str> {
    envelope["errors"][0]["extensions"]["code"].as_str()
}

pub const ADD: &str = r#"
    mutation($userName: String!, $firstName: String!, $lastName: String!, $email: String!) {
        addStudent(userName: $userName, firstName: $firstName, lastName: $lastName, email: $email) {
            id userName firstName lastName email
        }
    }"#;

pub const GET: &str = r#"
    query($id: String) {
        student(id: $id) { id userName firstName lastName email }
    }"#;

pub const LIST: &str = "{ students { id userName firstName lastName email } }";

pub const UPDATE: &str = r#"
    mutation($id: String!, $userName: String, $firstName: String, $lastName: String, $email: String) {
        updateStudent(id: $id, userName: $userName, firstName: $firstName, lastName: $lastName, email: $email) {
            id userName firstName lastName email
        }
    }"#;

pub const DELETE: &str = r#"
    mutation($id: String!) {
        deleteStudent(id: $id) { id userName firstName lastName email }
    }"#;

pub async fn add(schema: &StudentsSchema, user: &str, first: &str, last: &str, email: &str) -> Value {
    let env = exec(
        schema,
        ADD,
        serde_json::json!({
            "userName": user, "firstName": first, "lastName": last, "email": email
        }),
    )
    .await;
    assert!(env.get("errors").is_none(), "addStudent failed: {env}");
    env["data"]["addStudent"].clone()
}
