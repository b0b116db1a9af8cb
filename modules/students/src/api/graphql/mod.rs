//! GraphQL surface of the students module: schema, resolvers and the axum
//! routes serving them.

use std::sync::Arc;

use async_graphql::{http::GraphiQLSource, EmptySubscription, Schema};
use async_graphql_axum::GraphQL;
use axum::{
    response::Html,
    routing::post_service,
    Router,
};

use crate::config::StudentsConfig;
use crate::domain::service::Service;

pub mod error;
pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::StudentObject;

pub type StudentsSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Schema with the domain service attached as context data.
pub fn build_schema(service: Arc<Service>) -> StudentsSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// SDL of the schema. Needs no store.
pub fn sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

/// `POST <path>` executes one GraphQL request; `GET <path>` serves GraphiQL
/// when enabled.
pub fn router(schema: StudentsSchema, cfg: &StudentsConfig) -> Router {
    let mut route = post_service(GraphQL::new(schema));
    if cfg.graphiql {
        let page = GraphiQLSource::build().endpoint(&cfg.path).finish();
        route = route.get(move || async move { Html(page) });
    }
    Router::new().route(&cfg.path, route)
}
