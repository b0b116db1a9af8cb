use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::types::StudentObject;
use crate::domain::service::Service;

#[derive(Default)]
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// One student, or null when the id matches nothing or is omitted.
    async fn student(&self, ctx: &Context<'_>, id: Option<String>) -> Result<Option<StudentObject>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let service = ctx.data::<Arc<Service>>()?;
        let found = service.get_student(&id).await.map_err(|e| e.extend())?;
        Ok(found.map(Into::into))
    }

    /// Every student in insertion order.
    async fn students(&self, ctx: &Context<'_>) -> Result<Vec<StudentObject>> {
        let service = ctx.data::<Arc<Service>>()?;
        let all = service.list_students().await.map_err(|e| e.extend())?;
        Ok(all.into_iter().map(Into::into).collect())
    }
}
