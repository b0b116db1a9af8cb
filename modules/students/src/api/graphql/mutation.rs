use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::types::StudentObject;
use crate::contract::model::{NewStudent, StudentPatch};
use crate::domain::service::Service;

#[derive(Default)]
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    async fn add_student(
        &self,
        ctx: &Context<'_>,
        user_name: String,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Result<StudentObject> {
        let service = ctx.data::<Arc<Service>>()?;
        let created = service
            .add_student(NewStudent {
                user_name,
                first_name,
                last_name,
                email,
            })
            .await
            .map_err(|e| e.extend())?;
        Ok(created.into())
    }

    /// Omitted or null fields keep their stored values.
    async fn update_student(
        &self,
        ctx: &Context<'_>,
        id: String,
        user_name: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<StudentObject>> {
        let service = ctx.data::<Arc<Service>>()?;
        let patch = StudentPatch {
            user_name,
            first_name,
            last_name,
            email,
        };
        let updated = service
            .update_student(&id, patch)
            .await
            .map_err(|e| e.extend())?;
        Ok(updated.map(Into::into))
    }

    /// Returns the removed student, or null if none matched.
    async fn delete_student(&self, ctx: &Context<'_>, id: String) -> Result<Option<StudentObject>> {
        let service = ctx.data::<Arc<Service>>()?;
        let deleted = service.delete_student(&id).await.map_err(|e| e.extend())?;
        Ok(deleted.map(Into::into))
    }
}
