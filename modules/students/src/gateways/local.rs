use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::StudentsApi,
    error::StudentsError,
    model::{NewStudent, Student, StudentPatch},
};
use crate::domain::service::Service;

/// Local implementation of the StudentsApi trait that delegates to the domain service
pub struct StudentsLocalClient {
    service: Arc<Service>,
}

impl StudentsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl StudentsApi for StudentsLocalClient {
    async fn get_student(&self, id: &str) -> Result<Option<Student>, StudentsError> {
        self.service.get_student(id).await.map_err(Into::into)
    }

    async fn list_students(&self) -> Result<Vec<Student>, StudentsError> {
        self.service.list_students().await.map_err(Into::into)
    }

    async fn add_student(&self, new_student: NewStudent) -> Result<Student, StudentsError> {
        self.service
            .add_student(new_student)
            .await
            .map_err(Into::into)
    }

    async fn update_student(
        &self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<Option<Student>, StudentsError> {
        self.service
            .update_student(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_student(&self, id: &str) -> Result<Option<Student>, StudentsError> {
        self.service.delete_student(id).await.map_err(Into::into)
    }
}
