use async_trait::async_trait;

use crate::contract::{
    error::StudentsError,
    model::{NewStudent, Student, StudentPatch},
};

/// In-process API of the students module.
///
/// Identifiers are the canonical UUID text the GraphQL surface uses. Lookups
/// that match nothing return `Ok(None)`.
#[async_trait]
pub trait StudentsApi: Send + Sync {
    async fn get_student(&self, id: &str) -> Result<Option<Student>, StudentsError>;

    /// All students in insertion order.
    async fn list_students(&self) -> Result<Vec<Student>, StudentsError>;

    async fn add_student(&self, new_student: NewStudent) -> Result<Student, StudentsError>;

    async fn update_student(
        &self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<Option<Student>, StudentsError>;

    /// Returns the record as it was before deletion.
    async fn delete_student(&self, id: &str) -> Result<Option<Student>, StudentsError>;
}
