//! Repository used when the store could not be reached at startup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Student, StudentPatch};
use crate::domain::repo::StudentsRepository;

/// Fails every call, so resolvers report `STORE_UNAVAILABLE` instead of
/// touching a connection that does not exist.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStudentsRepository;

const UNAVAILABLE: &str = "student store is unavailable";

#[async_trait]
impl StudentsRepository for UnavailableStudentsRepository {
    async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<Student>> {
        anyhow::bail!(UNAVAILABLE)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Student>> {
        anyhow::bail!(UNAVAILABLE)
    }

    async fn insert(&self, _student: Student) -> anyhow::Result<Student> {
        anyhow::bail!(UNAVAILABLE)
    }

    async fn update_by_id(
        &self,
        _id: Uuid,
        _patch: StudentPatch,
    ) -> anyhow::Result<Option<Student>> {
        anyhow::bail!(UNAVAILABLE)
    }

    async fn delete_by_id(&self, _id: Uuid) -> anyhow::Result<Option<Student>> {
        anyhow::bail!(UNAVAILABLE)
    }
}
