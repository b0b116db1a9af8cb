use crate::contract::model::{Student, StudentPatch};
use async_trait::async_trait;
use uuid::Uuid;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait StudentsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Student>>;

    /// Every row, oldest first.
    async fn find_all(&self) -> anyhow::Result<Vec<Student>>;

    /// Persist a fully-formed record and return it as stored.
    async fn insert(&self, student: Student) -> anyhow::Result<Student>;

    /// Apply the supplied fields and bump `updated_at`. A patch with no
    /// fields writes nothing and returns the stored record.
    /// Returns the post-update record, or `None` if no row has this id.
    async fn update_by_id(&self, id: Uuid, patch: StudentPatch)
        -> anyhow::Result<Option<Student>>;

    /// Returns the pre-deletion snapshot, or `None` if no row has this id.
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<Option<Student>>;
}
