//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it works on a `DatabaseConnection`
//! or inside a transaction.

use anyhow::Context;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::contract::model::{Student, StudentPatch};
use crate::domain::repo::StudentsRepository;
use crate::infra::storage::entity::{
    ActiveModel as StudentAM, Column, Entity as StudentEntity,
};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmStudentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmStudentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> StudentsRepository for SeaOrmStudentsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Student>> {
        let found = StudentEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Student>> {
        let rows = StudentEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, s: Student) -> anyhow::Result<Student> {
        let m = StudentAM {
            id: Set(s.id),
            user_name: Set(s.user_name),
            first_name: Set(s.first_name),
            last_name: Set(s.last_name),
            email: Set(s.email),
            created_at: Set(s.created_at),
            updated_at: Set(s.updated_at),
        };
        let stored = m.insert(&self.conn).await.context("insert failed")?;
        Ok(stored.into())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        patch: StudentPatch,
    ) -> anyhow::Result<Option<Student>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        // Only the supplied columns are Set; the rest stay NotSet and are
        // left out of the UPDATE.
        let mut m = StudentAM {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(v) = patch.user_name {
            m.user_name = Set(v);
        }
        if let Some(v) = patch.first_name {
            m.first_name = Set(v);
        }
        if let Some(v) = patch.last_name {
            m.last_name = Set(v);
        }
        if let Some(v) = patch.email {
            m.email = Set(v);
        }

        match m.update(&self.conn).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).context("update_by_id failed"),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<Option<Student>> {
        let Some(existing) = StudentEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("delete_by_id lookup failed")?
        else {
            return Ok(None);
        };

        let res = StudentEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete_by_id failed")?;
        // A concurrent delete may have won the race.
        Ok((res.rows_affected > 0).then(|| existing.into()))
    }
}
