use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{NewStudent, Student, StudentPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::StudentsRepository;

/// Domain service between the resolvers and the repository port.
///
/// Each operation parses its identifier (if any) and makes exactly one
/// repository call. Inputs are not validated beyond what the schema enforces.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn StudentsRepository>,
}

fn parse_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::invalid_id(raw))
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(repo: Arc<dyn StudentsRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "students.service.get_student", skip(self), fields(student_id = %id))]
    pub async fn get_student(&self, id: &str) -> Result<Option<Student>, DomainError> {
        debug!("Getting student by id");
        let id = parse_id(id)?;
        let found = self.repo.find_by_id(id).await.map_err(db_err)?;
        debug!(found = found.is_some(), "Lookup finished");
        Ok(found)
    }

    #[instrument(name = "students.service.list_students", skip(self))]
    pub async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        let students = self.repo.find_all().await.map_err(db_err)?;
        debug!("Listed {} students", students.len());
        Ok(students)
    }

    #[instrument(
        name = "students.service.add_student",
        skip(self, new_student),
        fields(user_name = %new_student.user_name)
    )]
    pub async fn add_student(&self, new_student: NewStudent) -> Result<Student, DomainError> {
        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            user_name: new_student.user_name,
            first_name: new_student.first_name,
            last_name: new_student.last_name,
            email: new_student.email,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repo.insert(student).await.map_err(db_err)?;
        info!("Created student with id={}", stored.id);
        Ok(stored)
    }

    #[instrument(name = "students.service.update_student", skip(self, patch), fields(student_id = %id))]
    pub async fn update_student(
        &self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<Option<Student>, DomainError> {
        let id = parse_id(id)?;
        let updated = self.repo.update_by_id(id, patch).await.map_err(db_err)?;
        match &updated {
            Some(_) => info!("Updated student"),
            None => debug!("No student to update"),
        }
        Ok(updated)
    }

    #[instrument(name = "students.service.delete_student", skip(self), fields(student_id = %id))]
    pub async fn delete_student(&self, id: &str) -> Result<Option<Student>, DomainError> {
        let id = parse_id(id)?;
        let deleted = self.repo.delete_by_id(id).await.map_err(db_err)?;
        match &deleted {
            Some(_) => info!("Deleted student"),
            None => debug!("No student to delete"),
        }
        Ok(deleted)
    }
}
