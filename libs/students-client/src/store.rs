//! Cached student list with refetch-after-mutation semantics.
//!
//! The store owns a single list cache. It never merges mutation payloads into
//! that cache: every successful mutation re-issues the list query and the
//! fresh result replaces the cache wholesale. Consumers observe the cache
//! through a [`watch`] channel.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::error::ClientResult;
use crate::operations::{
    self, AddStudentData, DeleteStudentData, FindStudentData, FindStudentsData, IdVariables,
    Student, StudentChanges, StudentFields, UpdateStudentData, UpdateVariables, ADD_STUDENT,
    DELETE_STUDENT, FIND_STUDENT, FIND_STUDENTS, UPDATE_STUDENT,
};
use crate::transport::GraphqlTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Failed(String),
    Loaded(Vec<Student>),
}

impl ListState {
    pub fn students(&self) -> Option<&[Student]> {
        match self {
            ListState::Loaded(list) => Some(list),
            _ => None,
        }
    }
}

pub struct StudentsStore {
    transport: Arc<dyn GraphqlTransport>,
    state: watch::Sender<ListState>,
    last_error: Mutex<Option<String>>,
}

impl StudentsStore {
    /// Starts in `Loading`; call [`refetch`](Self::refetch) to fill the cache.
    pub fn new(transport: Arc<dyn GraphqlTransport>) -> Self {
        let (state, _) = watch::channel(ListState::Loading);
        Self {
            transport,
            state,
            last_error: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    /// Message of the most recent failed mutation, cleared by the next
    /// successful one.
    pub fn last_mutation_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    /// Re-issue the list query and replace the cache with its result.
    #[instrument(name = "students.store.refetch", skip(self))]
    pub async fn refetch(&self) -> ClientResult<Vec<Student>> {
        self.state.send_replace(ListState::Loading);
        let result = operations::run::<FindStudentsData, _>(
            self.transport.as_ref(),
            FIND_STUDENTS,
            &serde_json::json!({}),
        )
        .await;

        match result {
            Ok(data) => {
                debug!(count = data.students.len(), "student list refreshed");
                self.state
                    .send_replace(ListState::Loaded(data.students.clone()));
                Ok(data.students)
            }
            Err(e) => {
                warn!(error = %e, "failed to load students");
                self.state.send_replace(ListState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Single lookup; does not touch the list cache.
    pub async fn find(&self, id: &str) -> ClientResult<Option<Student>> {
        let data: FindStudentData =
            operations::run(self.transport.as_ref(), FIND_STUDENT, &IdVariables { id }).await?;
        Ok(data.student)
    }

    #[instrument(name = "students.store.add", skip_all)]
    pub async fn add(&self, fields: StudentFields) -> ClientResult<Student> {
        let result = operations::run::<AddStudentData, _>(self.transport.as_ref(), ADD_STUDENT, &fields)
            .await
            .map(|d| d.add_student);
        self.settle(result).await
    }

    #[instrument(name = "students.store.update", skip(self, changes))]
    pub async fn update(&self, id: &str, changes: StudentChanges) -> ClientResult<Option<Student>> {
        let vars = UpdateVariables {
            id,
            changes: &changes,
        };
        let result = operations::run::<UpdateStudentData, _>(self.transport.as_ref(), UPDATE_STUDENT, &vars)
            .await
            .map(|d| d.update_student);
        self.settle(result).await
    }

    #[instrument(name = "students.store.delete", skip(self))]
    pub async fn delete(&self, id: &str) -> ClientResult<Option<Student>> {
        let result = operations::run::<DeleteStudentData, _>(
            self.transport.as_ref(),
            DELETE_STUDENT,
            &IdVariables { id },
        )
        .await
        .map(|d| d.delete_student);
        self.settle(result).await
    }

    /// Post-mutation bookkeeping: refetch on success, remember the message
    /// on failure. A failed refetch shows up in the list state only.
    async fn settle<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        match result {
            Ok(value) => {
                self.set_last_error(None);
                let _ = self.refetch().await;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "student mutation failed");
                self.set_last_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn set_last_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }
}
