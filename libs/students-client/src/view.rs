//! Headless form/list view over [`StudentsStore`].

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::error::ClientResult;
use crate::operations::{Student, StudentChanges, StudentFields};
use crate::store::{ListState, StudentsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserName,
    FirstName,
    LastName,
    Email,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::UserName,
        Field::FirstName,
        Field::LastName,
        Field::Email,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::UserName => "Username",
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field `{0}` (expected userName, firstName, lastName or email)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the wire names and their snake/kebab/lowercase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "username" | "user" => Ok(Field::UserName),
            "firstname" | "first" => Ok(Field::FirstName),
            "lastname" | "last" => Ok(Field::LastName),
            "email" => Ok(Field::Email),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// What a submit will do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Update { id: String },
}

/// The single record being typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mode: FormMode,
}

impl EditBuffer {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::UserName => &self.user_name,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::UserName => &mut self.user_name,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
        };
        *slot = value.into();
    }

    /// All four fields hold something other than whitespace.
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| !self.get(*f).trim().is_empty())
    }

    pub fn load(&mut self, student: &Student) {
        *self = Self {
            user_name: student.user_name.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone(),
            mode: FormMode::Update {
                id: student.id.clone(),
            },
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_fields(&self) -> StudentFields {
        StudentFields {
            user_name: self.user_name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Outcome of [`StudentsView::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Some field was blank; nothing was sent.
    Rejected,
    Created(Student),
    /// `None` when the record vanished before the update landed.
    Updated(Option<Student>),
}

pub struct StudentsView {
    store: Arc<StudentsStore>,
    buffer: EditBuffer,
}

impl StudentsView {
    pub fn new(store: Arc<StudentsStore>) -> Self {
        Self {
            store,
            buffer: EditBuffer::default(),
        }
    }

    pub fn store(&self) -> &Arc<StudentsStore> {
        &self.store
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.buffer.set(field, value);
    }

    /// 1-based lookup into the currently loaded list.
    pub fn student_at(&self, position: usize) -> Option<Student> {
        let state = self.store.state();
        position
            .checked_sub(1)
            .and_then(|i| state.students()?.get(i).cloned())
    }

    pub async fn refresh(&self) -> ClientResult<Vec<Student>> {
        self.store.refetch().await
    }

    /// Send the buffer as `addStudent` or `updateStudent` depending on the
    /// form mode. The buffer is reset as soon as the request is issued, so a
    /// failed submit loses what was typed.
    pub async fn submit(&mut self) -> ClientResult<Submission> {
        if !self.buffer.is_complete() {
            debug!("submit rejected: form is incomplete");
            return Ok(Submission::Rejected);
        }

        let buffer = std::mem::take(&mut self.buffer);
        let fields = buffer.to_fields();
        match buffer.mode {
            FormMode::Create => {
                info!(user_name = %fields.user_name, "adding student");
                self.store.add(fields).await.map(Submission::Created)
            }
            FormMode::Update { id } => {
                info!(%id, "updating student");
                self.store
                    .update(&id, StudentChanges::from(fields))
                    .await
                    .map(Submission::Updated)
            }
        }
    }

    pub fn edit(&mut self, student: &Student) {
        self.buffer.load(student);
    }

    pub fn cancel_edit(&mut self) {
        self.buffer.clear();
    }

    /// Deletes right away; there is no confirmation step.
    pub async fn delete(&self, student: &Student) -> ClientResult<Option<Student>> {
        info!(id = %student.id, "deleting student");
        self.store.delete(&student.id).await
    }

    pub fn render(&self) -> String {
        let students = match self.store.state() {
            ListState::Loading => return "Loading...".to_string(),
            ListState::Failed(message) => return format!("Error: {message}"),
            ListState::Loaded(list) => list,
        };

        let mut out = String::from("Students\n\n");
        match &self.buffer.mode {
            FormMode::Create => out.push_str("New student\n"),
            FormMode::Update { id } => {
                let _ = writeln!(out, "Editing {id}");
            }
        }
        for field in Field::ALL {
            let _ = writeln!(out, "  {}: {}", field.label(), self.buffer.get(field));
        }
        out.push_str("  [Submit]\n");
        if let Some(message) = self.store.last_mutation_error() {
            let _ = writeln!(out, "Last error: {message}");
        }

        for (i, s) in students.iter().enumerate() {
            let _ = write!(
                out,
                "\n{}. Name: {} {}\n   Username: {}\n   Email: {}\n",
                i + 1,
                s.first_name,
                s.last_name,
                s.user_name,
                s.email
            );
        }
        out
    }
}
