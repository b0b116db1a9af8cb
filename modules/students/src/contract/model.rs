use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A student record as stored. Timestamps are bookkeeping only and never
/// leave the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentPatch {
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
    }
}
