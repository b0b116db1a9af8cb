pub mod client;
pub mod error;
pub mod model;

pub use client::StudentsApi;
pub use error::StudentsError;
pub use model::{NewStudent, Student, StudentPatch};
