//! Client side of the students API.
//!
//! - [`operations`]: request templates and wire types
//! - [`transport`]: how requests reach the server ([`HttpTransport`])
//! - [`store`]: cached list that is refetched after every mutation
//! - [`view`]: form/list view driven by the store

pub mod error;
pub mod operations;
pub mod store;
pub mod transport;
pub mod view;

pub use error::{ClientError, ClientResult};
pub use operations::{Student, StudentChanges, StudentFields};
pub use store::{ListState, StudentsStore};
pub use transport::{GraphqlTransport, HttpTransport};
pub use view::{EditBuffer, Field, FormMode, StudentsView, Submission};
