//! Request templates for the students endpoint and the typed shapes that go
//! in and out of them. Field and argument names are the wire contract and
//! must match the server schema verbatim.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::transport::GraphqlTransport;

pub const FIND_STUDENTS: &str = r#"
query FindAllStudents {
  students {
    id
    userName
    firstName
    lastName
    email
  }
}"#;

pub const FIND_STUDENT: &str = r#"
query FindStudent($id: String) {
  student(id: $id) {
    id
    userName
    firstName
    lastName
    email
  }
}"#;

pub const ADD_STUDENT: &str = r#"
mutation AddStudent($userName: String!, $firstName: String!, $lastName: String!, $email: String!) {
  addStudent(userName: $userName, firstName: $firstName, lastName: $lastName, email: $email) {
    id
    userName
    firstName
    lastName
    email
  }
}"#;

pub const UPDATE_STUDENT: &str = r#"
mutation UpdateStudent($id: String!, $userName: String, $firstName: String, $lastName: String, $email: String) {
  updateStudent(id: $id, userName: $userName, firstName: $firstName, lastName: $lastName, email: $email) {
    id
    userName
    firstName
    lastName
    email
  }
}"#;

pub const DELETE_STUDENT: &str = r#"
mutation DeleteStudent($id: String!) {
  deleteStudent(id: $id) {
    id
    userName
    firstName
    lastName
    email
  }
}"#;

/// A student as the client sees it. The id is an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Variables of `AddStudent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Optional fields of `UpdateStudent`; `None` is left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<StudentFields> for StudentChanges {
    fn from(f: StudentFields) -> Self {
        Self {
            user_name: Some(f.user_name),
            first_name: Some(f.first_name),
            last_name: Some(f.last_name),
            email: Some(f.email),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdVariables<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateVariables<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub changes: &'a StudentChanges,
}

#[derive(Debug, Deserialize)]
pub struct FindStudentsData {
    pub students: Vec<Student>,
}

#[derive(Debug, Deserialize)]
pub struct FindStudentData {
    pub student: Option<Student>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentData {
    pub add_student: Student,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentData {
    pub update_student: Option<Student>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStudentData {
    pub delete_student: Option<Student>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

/// Turn a `{data, errors}` envelope into the typed payload.
///
/// Any entry in `errors` wins over `data`, even when `data` is partially
/// filled.
pub fn decode_envelope<T: DeserializeOwned>(envelope: Value) -> ClientResult<T> {
    let envelope: Envelope = serde_json::from_value(envelope)?;
    if !envelope.errors.is_empty() {
        let codes = envelope
            .errors
            .iter()
            .filter_map(|e| e.extensions.as_ref()?.get("code")?.as_str().map(str::to_owned))
            .collect();
        let messages = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(ClientError::graphql(messages, codes));
    }
    match envelope.data {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
        _ => Err(ClientError::MissingData),
    }
}

/// Send one operation through `transport` and decode its payload.
pub async fn run<T, V>(transport: &dyn GraphqlTransport, query: &str, variables: &V) -> ClientResult<T>
where
    T: DeserializeOwned,
    V: Serialize + ?Sized,
{
    let variables = serde_json::to_value(variables)?;
    let envelope = transport.execute(query, variables).await?;
    decode_envelope(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_variables_skip_absent_fields() {
        let changes = StudentChanges {
            user_name: Some("asmith2".into()),
            ..Default::default()
        };
        let vars = serde_json::to_value(UpdateVariables {
            id: "abc",
            changes: &changes,
        })
        .unwrap();
        assert_eq!(vars, json!({ "id": "abc", "userName": "asmith2" }));
    }

    #[test]
    fn add_variables_are_camel_case() {
        let vars = serde_json::to_value(StudentFields {
            user_name: "asmith".into(),
            first_name: "Ann".into(),
            last_name: "Smith".into(),
            email: "a@x.io".into(),
        })
        .unwrap();
        assert_eq!(
            vars,
            json!({ "userName": "asmith", "firstName": "Ann", "lastName": "Smith", "email": "a@x.io" })
        );
    }

    #[test]
    fn decode_reads_data() {
        let data: FindStudentsData = decode_envelope(json!({
            "data": { "students": [
                { "id": "1", "userName": "a", "firstName": "A", "lastName": "One", "email": "a@x.io" }
            ] }
        }))
        .unwrap();
        assert_eq!(data.students.len(), 1);
        assert_eq!(data.students[0].first_name, "A");
    }

    #[test]
    fn decode_prefers_errors_over_data() {
        let err = decode_envelope::<FindStudentData>(json!({
            "data": { "student": null },
            "errors": [{ "message": "invalid student id: 123", "extensions": { "code": "INVALID_ID" } }]
        }))
        .unwrap_err();
        assert_eq!(err.code(), Some("INVALID_ID"));
        assert_eq!(err.to_string(), "invalid student id: 123");
    }

    #[test]
    fn decode_null_payload_is_not_an_error() {
        let data: DeleteStudentData = decode_envelope(json!({ "data": { "deleteStudent": null } })).unwrap();
        assert!(data.delete_student.is_none());
    }

    #[test]
    fn decode_without_data_or_errors() {
        let err = decode_envelope::<FindStudentsData>(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, ClientError::MissingData));
    }

    #[test]
    fn templates_use_wire_names() {
        assert!(FIND_STUDENTS.contains("query FindAllStudents"));
        assert!(ADD_STUDENT.contains("addStudent(userName: $userName, firstName: $firstName, lastName: $lastName, email: $email)"));
        assert!(UPDATE_STUDENT.contains("$id: String!"));
        assert!(UPDATE_STUDENT.contains("$userName: String,"));
        assert!(DELETE_STUDENT.contains("deleteStudent(id: $id)"));
    }
}
