use async_graphql::SimpleObject;

use crate::contract::model::Student;

/// Wire shape of a student. Field names are camelCased by async-graphql.
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
#[graphql(name = "Student")]
pub struct StudentObject {
    pub id: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Student> for StudentObject {
    fn from(s: Student) -> Self {
        Self {
            id: s.id.to_string(),
            user_name: s.user_name,
            first_name: s.first_name,
            last_name: s.last_name,
            email: s.email,
        }
    }
}
