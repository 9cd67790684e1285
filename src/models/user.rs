use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// the input to the registration handler, already trimmed
#[derive(Deserialize, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CreateUser {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::user)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Stored and compared as plain text.
    #[serde(skip_serializing)]
    pub password: String,
}
