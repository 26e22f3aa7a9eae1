use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::models::NewUser;
use crate::schema::users;

#[derive(Queryable, Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl User {
    pub fn from_new(id: i32, new_user: NewUser) -> User {
        User {
            id,
            username: new_user.username,
            email: new_user.email,
            is_admin: new_user.is_admin,
        }
    }

    pub fn new(conn: &mut PgConnection, new_user: &NewUser) -> QueryResult<User> {
        match diesel::insert_into(users::table)
            .values(new_user)
            .get_result::<User>(conn) {
            Ok(user) => Ok(user),
            Err(error) => {
                error!(target: "models/user:new", "Error inserting user: {}", error);
                Err(error)
            }
        }
    }

    pub fn from_username(conn: &mut PgConnection, username_in: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::username.eq(username_in))
            .first::<User>(conn)
            .optional()
    }

    pub fn from_email(conn: &mut PgConnection, email_in: &str) -> QueryResult<Option<User>> {
        users::table
            .filter(users::email.eq(email_in))
            .first::<User>(conn)
            .optional()
    }
}
