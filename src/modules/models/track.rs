use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::tracks;

#[derive(Queryable, Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Track {
    pub id: i32,
    pub name: String,
}

impl Track {
    pub fn from_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Option<Track>> {
        tracks::table
            .find(id_in)
            .first::<Track>(conn)
            .optional()
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Track>> {
        tracks::table
            .order(tracks::id.asc())
            .load::<Track>(conn)
    }
}
