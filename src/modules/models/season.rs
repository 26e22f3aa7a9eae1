use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::models::NewSeason;
use crate::schema::grand_prix;

/// a grand prix, the races in it count towards one set of standings
#[derive(Queryable, Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Season {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Season {
    pub fn from_new(id: i32, new_season: NewSeason) -> Season {
        Season {
            id,
            name: new_season.name,
            description: new_season.description,
            created_at: new_season.created_at,
        }
    }

    pub fn new(conn: &mut PgConnection, new_season: &NewSeason) -> QueryResult<Season> {
        match diesel::insert_into(grand_prix::table)
            .values(new_season)
            .get_result::<Season>(conn) {
            Ok(season) => Ok(season),
            Err(error) => {
                error!(target: "models/season:new", "Error creating season: {}", error);
                Err(error)
            }
        }
    }

    pub fn from_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Option<Season>> {
        grand_prix::table
            .find(id_in)
            .first::<Season>(conn)
            .optional()
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Season>> {
        grand_prix::table
            .order((grand_prix::created_at.asc(), grand_prix::id.asc()))
            .load::<Season>(conn)
    }
}
