use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use log::error;
use serde::{Deserialize, Serialize};

use crate::models::NewRace;
use crate::schema::races;

/// first key of the advisory locks guarding races, the second key is the race id
const RACE_LOCK_CLASS: i32 = 0x4750;

#[derive(Queryable, Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Race {
    pub id: i32,
    pub season_id: i32,
    pub track_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Race {
    pub fn from_new(id: i32, new_race: NewRace) -> Race {
        Race {
            id,
            season_id: new_race.season_id,
            track_id: new_race.track_id,
            name: new_race.name,
            description: new_race.description,
            created_at: new_race.created_at,
        }
    }

    /// # create race
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `new_race` - the race to insert
    ///
    /// ## Returns
    /// * `Race` - the created race
    pub fn new(conn: &mut PgConnection, new_race: &NewRace) -> QueryResult<Race> {
        match diesel::insert_into(races::table)
            .values(new_race)
            .get_result::<Race>(conn) {
            Ok(race) => Ok(race),
            Err(error) => {
                error!(target: "models/race:new", "Error creating race: {}", error);
                Err(error)
            }
        }
    }

    pub fn from_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Option<Race>> {
        races::table
            .find(id_in)
            .first::<Race>(conn)
            .optional()
    }

    /// # get the races of a season
    /// in the order they were created
    pub fn from_season(conn: &mut PgConnection, season_in: i32) -> QueryResult<Vec<Race>> {
        races::table
            .filter(races::grand_prix_id.eq(season_in))
            .order((races::created_at.asc(), races::id.asc()))
            .load::<Race>(conn)
    }

    /// # replace the description of a race
    /// fails with `NotFound` when the race does not exist
    pub fn update_description(
        conn: &mut PgConnection,
        id_in: i32,
        description_in: Option<&str>,
    ) -> QueryResult<()> {
        let updated = diesel::update(races::table.find(id_in))
            .set(races::description.eq(description_in))
            .execute(conn)?;

        if updated == 0 {
            return Err(diesel::result::Error::NotFound);
        }
        Ok(())
    }

    /************ LOCKS ************/
    /// # take the advisory lock of a race
    /// session level, blocks until no other connection holds it. released by
    /// `unlock` or when the connection closes
    pub fn lock(conn: &mut PgConnection, race_in: i32) -> QueryResult<()> {
        sql_query("SELECT pg_advisory_lock($1, $2)")
            .bind::<Integer, _>(RACE_LOCK_CLASS)
            .bind::<Integer, _>(race_in)
            .execute(conn)?;
        Ok(())
    }

    pub fn unlock(conn: &mut PgConnection, race_in: i32) -> QueryResult<()> {
        sql_query("SELECT pg_advisory_unlock($1, $2)")
            .bind::<Integer, _>(RACE_LOCK_CLASS)
            .bind::<Integer, _>(race_in)
            .execute(conn)?;
        Ok(())
    }
}
