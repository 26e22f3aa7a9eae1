use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::models::NewLapTime;
use crate::modules::helpers::math::Math;
use crate::schema::{races, times};

/// one participant's submitted time for one race.
/// the derived fields are `None` until the first scoring pass
#[derive(Queryable, Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct LapTime {
    pub id: i32,
    pub participant_id: i32,
    pub race_id: i32,
    pub track_id: i32,
    pub duration_seconds: f64,
    pub display_name: String,
    pub is_fastest_lap: bool,
    pub placement: Option<i32>,
    pub handicap_kg: Option<i32>,
    pub points: Option<i32>,
    pub submitted_at: NaiveDateTime,
}

/// the fields a scoring pass writes back for every row of a race
#[derive(AsChangeset, Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
#[diesel(table_name = times)]
pub struct DerivedResult {
    pub placement: i32,
    pub handicap_kg: i32,
    pub points: i32,
    #[diesel(column_name = fastest_lap)]
    pub is_fastest_lap: bool,
}

impl LapTime {
    /// build the stored row for an insert, derived fields absent
    pub fn from_new(id: i32, new_lap_time: NewLapTime) -> LapTime {
        LapTime {
            id,
            participant_id: new_lap_time.participant_id,
            race_id: new_lap_time.race_id,
            track_id: new_lap_time.track_id,
            duration_seconds: new_lap_time.duration_seconds,
            display_name: new_lap_time.display_name,
            is_fastest_lap: new_lap_time.is_fastest_lap,
            placement: None,
            handicap_kg: None,
            points: None,
            submitted_at: new_lap_time.submitted_at,
        }
    }

    pub fn centiseconds(&self) -> i64 {
        Math::to_centiseconds(self.duration_seconds)
    }

    pub fn is_scored(&self) -> bool {
        self.placement.is_some()
    }

    pub fn apply_derived(&mut self, derived: &DerivedResult) {
        self.placement = Some(derived.placement);
        self.handicap_kg = Some(derived.handicap_kg);
        self.points = Some(derived.points);
        self.is_fastest_lap = derived.is_fastest_lap;
    }

    /************ INSERTERS ************/
    /// # Insert a new lap time into the database
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `new_lap_time` - The submitted time, derived fields absent
    ///
    /// ## Returns
    /// * `LapTime` - The inserted row
    pub fn new(conn: &mut PgConnection, new_lap_time: &NewLapTime) -> QueryResult<LapTime> {
        match diesel::insert_into(times::table)
            .values(new_lap_time)
            .get_result::<LapTime>(conn) {
            Ok(lap_time) => Ok(lap_time),
            Err(error) => {
                error!(target: "models/lap_time:new", "Error inserting lap time: {}", error);
                Err(error)
            }
        }
    }

    /************ UPDATERS ************/
    /// # overwrite the derived fields of a lap time
    /// fails with `NotFound` when no row has the given id
    pub fn update_derived(conn: &mut PgConnection, id_in: i32, derived: &DerivedResult) -> QueryResult<()> {
        let updated = diesel::update(times::table.find(id_in))
            .set(derived)
            .execute(conn)?;

        if updated == 0 {
            return Err(diesel::result::Error::NotFound);
        }
        Ok(())
    }

    /************ GETTERS ************/
    /// # get all times of a race
    /// ordered by id, the scoring pass applies its own ordering
    pub fn from_race(conn: &mut PgConnection, race_in: i32) -> QueryResult<Vec<LapTime>> {
        times::table
            .filter(times::race_id.eq(race_in))
            .order(times::id.asc())
            .load::<LapTime>(conn)
    }

    /// # get the times a participant registered in a race
    pub fn from_participant_in_race(
        conn: &mut PgConnection,
        participant_in: i32,
        race_in: i32,
    ) -> QueryResult<Vec<LapTime>> {
        times::table
            .filter(times::user_id.eq(participant_in))
            .filter(times::race_id.eq(race_in))
            .order(times::time.asc())
            .load::<LapTime>(conn)
    }

    /// # find the time of a participant in a race
    /// used for the one-time-per-race check before inserting
    pub fn find_for_participant(
        conn: &mut PgConnection,
        participant_in: i32,
        race_in: i32,
    ) -> QueryResult<Option<LapTime>> {
        times::table
            .filter(times::user_id.eq(participant_in))
            .filter(times::race_id.eq(race_in))
            .first::<LapTime>(conn)
            .optional()
    }

    /// # get all times driven in a season
    /// every time of every race that belongs to the season
    pub fn from_season(conn: &mut PgConnection, season_in: i32) -> QueryResult<Vec<LapTime>> {
        times::table
            .inner_join(races::table)
            .filter(races::grand_prix_id.eq(season_in))
            .select(times::all_columns)
            .order(times::id.asc())
            .load::<LapTime>(conn)
    }
}
