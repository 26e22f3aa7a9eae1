use diesel::pg::PgConnection;
use log::{debug, error, warn};

use crate::errors::{CustomResult, Error};
use crate::macros::database_error_handeler::db_handle_error;
use crate::macros::redis::delete_keys;
use crate::models::{NewLapTime, NewRace, NewSeason, NewUser};
use crate::modules::helpers::config::Config;
use crate::modules::models::general::establish_connection;
use crate::modules::models::lap_time::{DerivedResult, LapTime};
use crate::modules::models::race::Race;
use crate::modules::models::season::Season;
use crate::modules::models::track::Track;
use crate::modules::models::user::User;
use crate::modules::redis::Redis;
use crate::modules::traits::lap_time_store::LapTimeStore;
use crate::modules::traits::race_catalog::RaceCatalog;
use crate::modules::traits::user_directory::UserDirectory;
/// cached season reads expire after this, a write back racing an invalidation
/// can only keep stale times around for so long
const SEASON_CACHE_TTL_SECONDS: usize = 300;

/// diesel backed store. season reads are cached in redis when a cache connection is present.
///
/// race tokens are postgres advisory locks, so they order scoring passes of
/// every process using the same database
pub struct PgStore {
    conn: PgConnection,
    cache: Option<redis::Connection>,
}

impl PgStore {
    /// # connect to the database
    /// connect to postgres, and to redis when `REDIS_URL` is configured.
    /// a redis that cannot be reached only disables caching
    pub fn connect(config: &Config) -> CustomResult<PgStore> {
        let conn = establish_connection(config.require_database_url()?)
            .map_err(Error::data_access("connecting to the database"))?;

        let cache = match &config.redis_url {
            Some(url) => match Redis::connect(url) {
                Ok(cache) => Some(cache),
                Err(error) => {
                    warn!(target: "store/postgres:connect", "Error connecting to redis, caching disabled: {}", error);
                    None
                }
            },
            None => None,
        };

        Ok(PgStore::from_connection(conn, cache))
    }

    pub fn from_connection(conn: PgConnection, cache: Option<redis::Connection>) -> PgStore {
        PgStore { conn, cache }
    }

    fn season_cache_key(season_id: i32) -> String {
        format!("season:{season_id}:times")
    }

    /// drop the cached reads of the season a race belongs to
    fn clear_race_cache(&mut self, race_id: i32) {
        let cache = match &mut self.cache {
            Some(cache) => cache,
            None => return,
        };

        match Race::from_id(&mut self.conn, race_id) {
            Ok(Some(race)) => {
                delete_keys!(cache, format!("season:{}:*", race.season_id), "store/postgres:clear_race_cache");
            }
            Ok(None) => {}
            Err(error) => {
                error!(target: "store/postgres:clear_race_cache", "Error getting race {} to clear its cache: {}", race_id, error);
            }
        }
    }

    fn read_season_cache(&mut self, season_id: i32) -> Option<Vec<LapTime>> {
        let cache = self.cache.as_mut()?;
        let key = PgStore::season_cache_key(season_id);

        match Redis::has_data(cache, &key) {
            Ok(true) => {}
            Ok(false) => {
                debug!(target: "store/postgres:list_season_lap_times", "cache miss for {}", key);
                return None;
            }
            Err(error) => {
                warn!(target: "store/postgres:list_season_lap_times", "Error reading cache: {}", error);
                return None;
            }
        }

        let data = match Redis::get_data::<_, String>(cache, &key) {
            Ok(data) => data,
            Err(error) => {
                warn!(target: "store/postgres:list_season_lap_times", "Error reading cache: {}", error);
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(lap_times) => Some(lap_times),
            Err(error) => {
                warn!(target: "store/postgres:list_season_lap_times", "Ignoring unreadable cache entry {}: {}", key, error);
                None
            }
        }
    }

    fn write_season_cache(&mut self, season_id: i32, lap_times: &[LapTime]) {
        let cache = match &mut self.cache {
            Some(cache) => cache,
            None => return,
        };

        let data = match serde_json::to_string(lap_times) {
            Ok(data) => data,
            Err(error) => {
                error!(target: "store/postgres:list_season_lap_times", "Error serializing times: {}", error);
                return;
            }
        };

        if let Err(error) = Redis::set_data_with_expiry(cache, PgStore::season_cache_key(season_id), data, SEASON_CACHE_TTL_SECONDS) {
            warn!(target: "store/postgres:list_season_lap_times", "Error writing cache: {}", error);
        }
    }
}

impl LapTimeStore for PgStore {
    fn lock_race(&mut self, race_id: i32) -> CustomResult<()> {
        db_handle_error!(
            Race::lock(&mut self.conn, race_id),
            "store/postgres:lock_race",
            format!("locking race {race_id}")
        );
        debug!(target: "store/postgres:lock_race", "holding the lock of race {}", race_id);
        Ok(())
    }

    /// the season cache is cleared once here instead of on every derived field write
    fn unlock_race(&mut self, race_id: i32) -> CustomResult<()> {
        self.clear_race_cache(race_id);
        db_handle_error!(
            Race::unlock(&mut self.conn, race_id),
            "store/postgres:unlock_race",
            format!("unlocking race {race_id}")
        );
        Ok(())
    }

    fn list_lap_times(&mut self, race_id: i32) -> CustomResult<Vec<LapTime>> {
        Ok(db_handle_error!(
            LapTime::from_race(&mut self.conn, race_id),
            "store/postgres:list_lap_times",
            format!("listing times of race {race_id}")
        ))
    }

    fn list_participant_lap_times(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Vec<LapTime>> {
        Ok(db_handle_error!(
            LapTime::from_participant_in_race(&mut self.conn, participant_id, race_id),
            "store/postgres:list_participant_lap_times",
            format!("listing times of participant {participant_id} in race {race_id}")
        ))
    }

    fn find_lap_time(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Option<LapTime>> {
        Ok(db_handle_error!(
            LapTime::find_for_participant(&mut self.conn, participant_id, race_id),
            "store/postgres:find_lap_time",
            format!("finding the time of participant {participant_id} in race {race_id}")
        ))
    }

    fn insert_lap_time(&mut self, new_lap_time: NewLapTime) -> CustomResult<LapTime> {
        let lap_time = db_handle_error!(
            LapTime::new(&mut self.conn, &new_lap_time),
            "store/postgres:insert_lap_time",
            format!("inserting time for race {}", new_lap_time.race_id)
        );

        self.clear_race_cache(lap_time.race_id);
        Ok(lap_time)
    }

    fn update_lap_time_derived(&mut self, lap_time_id: i32, derived: &DerivedResult) -> CustomResult<()> {
        db_handle_error!(
            LapTime::update_derived(&mut self.conn, lap_time_id, derived),
            "store/postgres:update_lap_time_derived",
            format!("updating results of time {lap_time_id}")
        );
        Ok(())
    }

    fn list_season_lap_times(&mut self, season_id: i32) -> CustomResult<Vec<LapTime>> {
        if let Some(lap_times) = self.read_season_cache(season_id) {
            return Ok(lap_times);
        }

        let lap_times = db_handle_error!(
            LapTime::from_season(&mut self.conn, season_id),
            "store/postgres:list_season_lap_times",
            format!("listing times of season {season_id}")
        );
        self.write_season_cache(season_id, &lap_times);
        Ok(lap_times)
    }
}

impl RaceCatalog for PgStore {
    fn list_seasons(&mut self) -> CustomResult<Vec<Season>> {
        Ok(db_handle_error!(Season::get_all(&mut self.conn), "store/postgres:list_seasons", "listing seasons"))
    }

    fn find_season(&mut self, season_id: i32) -> CustomResult<Option<Season>> {
        Ok(db_handle_error!(
            Season::from_id(&mut self.conn, season_id),
            "store/postgres:find_season",
            format!("getting season {season_id}")
        ))
    }

    fn insert_season(&mut self, new_season: NewSeason) -> CustomResult<Season> {
        Ok(db_handle_error!(
            Season::new(&mut self.conn, &new_season),
            "store/postgres:insert_season",
            format!("inserting season {}", new_season.name)
        ))
    }

    fn list_tracks(&mut self) -> CustomResult<Vec<Track>> {
        Ok(db_handle_error!(Track::get_all(&mut self.conn), "store/postgres:list_tracks", "listing tracks"))
    }

    fn find_track(&mut self, track_id: i32) -> CustomResult<Option<Track>> {
        Ok(db_handle_error!(
            Track::from_id(&mut self.conn, track_id),
            "store/postgres:find_track",
            format!("getting track {track_id}")
        ))
    }

    fn list_races(&mut self, season_id: i32) -> CustomResult<Vec<Race>> {
        Ok(db_handle_error!(
            Race::from_season(&mut self.conn, season_id),
            "store/postgres:list_races",
            format!("listing races of season {season_id}")
        ))
    }

    fn find_race(&mut self, race_id: i32) -> CustomResult<Option<Race>> {
        Ok(db_handle_error!(
            Race::from_id(&mut self.conn, race_id),
            "store/postgres:find_race",
            format!("getting race {race_id}")
        ))
    }

    fn insert_race(&mut self, new_race: NewRace) -> CustomResult<Race> {
        Ok(db_handle_error!(
            Race::new(&mut self.conn, &new_race),
            "store/postgres:insert_race",
            format!("inserting race {}", new_race.name)
        ))
    }

    fn update_race_description(&mut self, race_id: i32, description: Option<String>) -> CustomResult<()> {
        match Race::update_description(&mut self.conn, race_id, description.as_deref()) {
            Ok(()) => Ok(()),
            Err(diesel::result::Error::NotFound) => Err(Error::not_found("race", race_id)),
            Err(error) => {
                error!(target: "store/postgres:update_race_description", "Error updating description of race {}: {}", race_id, error);
                Err(Error::data_access("updating a race description")(error))
            }
        }
    }
}

impl UserDirectory for PgStore {
    fn find_user_by_username(&mut self, username: &str) -> CustomResult<Option<User>> {
        Ok(db_handle_error!(
            User::from_username(&mut self.conn, username),
            "store/postgres:find_user_by_username",
            format!("getting user {username}")
        ))
    }

    fn find_user_by_email(&mut self, email: &str) -> CustomResult<Option<User>> {
        Ok(db_handle_error!(
            User::from_email(&mut self.conn, email),
            "store/postgres:find_user_by_email",
            format!("getting user with email {email}")
        ))
    }

    fn insert_user(&mut self, new_user: NewUser) -> CustomResult<User> {
        Ok(db_handle_error!(
            User::new(&mut self.conn, &new_user),
            "store/postgres:insert_user",
            format!("inserting user {}", new_user.username)
        ))
    }
}
