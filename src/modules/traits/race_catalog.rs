use crate::errors::CustomResult;
use crate::models::{NewRace, NewSeason};
use crate::modules::models::race::Race;
use crate::modules::models::season::Season;
use crate::modules::models::track::Track;

pub trait RaceCatalog {
    /// ordered by creation
    fn list_seasons(&mut self) -> CustomResult<Vec<Season>>;

    fn find_season(&mut self, season_id: i32) -> CustomResult<Option<Season>>;

    fn insert_season(&mut self, new_season: NewSeason) -> CustomResult<Season>;

    /// ordered by id
    fn list_tracks(&mut self) -> CustomResult<Vec<Track>>;

    fn find_track(&mut self, track_id: i32) -> CustomResult<Option<Track>>;

    /// ordered by creation
    fn list_races(&mut self, season_id: i32) -> CustomResult<Vec<Race>>;

    fn find_race(&mut self, race_id: i32) -> CustomResult<Option<Race>>;

    fn insert_race(&mut self, new_race: NewRace) -> CustomResult<Race>;

    fn update_race_description(&mut self, race_id: i32, description: Option<String>) -> CustomResult<()>;
}
