use crate::errors::CustomResult;
use crate::models::NewLapTime;
use crate::modules::models::lap_time::{DerivedResult, LapTime};

/// persistence of submitted times.
///
/// the scoring pass only needs `list_lap_times`, `update_lap_time_derived` and
/// the race lock, the rest is used by the submission flow and the read side.
/// every failure is reported as `Error::DataAccessError`.
pub trait LapTimeStore {
    /// take the race's mutual exclusion token, blocking until it is free.
    /// the token is shared by every handle on the same storage, so two passes
    /// on one race never interleave. held until `unlock_race`
    fn lock_race(&mut self, race_id: i32) -> CustomResult<()>;

    /// give the race's token back. called after every `lock_race`, also when
    /// the work done under it failed
    fn unlock_race(&mut self, race_id: i32) -> CustomResult<()>;

    /// all times of a race, in no particular order
    fn list_lap_times(&mut self, race_id: i32) -> CustomResult<Vec<LapTime>>;

    fn list_participant_lap_times(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Vec<LapTime>>;

    fn find_lap_time(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Option<LapTime>>;

    fn insert_lap_time(&mut self, new_lap_time: NewLapTime) -> CustomResult<LapTime>;

    fn update_lap_time_derived(&mut self, lap_time_id: i32, derived: &DerivedResult) -> CustomResult<()>;

    /// every time of every race in the season
    fn list_season_lap_times(&mut self, season_id: i32) -> CustomResult<Vec<LapTime>>;
}
