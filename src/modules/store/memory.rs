use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::errors::{AuthenticationSnafu, CustomResult, Error};
use crate::models::{NewLapTime, NewRace, NewSeason, NewUser};
use crate::modules::models::lap_time::{DerivedResult, LapTime};
use crate::modules::models::race::Race;
use crate::modules::models::season::Season;
use crate::modules::models::track::Track;
use crate::modules::models::user::User;
use crate::modules::traits::authenticator::Authenticator;
use crate::modules::traits::lap_time_store::LapTimeStore;
use crate::modules::traits::race_catalog::RaceCatalog;
use crate::modules::traits::user_directory::UserDirectory;

/// one mutual exclusion token per race.
/// `acquire` blocks while another holder has the race
#[derive(Debug, Default)]
pub struct RaceLocks {
    held: Mutex<HashSet<i32>>,
    released: Condvar,
}

impl RaceLocks {
    pub fn acquire(&self, race_id: i32) {
        let held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        let mut held = self
            .released
            .wait_while(held, |held| held.contains(&race_id))
            .unwrap_or_else(PoisonError::into_inner);
        held.insert(race_id);
    }

    pub fn release(&self, race_id: i32) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(&race_id);
        self.released.notify_all();
    }

    pub fn is_held(&self, race_id: i32) -> bool {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).contains(&race_id)
    }
}

#[derive(Debug, Default)]
struct Tables {
    lap_times: Vec<LapTime>,
    races: Vec<Race>,
    seasons: Vec<Season>,
    tracks: Vec<Track>,
    users: Vec<User>,
    next_id: HashMap<&'static str, i32>,
    derived_updates: usize,
    fail_derived_updates_after: Option<usize>,
    race_lock_holders: HashMap<i32, usize>,
    peak_race_lock_holders: HashMap<i32, usize>,
    unlocked_derived_updates: usize,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i32 {
        let id = self.next_id.entry(table).or_insert(0);
        *id += 1;
        *id
    }
}

/// in-process tables with id sequences starting at 1.
///
/// clones are handles on the same tables and the same race locks, every call
/// locks the tables only for its own duration.
///
/// writes of derived fields can be made to fail after a number of successful
/// ones, which is how a collaborator dying in the middle of a scoring pass looks.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    locks: Arc<RaceLocks>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_track(&self, name: &str) -> Track {
        let mut tables = self.tables();
        let track = Track {
            id: tables.next_id("tracks"),
            name: name.to_string(),
        };
        tables.tracks.push(track.clone());
        track
    }

    /// number of successful `update_lap_time_derived` calls so far
    pub fn derived_updates(&self) -> usize {
        self.tables().derived_updates
    }

    /// make every derived field write fail once `successful` more writes went through.
    /// `None` lifts the failure
    pub fn fail_derived_updates_after(&self, successful: Option<usize>) {
        let mut tables = self.tables();
        let written = tables.derived_updates;
        tables.fail_derived_updates_after = successful.map(|count| written + count);
    }

    pub fn lap_time(&self, lap_time_id: i32) -> Option<LapTime> {
        self.tables()
            .lap_times
            .iter()
            .find(|lap_time| lap_time.id == lap_time_id)
            .cloned()
    }

    /// the most handles that held a race's token at the same time
    pub fn peak_race_lock_holders(&self, race_id: i32) -> usize {
        self.tables().peak_race_lock_holders.get(&race_id).copied().unwrap_or(0)
    }

    /// derived field writes done while nobody held the race's token
    pub fn unlocked_derived_updates(&self) -> usize {
        self.tables().unlocked_derived_updates
    }
}

impl LapTimeStore for MemoryStore {
    fn lock_race(&mut self, race_id: i32) -> CustomResult<()> {
        self.locks.acquire(race_id);

        let mut tables = self.tables();
        let holders = tables.race_lock_holders.entry(race_id).or_insert(0);
        *holders += 1;
        let holders = *holders;
        let peak = tables.peak_race_lock_holders.entry(race_id).or_insert(0);
        *peak = (*peak).max(holders);
        Ok(())
    }

    fn unlock_race(&mut self, race_id: i32) -> CustomResult<()> {
        if let Some(holders) = self.tables().race_lock_holders.get_mut(&race_id) {
            *holders = holders.saturating_sub(1);
        }
        self.locks.release(race_id);
        Ok(())
    }

    fn list_lap_times(&mut self, race_id: i32) -> CustomResult<Vec<LapTime>> {
        Ok(self
            .tables()
            .lap_times
            .iter()
            .filter(|lap_time| lap_time.race_id == race_id)
            .cloned()
            .collect())
    }

    fn list_participant_lap_times(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Vec<LapTime>> {
        let mut lap_times: Vec<LapTime> = self
            .tables()
            .lap_times
            .iter()
            .filter(|lap_time| lap_time.participant_id == participant_id && lap_time.race_id == race_id)
            .cloned()
            .collect();
        lap_times.sort_by(|a, b| a.duration_seconds.total_cmp(&b.duration_seconds));
        Ok(lap_times)
    }

    fn find_lap_time(&mut self, participant_id: i32, race_id: i32) -> CustomResult<Option<LapTime>> {
        Ok(self
            .tables()
            .lap_times
            .iter()
            .find(|lap_time| lap_time.participant_id == participant_id && lap_time.race_id == race_id)
            .cloned())
    }

    fn insert_lap_time(&mut self, new_lap_time: NewLapTime) -> CustomResult<LapTime> {
        let mut tables = self.tables();
        let lap_time = LapTime::from_new(tables.next_id("times"), new_lap_time);
        tables.lap_times.push(lap_time.clone());
        Ok(lap_time)
    }

    fn update_lap_time_derived(&mut self, lap_time_id: i32, derived: &DerivedResult) -> CustomResult<()> {
        let mut tables = self.tables();
        if let Some(limit) = tables.fail_derived_updates_after {
            if tables.derived_updates >= limit {
                return Err(Error::DataAccessError {
                    operation: format!("updating results of time {lap_time_id}"),
                    source: "store unavailable".into(),
                });
            }
        }

        let race_id = match tables.lap_times.iter_mut().find(|lap_time| lap_time.id == lap_time_id) {
            Some(lap_time) => {
                lap_time.apply_derived(derived);
                lap_time.race_id
            }
            None => {
                return Err(Error::DataAccessError {
                    operation: format!("updating results of time {lap_time_id}"),
                    source: "no such time".into(),
                })
            }
        };

        tables.derived_updates += 1;
        if !self.locks.is_held(race_id) {
            tables.unlocked_derived_updates += 1;
        }
        Ok(())
    }

    fn list_season_lap_times(&mut self, season_id: i32) -> CustomResult<Vec<LapTime>> {
        let tables = self.tables();
        let race_ids: Vec<i32> = tables
            .races
            .iter()
            .filter(|race| race.season_id == season_id)
            .map(|race| race.id)
            .collect();

        let lap_times = tables
            .lap_times
            .iter()
            .filter(|lap_time| race_ids.contains(&lap_time.race_id))
            .cloned()
            .collect();
        Ok(lap_times)
    }
}

impl RaceCatalog for MemoryStore {
    fn list_seasons(&mut self) -> CustomResult<Vec<Season>> {
        let mut seasons = self.tables().seasons.clone();
        seasons.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(seasons)
    }

    fn find_season(&mut self, season_id: i32) -> CustomResult<Option<Season>> {
        Ok(self.tables().seasons.iter().find(|season| season.id == season_id).cloned())
    }

    fn insert_season(&mut self, new_season: NewSeason) -> CustomResult<Season> {
        let mut tables = self.tables();
        let season = Season::from_new(tables.next_id("grand_prix"), new_season);
        tables.seasons.push(season.clone());
        Ok(season)
    }

    fn list_tracks(&mut self) -> CustomResult<Vec<Track>> {
        Ok(self.tables().tracks.clone())
    }

    fn find_track(&mut self, track_id: i32) -> CustomResult<Option<Track>> {
        Ok(self.tables().tracks.iter().find(|track| track.id == track_id).cloned())
    }

    fn list_races(&mut self, season_id: i32) -> CustomResult<Vec<Race>> {
        let mut races: Vec<Race> = self
            .tables()
            .races
            .iter()
            .filter(|race| race.season_id == season_id)
            .cloned()
            .collect();
        races.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(races)
    }

    fn find_race(&mut self, race_id: i32) -> CustomResult<Option<Race>> {
        Ok(self.tables().races.iter().find(|race| race.id == race_id).cloned())
    }

    fn insert_race(&mut self, new_race: NewRace) -> CustomResult<Race> {
        let mut tables = self.tables();
        let race = Race::from_new(tables.next_id("races"), new_race);
        tables.races.push(race.clone());
        Ok(race)
    }

    fn update_race_description(&mut self, race_id: i32, description: Option<String>) -> CustomResult<()> {
        match self.tables().races.iter_mut().find(|race| race.id == race_id) {
            Some(race) => {
                race.description = description;
                Ok(())
            }
            None => Err(Error::not_found("race", race_id)),
        }
    }
}

impl UserDirectory for MemoryStore {
    fn find_user_by_username(&mut self, username: &str) -> CustomResult<Option<User>> {
        Ok(self.tables().users.iter().find(|user| user.username == username).cloned())
    }

    fn find_user_by_email(&mut self, email: &str) -> CustomResult<Option<User>> {
        Ok(self.tables().users.iter().find(|user| user.email == email).cloned())
    }

    fn insert_user(&mut self, new_user: NewUser) -> CustomResult<User> {
        let mut tables = self.tables();
        let user = User::from_new(tables.next_id("users"), new_user);
        tables.users.push(user.clone());
        Ok(user)
    }
}

/// identity provider keeping email/password pairs in memory
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    accounts: Mutex<HashMap<String, String>>,
}

impl MemoryAuthenticator {
    pub fn new() -> MemoryAuthenticator {
        MemoryAuthenticator::default()
    }
}

impl Authenticator for MemoryAuthenticator {
    fn sign_up(&self, email: &str, password: &str, _username: &str) -> CustomResult<()> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(email) {
            return AuthenticationSnafu { reason: format!("{email} is already registered") }.fail();
        }
        accounts.insert(email.to_string(), password.to_string());
        Ok(())
    }

    fn sign_in(&self, email: &str, password: &str) -> CustomResult<()> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts.get(email) {
            Some(stored) if stored == password => Ok(()),
            _ => AuthenticationSnafu { reason: "invalid email or password" }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn second_holder_waits_for_release() {
        let locks = Arc::new(RaceLocks::default());
        locks.acquire(1);

        let (acquired, on_acquired) = mpsc::channel();
        let waiting = {
            let locks = Arc::clone(&locks);
            thread::spawn(move || {
                locks.acquire(1);
                acquired.send(()).unwrap();
                locks.release(1);
            })
        };

        assert!(on_acquired.recv_timeout(Duration::from_millis(100)).is_err());
        locks.release(1);
        assert!(on_acquired.recv_timeout(Duration::from_secs(5)).is_ok());
        waiting.join().unwrap();
        assert!(!locks.is_held(1));
    }

    #[test]
    fn races_lock_independently() {
        let locks = RaceLocks::default();
        locks.acquire(1);
        locks.acquire(2);
        assert!(locks.is_held(1) && locks.is_held(2));
        locks.release(1);
        assert!(!locks.is_held(1));
        assert!(locks.is_held(2));
    }

    #[test]
    fn clones_share_tables() {
        let mut store = MemoryStore::new();
        let handle = store.clone();
        handle.add_track("Groningen");
        assert_eq!(store.list_tracks().unwrap().len(), 1);
    }
}
