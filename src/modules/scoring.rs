use std::fmt;
use std::str::FromStr;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, InvalidConfigSnafu};
use crate::modules::helpers::config::Config;
use crate::modules::models::lap_time::{DerivedResult, LapTime};
use crate::modules::traits::lap_time_store::LapTimeStore;

/// points for placements 1 to 4, everyone behind them scores 0
pub const POINTS_BY_PLACEMENT: [i32; 4] = [15, 13, 11, 10];
/// handicap in kg for placements 1 to 3, everyone behind them carries 0
pub const HANDICAP_KG_BY_PLACEMENT: [i32; 3] = [20, 10, 5];
pub const FASTEST_LAP_BONUS: i32 = 1;

/// who decides which rows hold the fastest lap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FastestLapPolicy {
    /// every row at the race's minimum duration
    Derived,
    /// whatever the submitter declared when entering the time
    SelfDeclared,
}

impl FromStr for FastestLapPolicy {
    type Err = crate::errors::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "derived" => Ok(FastestLapPolicy::Derived),
            "self-declared" | "self_declared" => Ok(FastestLapPolicy::SelfDeclared),
            _ => InvalidConfigSnafu { key: "FASTEST_LAP_POLICY", value }.fail(),
        }
    }
}

impl fmt::Display for FastestLapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FastestLapPolicy::Derived => write!(f, "derived"),
            FastestLapPolicy::SelfDeclared => write!(f, "self-declared"),
        }
    }
}

/// one scored row of a race
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RaceResult {
    pub lap_time_id: i32,
    pub participant_id: i32,
    pub display_name: String,
    pub duration_seconds: f64,
    pub derived: DerivedResult,
}

pub fn points_for_placement(placement: i32) -> i32 {
    table_value(&POINTS_BY_PLACEMENT, placement)
}

pub fn handicap_kg_for_placement(placement: i32) -> i32 {
    table_value(&HANDICAP_KG_BY_PLACEMENT, placement)
}

fn table_value(table: &[i32], placement: i32) -> i32 {
    usize::try_from(placement - 1)
        .ok()
        .and_then(|index| table.get(index).copied())
        .unwrap_or(0)
}

/// # order the times of a race
/// fastest first. equal times are ordered by submission time, then by row id.
/// the sort is stable so rows that are equal on all three keep their input order
pub fn order_lap_times(lap_times: &mut [LapTime]) {
    lap_times.sort_by(|a, b| {
        a.centiseconds()
            .cmp(&b.centiseconds())
            .then(a.submitted_at.cmp(&b.submitted_at))
            .then(a.id.cmp(&b.id))
    });
}

/// # score the times of a race
/// compute placement, handicap, points and fastest lap flag for every row.
/// pure function of the rows passed in, the input order only matters for full ties.
///
/// ## Arguments
/// * `lap_times` - every time registered for one race
/// * `policy` - how the fastest lap flag is decided
///
/// ## Returns
/// * `Vec<RaceResult>` - one result per row, in placement order
pub fn score_lap_times(lap_times: &[LapTime], policy: FastestLapPolicy) -> Vec<RaceResult> {
    let mut ordered = lap_times.to_vec();
    order_lap_times(&mut ordered);

    let fastest = ordered.first().map(LapTime::centiseconds);

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, lap_time)| {
            let placement = index as i32 + 1;
            let is_fastest_lap = match policy {
                FastestLapPolicy::Derived => Some(lap_time.centiseconds()) == fastest,
                FastestLapPolicy::SelfDeclared => lap_time.is_fastest_lap,
            };

            let mut points = points_for_placement(placement);
            if is_fastest_lap {
                points += FASTEST_LAP_BONUS;
            }

            RaceResult {
                lap_time_id: lap_time.id,
                participant_id: lap_time.participant_id,
                display_name: lap_time.display_name,
                duration_seconds: lap_time.duration_seconds,
                derived: DerivedResult {
                    placement,
                    handicap_kg: handicap_kg_for_placement(placement),
                    points,
                    is_fastest_lap,
                },
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct ResultsEngine {
    policy: FastestLapPolicy,
}

impl ResultsEngine {
    pub fn new(policy: FastestLapPolicy) -> ResultsEngine {
        ResultsEngine { policy }
    }

    pub fn from_config(config: &Config) -> ResultsEngine {
        ResultsEngine::new(config.fastest_lap_policy)
    }

    pub fn policy(&self) -> FastestLapPolicy {
        self.policy
    }

    pub fn score(&self, lap_times: &[LapTime]) -> Vec<RaceResult> {
        score_lap_times(lap_times, self.policy)
    }

    /// # run `f` while holding the race's token
    /// the token is taken from the store, so it is shared with every other
    /// handle on the same storage. it is given back whether `f` succeeds or not,
    /// the error of `f` wins over an error giving the token back
    pub fn with_race_locked<S, T, F>(&self, store: &mut S, race_id: i32, f: F) -> CustomResult<T>
    where
        S: LapTimeStore + ?Sized,
        F: FnOnce(&mut S) -> CustomResult<T>,
    {
        if let Err(error) = store.lock_race(race_id) {
            error!(target: "scoring:with_race_locked", "Error locking race {}: {}", race_id, error);
            return Err(error);
        }

        let result = f(&mut *store);

        match (result, store.unlock_race(race_id)) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(unlock_error)) => {
                error!(target: "scoring:with_race_locked", "Error unlocking race {}: {}", race_id, unlock_error);
                Err(error)
            }
            (Ok(_), Err(unlock_error)) => {
                error!(target: "scoring:with_race_locked", "Error unlocking race {}: {}", race_id, unlock_error);
                Err(unlock_error)
            }
        }
    }

    /// # recalculate the results of a race
    /// read every time of the race, score them and write the derived fields of
    /// every row back, changed or not. running it again on the same rows writes
    /// the same values.
    ///
    /// when a write fails the rows before it are already updated, the caller
    /// should run the whole pass again.
    ///
    /// the pass holds the race's token from the store for its whole duration.
    /// that only orders it against other passes and submissions that take the
    /// same token: rows written straight into the database, or through a store
    /// on different storage, can still interleave with it.
    ///
    /// ## Arguments
    /// * `store` - where the times of the race live
    /// * `race_id` - the race to recalculate
    ///
    /// ## Returns
    /// * `Vec<RaceResult>` - the results written, in placement order
    pub fn recalculate_race<S: LapTimeStore + ?Sized>(
        &self,
        store: &mut S,
        race_id: i32,
    ) -> CustomResult<Vec<RaceResult>> {
        self.with_race_locked(store, race_id, |store| self.recalculate_race_locked(store, race_id))
    }

    /// the pass itself, the caller must hold the race's token
    pub(crate) fn recalculate_race_locked<S: LapTimeStore + ?Sized>(
        &self,
        store: &mut S,
        race_id: i32,
    ) -> CustomResult<Vec<RaceResult>> {
        let lap_times = match store.list_lap_times(race_id) {
            Ok(lap_times) => lap_times,
            Err(error) => {
                error!(target: "scoring:recalculate_race", "Error listing times of race {}: {}", race_id, error);
                return Err(error);
            }
        };

        if lap_times.is_empty() {
            debug!(target: "scoring:recalculate_race", "race {} has no times, nothing to score", race_id);
            return Ok(Vec::new());
        }

        let results = self.score(&lap_times);
        for (written, result) in results.iter().enumerate() {
            if let Err(error) = store.update_lap_time_derived(result.lap_time_id, &result.derived) {
                error!(target: "scoring:recalculate_race",
                    "Error writing results of race {} after {} of {} rows: {}",
                    race_id, written, results.len(), error);
                return Err(error);
            }
        }

        info!(target: "scoring:recalculate_race", "scored {} times of race {} ({} fastest lap policy)",
            results.len(), race_id, self.policy);
        Ok(results)
    }
}
