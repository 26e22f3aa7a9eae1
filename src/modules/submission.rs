use chrono::{NaiveDateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, DuplicateSubmissionSnafu, Error};
use crate::models::NewLapTime;
use crate::modules::helpers::time_codec::TimeCodec;
use crate::modules::scoring::{FastestLapPolicy, RaceResult, ResultsEngine};
use crate::modules::session::SessionContext;
use crate::modules::traits::lap_time_store::LapTimeStore;
use crate::modules::traits::race_catalog::RaceCatalog;

/// a time as entered by a participant
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubmitLapTime {
    pub race_id: i32,
    /// `M:SS.CC`, surrounding whitespace is ignored
    pub time: String,
    /// only used under the self-declared fastest lap policy
    #[serde(default)]
    pub declared_fastest_lap: bool,
}

/// # submit a lap time
/// register the session user's time for a race and rescore the whole race.
///
/// nothing is written when the time does not parse, the race does not exist or
/// the user already has a time in the race. the duplicate check, insert and
/// scoring pass run while holding the race's token.
///
/// ## Arguments
/// * `session` - the participant submitting
/// * `store` - times and races
/// * `engine` - the results engine
/// * `submission` - the race and the time as typed
///
/// ## Returns
/// * `Vec<RaceResult>` - the race's results after the new time
pub fn submit_lap_time<S>(
    session: &SessionContext,
    store: &mut S,
    engine: &ResultsEngine,
    submission: &SubmitLapTime,
) -> CustomResult<Vec<RaceResult>>
where
    S: LapTimeStore + RaceCatalog + ?Sized,
{
    submit_lap_time_at(session, store, engine, submission, Utc::now().naive_utc())
}

/// `submit_lap_time` with an explicit submission timestamp
pub fn submit_lap_time_at<S>(
    session: &SessionContext,
    store: &mut S,
    engine: &ResultsEngine,
    submission: &SubmitLapTime,
    submitted_at: NaiveDateTime,
) -> CustomResult<Vec<RaceResult>>
where
    S: LapTimeStore + RaceCatalog + ?Sized,
{
    let race_id = submission.race_id;
    let duration_seconds = match TimeCodec::parse(submission.time.trim()) {
        Ok(duration_seconds) => duration_seconds,
        Err(error) => {
            warn!(target: "submission:submit_lap_time", "{} entered an invalid time: {}", session.username, error);
            return Err(error);
        }
    };

    let race = match store.find_race(race_id)? {
        Some(race) => race,
        None => return Err(Error::not_found("race", race_id)),
    };

    let is_fastest_lap = match engine.policy() {
        FastestLapPolicy::Derived => false,
        FastestLapPolicy::SelfDeclared => submission.declared_fastest_lap,
    };

    engine.with_race_locked(store, race_id, |store| {
        if store.find_lap_time(session.user_id, race_id)?.is_some() {
            warn!(target: "submission:submit_lap_time", "{} already has a time in race {}", session.username, race_id);
            return DuplicateSubmissionSnafu { participant_id: session.user_id, race_id }.fail();
        }

        let lap_time = store.insert_lap_time(NewLapTime {
            participant_id: session.user_id,
            race_id,
            track_id: race.track_id,
            duration_seconds,
            display_name: session.display_name(),
            is_fastest_lap,
            submitted_at,
        })?;
        info!(target: "submission:submit_lap_time", "{} registered {} in race {}",
            lap_time.display_name, TimeCodec::format(lap_time.duration_seconds), race_id);

        engine.recalculate_race_locked(store, race_id)
    })
}
