mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use grand_prix_times::errors::Error;
use grand_prix_times::modules::leaderboard::{personal_times, Leaderboard};
use grand_prix_times::modules::scoring::{FastestLapPolicy, ResultsEngine};
use grand_prix_times::modules::submission::{submit_lap_time, submit_lap_time_at, SubmitLapTime};
use grand_prix_times::modules::traits::lap_time_store::LapTimeStore;

use common::{at, participant, season_with_races};

fn submission(race_id: i32, time: &str) -> SubmitLapTime {
    SubmitLapTime {
        race_id,
        time: time.to_string(),
        declared_fastest_lap: false,
    }
}

#[test]
fn submitting_scores_the_whole_race() {
    let (mut store, races) = season_with_races(1);
    let race_id = races[0].id;
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");
    let lewis = participant(&mut store, "lewis");

    let results = submit_lap_time(&max, &mut store, &engine, &submission(race_id, " 1:23.45 ")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].duration_seconds, 83.45);
    assert_eq!(results[0].derived.points, 16);

    let results = submit_lap_time(&lewis, &mut store, &engine, &submission(race_id, "1:22.00")).unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["lewis", "max"]);
    assert_eq!(results[1].derived.points, 13);

    let stored = store.list_lap_times(race_id).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|row| row.is_scored() && row.track_id == races[0].track_id));
}

#[test]
fn second_submission_is_rejected_without_scoring() {
    let (mut store, races) = season_with_races(1);
    let race_id = races[0].id;
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");

    submit_lap_time(&max, &mut store, &engine, &submission(race_id, "1:23.45")).unwrap();
    let updates = store.derived_updates();

    let error = submit_lap_time(&max, &mut store, &engine, &submission(race_id, "1:20.00")).unwrap_err();
    match error {
        Error::DuplicateSubmissionError { participant_id, race_id: rejected_race } => {
            assert_eq!(participant_id, max.user_id);
            assert_eq!(rejected_race, race_id);
        }
        other => panic!("expected DuplicateSubmissionError, got {other:?}"),
    }

    assert_eq!(store.derived_updates(), updates);
    assert_eq!(store.list_lap_times(race_id).unwrap().len(), 1);
}

#[test]
fn same_participant_may_enter_every_race() {
    let (mut store, races) = season_with_races(2);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");

    for race in &races {
        submit_lap_time(&max, &mut store, &engine, &submission(race.id, "1:23.45")).unwrap();
    }
}

#[test]
fn malformed_time_writes_nothing() {
    let (mut store, races) = season_with_races(1);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");

    let error = submit_lap_time(&max, &mut store, &engine, &submission(races[0].id, "83.45")).unwrap_err();
    assert!(matches!(error, Error::InvalidFormatError { .. }));
    assert!(store.list_lap_times(races[0].id).unwrap().is_empty());
}

#[test]
fn unknown_race_is_not_found() {
    let (mut store, _) = season_with_races(1);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");

    let error = submit_lap_time(&max, &mut store, &engine, &submission(99, "1:23.45")).unwrap_err();
    assert!(matches!(error, Error::NotFoundError { .. }));
}

#[test]
fn declared_fastest_lap_only_counts_under_self_declared_policy() {
    let (mut store, races) = season_with_races(2);
    let max = participant(&mut store, "max");
    let lewis = participant(&mut store, "lewis");

    let declared = |race_id: i32, time: &str| SubmitLapTime {
        race_id,
        time: time.to_string(),
        declared_fastest_lap: true,
    };

    let derived = ResultsEngine::new(FastestLapPolicy::Derived);
    submit_lap_time(&max, &mut store, &derived, &submission(races[0].id, "1:20.00")).unwrap();
    let results = submit_lap_time(&lewis, &mut store, &derived, &declared(races[0].id, "1:30.00")).unwrap();
    assert!(results[0].derived.is_fastest_lap);
    assert!(!results[1].derived.is_fastest_lap);

    let self_declared = ResultsEngine::new(FastestLapPolicy::SelfDeclared);
    submit_lap_time(&max, &mut store, &self_declared, &submission(races[1].id, "1:20.00")).unwrap();
    let results = submit_lap_time(&lewis, &mut store, &self_declared, &declared(races[1].id, "1:30.00")).unwrap();
    assert_eq!(results[0].derived.points, 15);
    assert!(!results[0].derived.is_fastest_lap);
    assert_eq!(results[1].derived.points, 14);
    assert!(results[1].derived.is_fastest_lap);
}

#[test]
fn leaderboard_and_personal_times_follow_the_scoring() {
    let (mut store, races) = season_with_races(1);
    let race_id = races[0].id;
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");
    let lewis = participant(&mut store, "lewis");

    submit_lap_time_at(&max, &mut store, &engine, &submission(race_id, "1:24.95"), at(1)).unwrap();
    submit_lap_time_at(&lewis, &mut store, &engine, &submission(race_id, "1:23.45"), at(2)).unwrap();

    let lines: Vec<String> = Leaderboard::for_race(&mut store, race_id)
        .unwrap()
        .iter()
        .map(|entry| entry.line())
        .collect();
    assert_eq!(
        lines,
        vec![
            "1. lewis — 1:23.45 | handicap +20kg | 16p 🏁".to_string(),
            "2. max — 1:24.95 (+1.50s) | handicap +10kg | 13p".to_string(),
        ]
    );

    assert_eq!(personal_times(&max, &mut store, race_id).unwrap(), vec!["1:24.95 (P2, 10kg)".to_string()]);
    assert!(personal_times(&max, &mut store, race_id + 1).unwrap().is_empty());
}

#[test]
fn parallel_submissions_take_turns_on_the_race() {
    let (mut store, races) = season_with_races(1);
    let race_id = races[0].id;
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let sessions: Vec<_> = (0..8).map(|n| participant(&mut store, &format!("driver{n}"))).collect();
    let start = Arc::new(Barrier::new(sessions.len()));

    // every thread has its own handle, the tables are only locked per call
    let handles: Vec<_> = sessions
        .into_iter()
        .enumerate()
        .map(|(n, session)| {
            let mut store = store.clone();
            let start = Arc::clone(&start);
            thread::spawn(move || {
                start.wait();
                let time = format!("1:{:02}.00", 20 + n);
                submit_lap_time(&session, &mut store, &engine, &submission(race_id, &time)).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.peak_race_lock_holders(race_id), 1);
    assert_eq!(store.unlocked_derived_updates(), 0);

    let rows = Leaderboard::for_race(&mut store, race_id).unwrap();
    let positions: Vec<usize> = rows.iter().map(|row| row.position).collect();
    assert_eq!(positions, (1..=8).collect::<Vec<_>>());
    assert_eq!(rows[0].display_name, "driver0");
    assert_eq!(rows[0].points, 16);
    assert_eq!(rows[7].points, 0);

    let lap_times = store.list_lap_times(race_id).unwrap();
    let mut placements: Vec<i32> = lap_times.iter().filter_map(|lap_time| lap_time.placement).collect();
    placements.sort();
    assert_eq!(placements, (1..=8).collect::<Vec<_>>());
}
