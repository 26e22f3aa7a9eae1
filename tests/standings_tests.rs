mod common;

use grand_prix_times::modules::catalog::create_season;
use grand_prix_times::modules::scoring::{FastestLapPolicy, ResultsEngine};
use grand_prix_times::modules::session::SessionContext;
use grand_prix_times::modules::standings::{Standings, StandingsEntry};
use grand_prix_times::modules::store::memory::MemoryStore;
use grand_prix_times::modules::submission::{submit_lap_time, SubmitLapTime};

use common::{admin, insert_time, participant, season_with_races};

fn submit(
    store: &mut MemoryStore,
    engine: &ResultsEngine,
    session: &SessionContext,
    race_id: i32,
    time: &str,
) {
    let submission = SubmitLapTime {
        race_id,
        time: time.to_string(),
        declared_fastest_lap: false,
    };
    submit_lap_time(session, store, engine, &submission).unwrap();
}

#[test]
fn sums_points_over_a_season() {
    let (mut store, races) = season_with_races(2);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");
    let lewis = participant(&mut store, "lewis");
    let charles = participant(&mut store, "charles");

    submit(&mut store, &engine, &max, races[0].id, "1:20.00");
    submit(&mut store, &engine, &lewis, races[0].id, "1:21.00");
    submit(&mut store, &engine, &charles, races[0].id, "1:22.00");
    submit(&mut store, &engine, &lewis, races[1].id, "1:19.00");
    submit(&mut store, &engine, &charles, races[1].id, "1:21.00");
    submit(&mut store, &engine, &max, races[1].id, "1:25.00");

    let season_id = races[0].season_id;
    let standings = Standings::for_season(&mut store, season_id).unwrap();
    assert_eq!(
        standings,
        vec![
            StandingsEntry { rank: 1, display_name: "lewis".into(), points: 13 + 16, handicap_kg: 10 + 20, races: 2 },
            StandingsEntry { rank: 2, display_name: "max".into(), points: 16 + 11, handicap_kg: 20 + 5, races: 2 },
            StandingsEntry { rank: 3, display_name: "charles".into(), points: 11 + 13, handicap_kg: 5 + 10, races: 2 },
        ]
    );
}

#[test]
fn equal_points_keep_first_appearance_order() {
    let (mut store, races) = season_with_races(2);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");
    let lewis = participant(&mut store, "lewis");

    submit(&mut store, &engine, &max, races[0].id, "1:20.00");
    submit(&mut store, &engine, &lewis, races[1].id, "1:20.00");

    let names: Vec<String> = Standings::for_season(&mut store, races[0].season_id)
        .unwrap()
        .into_iter()
        .map(|entry| entry.display_name)
        .collect();
    assert_eq!(names, vec!["max".to_string(), "lewis".to_string()]);
}

#[test]
fn unscored_rows_count_as_zero_and_blank_names_are_unknown() {
    let (mut store, races) = season_with_races(1);
    insert_time(&mut store, races[0].id, 1, "", "1:20.00", 1);

    let standings = Standings::for_season(&mut store, races[0].season_id).unwrap();
    assert_eq!(
        standings,
        vec![StandingsEntry { rank: 1, display_name: "Unknown".into(), points: 0, handicap_kg: 0, races: 1 }]
    );
}

#[test]
fn other_seasons_do_not_leak_in() {
    let (mut store, races) = season_with_races(1);
    let engine = ResultsEngine::new(FastestLapPolicy::Derived);
    let max = participant(&mut store, "max");
    submit(&mut store, &engine, &max, races[0].id, "1:20.00");

    let empty_season = create_season(&admin(), &mut store, "Winter Cup", "indoor").unwrap();
    assert!(Standings::for_season(&mut store, empty_season.id).unwrap().is_empty());
    assert_eq!(Standings::for_season(&mut store, races[0].season_id).unwrap().len(), 1);
}

#[test]
fn empty_input_gives_empty_standings() {
    assert!(Standings::aggregate(&[]).is_empty());
}
