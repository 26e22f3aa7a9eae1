#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use grand_prix_times::models::{NewLapTime, NewUser};
use grand_prix_times::modules::catalog::{create_race, create_season, NewRaceRequest};
use grand_prix_times::modules::helpers::time_codec::TimeCodec;
use grand_prix_times::modules::models::race::Race;
use grand_prix_times::modules::session::SessionContext;
use grand_prix_times::modules::store::memory::MemoryStore;
use grand_prix_times::modules::traits::lap_time_store::LapTimeStore;
use grand_prix_times::modules::traits::user_directory::UserDirectory;

pub fn at(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(18, minute, 0))
        .unwrap()
}

pub fn admin() -> SessionContext {
    SessionContext {
        user_id: 1000,
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        is_admin: true,
    }
}

pub fn participant(store: &mut MemoryStore, username: &str) -> SessionContext {
    let user = store
        .insert_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            is_admin: false,
        })
        .unwrap();
    SessionContext {
        user_id: user.id,
        username: user.username,
        email: user.email,
        is_admin: user.is_admin,
    }
}

/// a store holding one season on one track with `races` races
pub fn season_with_races(races: usize) -> (MemoryStore, Vec<Race>) {
    let mut store = MemoryStore::new();
    let track = store.add_track("Groningen");
    let season = create_season(&admin(), &mut store, "Summer Cup", "").unwrap();

    let races = (1..=races)
        .map(|number| {
            create_race(
                &admin(),
                &mut store,
                &NewRaceRequest {
                    season_id: season.id,
                    track_id: track.id,
                    name: format!("Race {number}"),
                    description: String::new(),
                },
            )
            .unwrap()
        })
        .collect();

    (store, races)
}

/// insert an unscored time straight into the store
pub fn insert_time(store: &mut MemoryStore, race_id: i32, participant_id: i32, name: &str, time: &str, minute: u32) -> i32 {
    store
        .insert_lap_time(NewLapTime {
            participant_id,
            race_id,
            track_id: 1,
            duration_seconds: TimeCodec::parse(time).unwrap(),
            display_name: name.to_string(),
            is_fastest_lap: false,
            submitted_at: at(minute),
        })
        .unwrap()
        .id
}
