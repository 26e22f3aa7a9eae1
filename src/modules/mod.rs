pub mod catalog;
pub mod leaderboard;
pub mod redis;
pub mod scoring;
pub mod session;
pub mod standings;
pub mod submission;

pub mod models {
    pub mod general;
    pub mod lap_time;
    pub mod race;
    pub mod season;
    pub mod track;
    pub mod user;
}

pub mod helpers {
    pub mod config;
    pub mod logging;
    pub mod math;
    pub mod time_codec;
}

pub mod traits {
    pub mod authenticator;
    pub mod lap_time_store;
    pub mod race_catalog;
    pub mod user_directory;
}

pub mod store {
    pub mod memory;
    pub mod postgres;
}
