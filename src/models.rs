use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::*;


#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = grand_prix)]
pub struct NewSeason {
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = races)]
pub struct NewRace {
    #[diesel(column_name = grand_prix_id)]
    pub season_id: i32,
    pub track_id: i32,
    #[diesel(column_name = race_name)]
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// a submitted time before its first scoring pass.
/// placement, handicap and points are left NULL
#[derive(Insertable, Serialize, Debug, Clone, Deserialize, PartialEq)]
#[diesel(table_name = times)]
pub struct NewLapTime {
    #[diesel(column_name = user_id)]
    pub participant_id: i32,
    pub race_id: i32,
    pub track_id: i32,
    #[diesel(column_name = time)]
    pub duration_seconds: f64,
    #[diesel(column_name = username)]
    pub display_name: String,
    #[diesel(column_name = fastest_lap)]
    pub is_fastest_lap: bool,
    #[diesel(column_name = created_at)]
    pub submitted_at: chrono::NaiveDateTime,
}
