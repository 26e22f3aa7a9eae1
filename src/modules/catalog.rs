use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error, MissingFieldSnafu};
use crate::models::{NewRace, NewSeason};
use crate::modules::models::race::Race;
use crate::modules::models::season::Season;
use crate::modules::session::SessionContext;
use crate::modules::traits::race_catalog::RaceCatalog;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewRaceRequest {
    pub season_id: i32,
    pub track_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// trimmed, empty becomes absent
fn optional_text(text: &str) -> Option<String> {
    match text.trim() {
        "" => None,
        text => Some(text.to_string()),
    }
}

/// # create a season
/// admin only
///
/// ## Arguments
/// * `session` - must belong to an admin
/// * `catalog` - where seasons are stored
/// * `name` - required
/// * `description` - optional, empty means none
pub fn create_season<C: RaceCatalog + ?Sized>(
    session: &SessionContext,
    catalog: &mut C,
    name: &str,
    description: &str,
) -> CustomResult<Season> {
    session.require_admin("create a season")?;

    let name = match optional_text(name) {
        Some(name) => name,
        None => return MissingFieldSnafu { field: "season name" }.fail(),
    };

    let season = catalog.insert_season(NewSeason {
        name,
        description: optional_text(description),
        created_at: Utc::now().naive_utc(),
    })?;

    info!(target: "catalog:create_season", "{} created season {}", session.username, season.name);
    Ok(season)
}

/// # create a race
/// admin only. the season and the track have to exist
pub fn create_race<C: RaceCatalog + ?Sized>(
    session: &SessionContext,
    catalog: &mut C,
    request: &NewRaceRequest,
) -> CustomResult<Race> {
    session.require_admin("create a race")?;

    let name = match optional_text(&request.name) {
        Some(name) => name,
        None => return MissingFieldSnafu { field: "race name" }.fail(),
    };

    if catalog.find_season(request.season_id)?.is_none() {
        return Err(Error::not_found("season", request.season_id));
    }
    if catalog.find_track(request.track_id)?.is_none() {
        return Err(Error::not_found("track", request.track_id));
    }

    let race = catalog.insert_race(NewRace {
        season_id: request.season_id,
        track_id: request.track_id,
        name,
        description: optional_text(&request.description),
        created_at: Utc::now().naive_utc(),
    })?;

    info!(target: "catalog:create_race", "{} created race {} in season {}", session.username, race.name, race.season_id);
    Ok(race)
}

/// # edit a race description
/// admin only. an empty description removes it
pub fn update_race_description<C: RaceCatalog + ?Sized>(
    session: &SessionContext,
    catalog: &mut C,
    race_id: i32,
    description: &str,
) -> CustomResult<()> {
    session.require_admin("edit a race description")?;
    catalog.update_race_description(race_id, optional_text(description))?;

    info!(target: "catalog:update_race_description", "{} updated the description of race {}", session.username, race_id);
    Ok(())
}
