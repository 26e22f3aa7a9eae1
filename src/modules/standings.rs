use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::CustomResult;
use crate::modules::models::lap_time::LapTime;
use crate::modules::traits::lap_time_store::LapTimeStore;

const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StandingsEntry {
    pub rank: usize,
    pub display_name: String,
    pub points: i32,
    pub handicap_kg: i32,
    pub races: usize,
}

pub struct Standings {}

impl Standings {
    /// # aggregate standings
    /// sum points and handicap per display name and rank by points, most first.
    /// names with equal points keep the order in which they first appear.
    /// rows that were never scored count as zero
    ///
    /// ## Arguments
    /// * `lap_times` - the times to aggregate, usually every time of a season
    ///
    /// ## Returns
    /// * `Vec<StandingsEntry>` - one entry per display name
    pub fn aggregate(lap_times: &[LapTime]) -> Vec<StandingsEntry> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<StandingsEntry> = Vec::new();

        for lap_time in lap_times {
            let name = match lap_time.display_name.trim() {
                "" => UNKNOWN_DISPLAY_NAME,
                name => name,
            };

            let position = *positions.entry(name).or_insert_with(|| {
                entries.push(StandingsEntry {
                    rank: 0,
                    display_name: name.to_string(),
                    points: 0,
                    handicap_kg: 0,
                    races: 0,
                });
                entries.len() - 1
            });

            let entry = &mut entries[position];
            entry.points += lap_time.points.unwrap_or(0);
            entry.handicap_kg += lap_time.handicap_kg.unwrap_or(0);
            entry.races += 1;
        }

        entries.sort_by(|a, b| b.points.cmp(&a.points));
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }
        entries
    }

    /// # standings of a season
    /// aggregate every time of every race in the season
    pub fn for_season<S: LapTimeStore + ?Sized>(store: &mut S, season_id: i32) -> CustomResult<Vec<StandingsEntry>> {
        let lap_times = store.list_season_lap_times(season_id)?;
        debug!(target: "standings:for_season", "aggregating {} times of season {}", lap_times.len(), season_id);
        Ok(Standings::aggregate(&lap_times))
    }
}
