use serde::{Deserialize, Serialize};

use crate::errors::CustomResult;
use crate::modules::helpers::time_codec::TimeCodec;
use crate::modules::models::lap_time::LapTime;
use crate::modules::scoring::order_lap_times;
use crate::modules::session::SessionContext;
use crate::modules::traits::lap_time_store::LapTimeStore;

pub const FASTEST_LAP_MARKER: &str = "🏁";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub display_name: String,
    pub duration_seconds: f64,
    pub time: String,
    /// empty for the winner
    pub gap: String,
    pub handicap_kg: i32,
    pub points: i32,
    pub is_fastest_lap: bool,
}

impl LeaderboardEntry {
    /// `1. Max — 1:23.45 | handicap +20kg | 16p 🏁`
    pub fn line(&self) -> String {
        let gap = if self.gap.is_empty() {
            String::new()
        } else {
            format!(" ({})", self.gap)
        };
        let marker = if self.is_fastest_lap {
            format!(" {FASTEST_LAP_MARKER}")
        } else {
            String::new()
        };

        format!(
            "{}. {} — {}{} | handicap +{}kg | {}p{}",
            self.position, self.display_name, self.time, gap, self.handicap_kg, self.points, marker
        )
    }
}

pub struct Leaderboard {}

impl Leaderboard {
    /// # build a leaderboard
    /// order the times of one race like the scoring pass does and attach the
    /// formatted time and the gap to the winner. unscored rows show zero points
    pub fn from_lap_times(lap_times: &[LapTime]) -> Vec<LeaderboardEntry> {
        let mut ordered = lap_times.to_vec();
        order_lap_times(&mut ordered);

        let winner = match ordered.first() {
            Some(winner) => winner.duration_seconds,
            None => return Vec::new(),
        };

        ordered
            .into_iter()
            .enumerate()
            .map(|(index, lap_time)| LeaderboardEntry {
                position: index + 1,
                time: TimeCodec::format(lap_time.duration_seconds),
                gap: TimeCodec::format_gap(lap_time.duration_seconds, winner),
                duration_seconds: lap_time.duration_seconds,
                display_name: lap_time.display_name,
                handicap_kg: lap_time.handicap_kg.unwrap_or(0),
                points: lap_time.points.unwrap_or(0),
                is_fastest_lap: lap_time.is_fastest_lap,
            })
            .collect()
    }

    pub fn for_race<S: LapTimeStore + ?Sized>(store: &mut S, race_id: i32) -> CustomResult<Vec<LeaderboardEntry>> {
        Ok(Leaderboard::from_lap_times(&store.list_lap_times(race_id)?))
    }
}

/// `1:23.45 (P1, 20kg) 🏁`, the handicap is left out when it is zero
pub fn personal_time_line(lap_time: &LapTime) -> String {
    let placement = match lap_time.placement {
        Some(placement) => placement.to_string(),
        None => "-".to_string(),
    };
    let handicap = match lap_time.handicap_kg {
        Some(handicap_kg) if handicap_kg > 0 => format!(", {handicap_kg}kg"),
        _ => String::new(),
    };
    let marker = if lap_time.is_fastest_lap {
        format!(" {FASTEST_LAP_MARKER}")
    } else {
        String::new()
    };

    format!("{} (P{}{}){}", TimeCodec::format(lap_time.duration_seconds), placement, handicap, marker)
}

/// # the session user's own times in a race
/// fastest first, formatted with `personal_time_line`
pub fn personal_times<S: LapTimeStore + ?Sized>(
    session: &SessionContext,
    store: &mut S,
    race_id: i32,
) -> CustomResult<Vec<String>> {
    let mut lap_times = store.list_participant_lap_times(session.user_id, race_id)?;
    order_lap_times(&mut lap_times);
    Ok(lap_times.iter().map(personal_time_line).collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn lap_time(id: i32, name: &str, duration_seconds: f64) -> LapTime {
        LapTime {
            id,
            participant_id: id,
            race_id: 1,
            track_id: 1,
            duration_seconds,
            display_name: name.to_string(),
            is_fastest_lap: false,
            placement: None,
            handicap_kg: None,
            points: None,
            submitted_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|date| date.and_hms_opt(12, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn empty_race_has_empty_leaderboard() {
        assert!(Leaderboard::from_lap_times(&[]).is_empty());
    }

    #[test]
    fn orders_and_formats_gaps() {
        let mut winner = lap_time(2, "Max", 83.45);
        winner.placement = Some(1);
        winner.handicap_kg = Some(20);
        winner.points = Some(16);
        winner.is_fastest_lap = true;

        let entries = Leaderboard::from_lap_times(&[
            lap_time(1, "Lewis", 84.95),
            winner,
            lap_time(3, "Charles", 150.0),
        ]);

        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["Max", "Lewis", "Charles"]);
        assert_eq!(entries[0].gap, "");
        assert_eq!(entries[1].gap, "+1.50s");
        assert_eq!(entries[2].gap, "+1:06.55");
        assert_eq!(entries[1].points, 0);
        assert_eq!(entries[0].line(), "1. Max — 1:23.45 | handicap +20kg | 16p 🏁");
        assert_eq!(entries[1].line(), "2. Lewis — 1:24.95 (+1.50s) | handicap +0kg | 0p");
    }

    #[test]
    fn personal_line_hides_zero_handicap() {
        let mut scored = lap_time(1, "Max", 100.0);
        scored.placement = Some(4);
        scored.handicap_kg = Some(0);
        scored.points = Some(10);
        assert_eq!(personal_time_line(&scored), "1:40.00 (P4)");

        scored.placement = Some(1);
        scored.handicap_kg = Some(20);
        scored.is_fastest_lap = true;
        assert_eq!(personal_time_line(&scored), "1:40.00 (P1, 20kg) 🏁");

        assert_eq!(personal_time_line(&lap_time(2, "Lewis", 5.0)), "0:05.00 (P-)");
    }
}
