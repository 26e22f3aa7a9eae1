use std::sync::OnceLock;

use log::error;
use regex::Regex;

use crate::errors::{CustomResult, InvalidFormatSnafu};
use crate::modules::helpers::math::Math;

/// minutes (1-2 digits) : seconds (2 digits) . centiseconds (2 digits)
const LAP_TIME_PATTERN: &str = r"^([0-9]{1,2}):([0-9]{2})\.([0-9]{2})$";

fn lap_time_regex() -> Result<&'static Regex, &'static regex::Error> {
    static REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(LAP_TIME_PATTERN)).as_ref()
}

pub struct TimeCodec {}

impl TimeCodec {
    /// # parse a lap time
    /// parse a lap time entered as `M:SS.CC` into seconds.
    ///
    /// seconds are not checked against 60, `0:75.00` is accepted and equals `1:15.00`.
    ///
    /// ## Arguments
    /// * `input` - the time as typed by the participant
    ///
    /// ## Returns
    /// * `f64` - the duration in seconds with centisecond resolution
    pub fn parse(input: &str) -> CustomResult<f64> {
        let regex = match lap_time_regex() {
            Ok(regex) => regex,
            Err(error) => {
                error!(target: "helpers/time_codec:parse", "Error compiling the lap time pattern: {}", error);
                return InvalidFormatSnafu { input }.fail();
            }
        };

        let captures = match regex.captures(input) {
            Some(captures) => captures,
            None => return InvalidFormatSnafu { input }.fail(),
        };

        let mut parts = [0_i64; 3];
        for (index, part) in parts.iter_mut().enumerate() {
            *part = match captures.get(index + 1).map(|m| m.as_str().parse::<i64>()) {
                Some(Ok(value)) => value,
                _ => return InvalidFormatSnafu { input }.fail(),
            };
        }
        let [minutes, seconds, centiseconds] = parts;

        Ok(Math::from_centiseconds(
            (minutes * 60 + seconds) * 100 + centiseconds,
        ))
    }

    /// # format a lap time
    /// format a duration in seconds as `M:SS.CC`.
    /// minutes are not padded, seconds and centiseconds are padded to two digits.
    pub fn format(duration_seconds: f64) -> String {
        let total = Math::to_centiseconds(duration_seconds.max(0.0));
        format!(
            "{}:{:02}.{:02}",
            total / 6000,
            (total / 100) % 60,
            total % 100
        )
    }

    /// # format the gap to the winner
    /// `+M:SS.CC` when the gap is a minute or more, `+S.CCs` otherwise.
    /// the winner itself (a gap of zero or less) gets an empty string.
    ///
    /// ## Arguments
    /// * `duration_seconds` - the time of the row being displayed
    /// * `winner_seconds` - the fastest time of the race
    pub fn format_gap(duration_seconds: f64, winner_seconds: f64) -> String {
        let gap = Math::to_centiseconds(duration_seconds) - Math::to_centiseconds(winner_seconds);
        if gap <= 0 {
            return String::new();
        }

        if gap >= 6000 {
            format!("+{}", TimeCodec::format(Math::from_centiseconds(gap)))
        } else {
            format!("+{}.{:02}s", gap / 100, gap % 100)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{lap_time_regex, TimeCodec};
    use crate::errors::Error;

    #[test]
    fn lap_time_pattern_compiles() {
        assert!(lap_time_regex().is_ok());
    }

    #[test]
    fn parses_minutes_seconds_and_centiseconds() {
        assert_eq!(TimeCodec::parse("1:23.45").unwrap(), 83.45);
        assert_eq!(TimeCodec::parse("0:05.00").unwrap(), 5.0);
        assert_eq!(TimeCodec::parse("12:00.01").unwrap(), 720.01);
        assert_eq!(TimeCodec::parse("99:59.99").unwrap(), 5999.99);
    }

    #[test]
    fn keeps_seconds_over_sixty_as_given() {
        assert_eq!(TimeCodec::parse("0:75.00").unwrap(), 75.0);
        assert_eq!(TimeCodec::parse("1:99.99").unwrap(), 159.99);
    }

    #[test]
    fn rejects_anything_but_the_exact_pattern() {
        for input in [
            "", "1:23", "1:23.4", "1:23.456", "123:00.00", "1:2.45", " 1:23.45", "1:23.45 ",
            "1.23.45", "1:23:45", "-1:23.45", "a:23.45", "1:23.45s", "١:٢٣.٤٥",
        ] {
            match TimeCodec::parse(input) {
                Err(Error::InvalidFormatError { input: rejected }) => assert_eq!(rejected, input),
                other => panic!("expected InvalidFormatError for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn formats_without_minute_padding() {
        assert_eq!(TimeCodec::format(83.45), "1:23.45");
        assert_eq!(TimeCodec::format(5.0), "0:05.00");
        assert_eq!(TimeCodec::format(0.0), "0:00.00");
        assert_eq!(TimeCodec::format(720.01), "12:00.01");
        assert_eq!(TimeCodec::format(0.29), "0:00.29");
    }

    #[test]
    fn formatting_then_parsing_recovers_the_duration() {
        for centiseconds in (0..20_000).step_by(7) {
            let duration = centiseconds as f64 / 100.0;
            let parsed = TimeCodec::parse(&TimeCodec::format(duration)).unwrap();
            assert!((parsed - duration).abs() < 0.01, "{duration} became {parsed}");
        }
    }

    #[test]
    fn parsing_then_formatting_denotes_the_same_duration() {
        for input in ["0:00.00", "1:23.45", "9:59.99", "0:75.00", "45:07.10"] {
            let parsed = TimeCodec::parse(input).unwrap();
            let reparsed = TimeCodec::parse(&TimeCodec::format(parsed)).unwrap();
            assert!((parsed - reparsed).abs() < 0.01);
        }
    }

    #[test]
    fn formats_gaps_relative_to_the_winner() {
        assert_eq!(TimeCodec::format_gap(83.45, 83.45), "");
        assert_eq!(TimeCodec::format_gap(84.95, 83.45), "+1.50s");
        assert_eq!(TimeCodec::format_gap(83.5, 83.45), "+0.05s");
        assert_eq!(TimeCodec::format_gap(153.45, 83.45), "+1:10.00");
        assert_eq!(TimeCodec::format_gap(143.45, 83.45), "+1:00.00");
    }
}
