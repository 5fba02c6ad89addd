//! Venue-local wall-clock arithmetic.
//!
//! Every schedule time in the system is civil time in the venue's fixed
//! operating timezone, independent of where the server or a display runs.
//! `VenueClock` is the single seam through which the resolvers see time, so
//! tests inject fixed instants instead of reading the real clock.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::MarqueeError;

/// Parse `H:MM`, `HH:MM`, or `HH:MM:SS` into minutes since midnight.
/// Seconds contribute a fractional minute. Returns `None` on malformed
/// input; a bad time string must never abort a whole resolution.
pub fn parse_time_of_day(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }

    let hours = parse_field(parts[0], 1, 2, 23)?;
    let minutes = parse_field(parts[1], 2, 2, 59)?;
    let seconds = if parts.len() == 3 {
        parse_field(parts[2], 2, 2, 59)?
    } else {
        0
    };

    Some(hours as f64 * 60.0 + minutes as f64 + seconds as f64 / 60.0)
}

/// A fixed-width decimal field with an inclusive upper bound.
fn parse_field(s: &str, min_len: usize, max_len: usize, max: u32) -> Option<u32> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = s.parse().ok()?;
    (value <= max).then_some(value)
}

/// Converts absolute instants to the venue's civil wall-clock fields.
///
/// The UTC offset is derived per-instant (and, for `wall_clock_to_instant`,
/// per target date), so arithmetic stays correct across DST transitions.
#[derive(Debug, Clone, Copy)]
pub struct VenueClock {
    tz: Tz,
}

impl VenueClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build from an IANA zone name. Unknown names are a configuration
    /// error, caught once at startup.
    pub fn from_name(name: &str) -> Result<Self, MarqueeError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| MarqueeError::Config(format!("unknown timezone: {name}")))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Venue-local minutes since midnight, seconds as a fractional minute.
    pub fn minutes_of_day(&self, instant: DateTime<Utc>) -> f64 {
        let local = instant.with_timezone(&self.tz).time();
        local.hour() as f64 * 60.0 + local.minute() as f64 + local.second() as f64 / 60.0
    }

    /// Venue-local whole seconds since midnight. Second resolution feeds the
    /// rotation slot computation.
    pub fn seconds_of_day(&self, instant: DateTime<Utc>) -> u32 {
        instant
            .with_timezone(&self.tz)
            .time()
            .num_seconds_from_midnight()
    }

    /// The venue-local calendar day containing `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// `YYYY-MM-DD` key for the venue-local calendar day. Used to select
    /// which rows are "today" and in the board payload.
    pub fn date_key(&self, instant: DateTime<Utc>) -> String {
        self.local_date(instant).format("%Y-%m-%d").to_string()
    }

    /// Resolve a wall-clock time on a given venue-local date to an absolute
    /// instant, using the UTC offset in force on that date rather than
    /// today's. Ambiguous local times (fall-back hour) take the earlier
    /// offset; times inside a spring-forward gap shift forward one hour.
    /// Malformed time strings yield `None`.
    pub fn wall_clock_to_instant(&self, date: NaiveDate, time: &str) -> Option<DateTime<Utc>> {
        let minutes = parse_time_of_day(time)?;
        let seconds = (minutes * 60.0).round() as u32;
        let naive = date.and_time(NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?);

        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earlier, _) => Some(earlier.with_timezone(&Utc)),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Chicago;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn parses_all_accepted_shapes() {
        assert_eq!(parse_time_of_day("9:30"), Some(570.0));
        assert_eq!(parse_time_of_day("09:30"), Some(570.0));
        assert_eq!(parse_time_of_day("0:00"), Some(0.0));
        assert_eq!(parse_time_of_day("23:59:59"), Some(1439.0 + 59.0 / 60.0));
        assert_eq!(parse_time_of_day("21:00:30"), Some(1260.5));
    }

    #[test]
    fn rejects_malformed_time_strings() {
        for bad in [
            "", "12", "24:00", "12:60", "12:30:60", "9:5", "1:2:3", "ab:cd", "12:30:15:00",
            " 9:30", "9:30 ", "-1:30", "+9:30", "009:30",
        ] {
            assert_eq!(parse_time_of_day(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn minutes_of_day_tracks_dst_offset() {
        let clock = VenueClock::new(Chicago);

        // Summer: Chicago is UTC-5, so 00:00Z is 19:00 local.
        assert_eq!(clock.minutes_of_day(utc("2025-07-01T00:00:00Z")), 1140.0);
        // Winter: UTC-6, so the same UTC wall time is 18:00 local.
        assert_eq!(clock.minutes_of_day(utc("2025-01-15T00:00:00Z")), 1080.0);

        // Seconds contribute a fractional minute.
        let m = clock.minutes_of_day(utc("2025-01-15T06:00:30Z"));
        assert!((m - 0.5).abs() < 1e-9);
    }

    #[test]
    fn seconds_of_day_matches_local_clock() {
        let clock = VenueClock::new(Chicago);
        // 19:00:42 local in summer.
        assert_eq!(
            clock.seconds_of_day(utc("2025-07-01T00:00:42Z")),
            19 * 3600 + 42
        );
    }

    #[test]
    fn local_date_rolls_at_venue_midnight_not_utc() {
        let clock = VenueClock::new(Chicago);
        // 23:30Z on July 1 is still 18:30 on July 1 in Chicago.
        assert_eq!(clock.date_key(utc("2025-07-01T23:30:00Z")), "2025-07-01");
        // 03:00Z on July 2 is 22:00 on July 1 in Chicago.
        assert_eq!(clock.date_key(utc("2025-07-02T03:00:00Z")), "2025-07-01");
    }

    #[test]
    fn wall_clock_uses_the_offset_of_the_target_date() {
        let clock = VenueClock::new(Chicago);
        // Winter date: 18:00 CST is 00:00Z the next day.
        assert_eq!(
            clock.wall_clock_to_instant(date("2025-01-15"), "18:00"),
            Some(utc("2025-01-16T00:00:00Z"))
        );
        // Summer date: 18:00 CDT is 23:00Z.
        assert_eq!(
            clock.wall_clock_to_instant(date("2025-07-01"), "18:00"),
            Some(utc("2025-07-01T23:00:00Z"))
        );
    }

    #[test]
    fn ambiguous_fall_back_time_takes_earlier_offset() {
        let clock = VenueClock::new(Chicago);
        // 01:30 on 2025-11-02 occurs twice; the CDT (-5) reading wins.
        assert_eq!(
            clock.wall_clock_to_instant(date("2025-11-02"), "01:30"),
            Some(utc("2025-11-02T06:30:00Z"))
        );
    }

    #[test]
    fn nonexistent_spring_forward_time_shifts_forward() {
        let clock = VenueClock::new(Chicago);
        // 02:30 on 2025-03-09 does not exist; it behaves as 03:30 CDT.
        assert_eq!(
            clock.wall_clock_to_instant(date("2025-03-09"), "02:30"),
            Some(utc("2025-03-09T08:30:00Z"))
        );
    }

    #[test]
    fn wall_clock_rejects_malformed_time() {
        let clock = VenueClock::new(Chicago);
        assert_eq!(clock.wall_clock_to_instant(date("2025-07-01"), "25:00"), None);
    }

    #[test]
    fn from_name_rejects_unknown_zones() {
        assert!(VenueClock::from_name("America/Chicago").is_ok());
        assert!(VenueClock::from_name("Nowhere/Venue").is_err());
    }
}
