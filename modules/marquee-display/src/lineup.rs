use chrono::{DateTime, Utc};
use tracing::warn;

use marquee_common::{parse_time_of_day, VenueClock};

use crate::types::{LeadWindow, LineupResolution, LineupSlot, ScheduleEntry};

/// Inferred end for the day's last entry, in minutes since midnight.
const END_OF_DAY_MIN: f64 = 1440.0;

/// Decides what the status board shows for the day's lineup: which entry is
/// on stage now, which is up next, and the countdown to the next start.
pub struct LineupResolver {
    clock: VenueClock,
    lead: LeadWindow,
}

struct TimedEntry<'a> {
    entry: &'a ScheduleEntry,
    start_min: f64,
}

impl LineupResolver {
    pub fn new(clock: VenueClock, lead: LeadWindow) -> Self {
        Self { clock, lead }
    }

    /// Resolve the lineup at `now`. Pure: identical inputs always yield an
    /// identical resolution, so polling displays never flicker.
    ///
    /// Cancelled entries and entries without a parsable start are dropped;
    /// one bad row never aborts the board. An empty or fully filtered
    /// schedule resolves to all-`None`, which is a valid "nothing
    /// scheduled" state rather than an error.
    pub fn resolve(&self, entries: &[ScheduleEntry], now: DateTime<Utc>) -> LineupResolution {
        let mut timed: Vec<TimedEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.cancelled {
                continue;
            }
            match entry.starts_at.as_deref().map(parse_time_of_day) {
                Some(Some(start_min)) => timed.push(TimedEntry { entry, start_min }),
                Some(None) => {
                    warn!(id = %entry.id, starts_at = ?entry.starts_at, "Unparsable start time, entry excluded");
                }
                None => {}
            }
        }

        // Stable: entries with equal starts keep their source order.
        timed.sort_by(|a, b| a.start_min.total_cmp(&b.start_min));

        if timed.is_empty() {
            return LineupResolution::default();
        }

        let now_min = self.clock.minutes_of_day(now);

        // An entry's end is its own end time when parsable, else the next
        // entry's start, else end of day.
        let end_min = |i: usize| -> f64 {
            timed[i]
                .entry
                .ends_at
                .as_deref()
                .and_then(parse_time_of_day)
                .unwrap_or_else(|| timed.get(i + 1).map_or(END_OF_DAY_MIN, |n| n.start_min))
        };

        // Scan order means the earliest-starting entry wins if malformed
        // data produced overlapping intervals.
        let current = timed
            .iter()
            .enumerate()
            .find(|(i, t)| t.start_min <= now_min && now_min < end_min(*i));

        let next = timed
            .iter()
            .enumerate()
            .find(|(_, t)| t.start_min > now_min);

        let mut seconds_until_next = next
            .as_ref()
            .map(|(_, t)| (((t.start_min - now_min) * 60.0).round() as i64).max(0));

        // Before the day's first entry the countdown stays hidden until now
        // is within the lead window. Only the first entry is gated; every
        // later transition shows its countdown no matter how far out.
        if let Some((_, next_entry)) = &next {
            let first = &timed[0];
            let lead_seconds = self.lead.lead_minutes as i64 * 60;
            if now_min < first.start_min
                && next_entry.entry.id == first.entry.id
                && seconds_until_next.map_or(false, |secs| secs > lead_seconds)
            {
                seconds_until_next = None;
            }
        }

        LineupResolution {
            now: current.map(|(i, t)| slot(t, end_min(i))),
            next: next.map(|(i, t)| slot(t, end_min(i))),
            seconds_until_next,
        }
    }
}

fn slot(timed: &TimedEntry, end_min: f64) -> LineupSlot {
    LineupSlot {
        id: timed.entry.id,
        label: timed.entry.display_label(),
        starts_at_min: timed.start_min,
        ends_at_min: end_min,
    }
}
