use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown when an entry has neither a performer name nor a title.
pub const FALLBACK_LABEL: &str = "Live Music";

/// One performance slot on a single venue-local calendar day.
///
/// Times are wall-clock strings (`HH:MM` or `HH:MM:SS`) as stored by the
/// scheduling UI. Constructed fresh from a store read per resolution call,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub performer: Option<String>,
    pub title: Option<String>,
    /// Venue-local start. Entries without a parsable start are excluded
    /// from resolution.
    pub starts_at: Option<String>,
    /// Venue-local end. An absent end is inferred from the next entry's
    /// start, or end of day for the last entry.
    pub ends_at: Option<String>,
    pub cancelled: bool,
}

impl ScheduleEntry {
    /// Label fallback chain: non-empty performer, else non-empty title,
    /// else a fixed literal. Applied everywhere a label is produced.
    pub fn display_label(&self) -> String {
        non_empty(&self.performer)
            .or_else(|| non_empty(&self.title))
            .unwrap_or(FALLBACK_LABEL)
            .to_string()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A schedule entry as the board displays it, with its start and resolved
/// end in venue-local minutes since midnight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub id: Uuid,
    pub label: String,
    pub starts_at_min: f64,
    pub ends_at_min: f64,
}

/// What the TV shows: the entry on stage now, the entry up next, and the
/// countdown (seconds) until the next one starts. The countdown is `None`
/// when there is no next entry or the lead-window gate suppresses it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineupResolution {
    pub now: Option<LineupSlot>,
    pub next: Option<LineupSlot>,
    pub seconds_until_next: Option<i64>,
}

/// How many minutes before the day's first entry the countdown becomes
/// visible. Only the first entry is gated; later transitions always show
/// their countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadWindow {
    pub lead_minutes: u32,
}

impl LeadWindow {
    /// Clamp an externally supplied value into [0, 1440]. The resolver
    /// assumes this has been applied at the boundary.
    pub fn clamped(minutes: i64) -> Self {
        Self {
            lead_minutes: minutes.clamp(0, 1440) as u32,
        }
    }
}

/// A sponsor (or other payload) slot competing for board rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationCandidate {
    pub id: Uuid,
    /// What this slot displays. The payload lookup happens caller-side
    /// after selection.
    pub payload_id: Uuid,
    pub priority: i32,
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl RotationCandidate {
    /// Effective-date range check, inclusive on both ends: a candidate whose
    /// `effective_until` is today is still eligible today.
    pub fn eligible_on(&self, day: NaiveDate) -> bool {
        self.effective_from <= day && self.effective_until.map_or(true, |until| day <= until)
    }
}

/// Width of a rotation slot in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    pub rotate_every_seconds: u32,
}

impl RotationConfig {
    /// Clamp an externally supplied value into [5, 600]. The resolver
    /// assumes this has been applied at the boundary.
    pub fn clamped(seconds: i64) -> Self {
        Self {
            rotate_every_seconds: seconds.clamp(5, 600) as u32,
        }
    }
}
