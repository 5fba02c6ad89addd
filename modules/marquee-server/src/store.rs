//! Postgres read paths for the status board.
//!
//! The resolvers never touch the database; these stores produce the
//! point-in-time snapshot a single board request resolves against.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use marquee_common::MarqueeError;
use marquee_display::{RotationCandidate, ScheduleEntry};

/// Read side of the day's performance schedule.
#[derive(Clone)]
pub struct ScheduleStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    performer: Option<String>,
    title: Option<String>,
    starts_at: Option<String>,
    ends_at: Option<String>,
    cancelled: bool,
}

impl From<ScheduleRow> for ScheduleEntry {
    fn from(row: ScheduleRow) -> Self {
        ScheduleEntry {
            id: row.id,
            performer: row.performer,
            title: row.title,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            cancelled: row.cancelled,
        }
    }
}

impl ScheduleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All non-cancelled entries for one venue-local calendar day, ordered
    /// by start time. The resolver re-sorts defensively regardless.
    pub async fn for_day(&self, day: NaiveDate) -> Result<Vec<ScheduleEntry>, MarqueeError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT id, performer, title, starts_at, ends_at, cancelled
            FROM schedule_entries
            WHERE event_date = $1 AND NOT cancelled
            ORDER BY starts_at ASC NULLS LAST
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MarqueeError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Read side of sponsor rotation: the scheduling rows the resolver picks
/// from, and the payload lookup performed after selection.
#[derive(Clone)]
pub struct RotationStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: Uuid,
    sponsor_id: Uuid,
    priority: i32,
    effective_from: NaiveDate,
    effective_until: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<SlotRow> for RotationCandidate {
    fn from(row: SlotRow) -> Self {
        RotationCandidate {
            id: row.id,
            payload_id: row.sponsor_id,
            priority: row.priority,
            effective_from: row.effective_from,
            effective_until: row.effective_until,
            created_at: row.created_at,
        }
    }
}

/// Display content for a selected sponsor slot.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SponsorCard {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}

impl RotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All active sponsor slots. Date eligibility is the resolver's job,
    /// so a slot whose window opens tomorrow is still returned here.
    pub async fn active_slots(&self) -> Result<Vec<RotationCandidate>, MarqueeError> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
            SELECT id, sponsor_id, priority, effective_from, effective_until, created_at
            FROM sponsor_slots
            WHERE active
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MarqueeError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Resolve a selected slot's payload to its display content.
    pub async fn sponsor(&self, sponsor_id: Uuid) -> Result<Option<SponsorCard>, MarqueeError> {
        sqlx::query_as::<_, SponsorCard>(
            "SELECT id, name, image_url FROM sponsors WHERE id = $1",
        )
        .bind(sponsor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MarqueeError::Database(e.to_string()))
    }
}

/// Board tuning values staff edit from the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct BoardSettings {
    pub lead_minutes: i64,
    pub rotate_every_seconds: i64,
}

/// Settings live in a single mutable row; re-read per board request so
/// staff edits take effect on the next poll without a restart. Values are
/// clamped at the route boundary, never inside the resolvers.
#[derive(Clone)]
pub struct SettingsStore {
    pool: PgPool,
    defaults: BoardSettings,
}

impl SettingsStore {
    pub fn new(pool: PgPool, defaults: BoardSettings) -> Self {
        Self { pool, defaults }
    }

    pub async fn load(&self) -> Result<BoardSettings, MarqueeError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT lead_minutes, rotate_every_seconds FROM board_settings LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MarqueeError::Database(e.to_string()))?;

        Ok(match row {
            Some((lead_minutes, rotate_every_seconds)) => BoardSettings {
                lead_minutes,
                rotate_every_seconds,
            },
            None => self.defaults,
        })
    }
}
