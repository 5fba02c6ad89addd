use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use marquee_common::{MarqueeError, VenueClock};
use marquee_display::{
    LeadWindow, LineupResolution, LineupResolver, RotationConfig, RotationResolver,
};

use crate::store::{RotationStore, ScheduleStore, SettingsStore, SponsorCard};

#[derive(Clone)]
pub struct AppState {
    pub clock: VenueClock,
    pub schedule: ScheduleStore,
    pub rotation: RotationStore,
    pub settings: SettingsStore,
}

pub fn build_router(state: AppState) -> Router {
    // The TVs are dumb kiosk browsers on the venue LAN; open CORS.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/board", get(board))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Everything a TV needs for one refresh.
#[derive(Serialize)]
struct BoardPayload {
    date: String,
    lineup: LineupResolution,
    /// Absolute instant of the next start, resolved with the offset in
    /// force on the event date so countdowns survive a DST changeover.
    next_starts_at: Option<DateTime<Utc>>,
    sponsor: Option<SponsorCard>,
}

/// One point-in-time fetch, then pure resolution. Each poll is independent:
/// no shared state between displays, identical inputs give identical
/// payloads.
async fn board(State(state): State<AppState>) -> Result<Json<BoardPayload>, (StatusCode, String)> {
    let now = Utc::now();
    let today = state.clock.local_date(now);

    let settings = state.settings.load().await.map_err(internal)?;
    let entries = state.schedule.for_day(today).await.map_err(internal)?;
    let slots = state.rotation.active_slots().await.map_err(internal)?;

    let lineup = LineupResolver::new(state.clock, LeadWindow::clamped(settings.lead_minutes))
        .resolve(&entries, now);

    let next_starts_at = lineup.next.as_ref().and_then(|slot| {
        entries
            .iter()
            .find(|e| e.id == slot.id)
            .and_then(|e| e.starts_at.as_deref())
            .and_then(|t| state.clock.wall_clock_to_instant(today, t))
    });

    let rotation = RotationResolver::new(
        state.clock,
        RotationConfig::clamped(settings.rotate_every_seconds),
    );
    let sponsor = match rotation.resolve(&slots, now) {
        Some(candidate) => state
            .rotation
            .sponsor(candidate.payload_id)
            .await
            .map_err(internal)?,
        None => None,
    };

    Ok(Json(BoardPayload {
        date: state.clock.date_key(now),
        lineup,
        next_starts_at,
        sponsor,
    }))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn internal(err: MarqueeError) -> (StatusCode, String) {
    tracing::error!(error = %err, "Board request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
    )
}
