use chrono::{DateTime, Utc};

use marquee_common::VenueClock;

use crate::types::{RotationCandidate, RotationConfig};

/// Cycles the board through eligible sponsor slots on a fixed time-slice
/// rotation. Every display polling within the same slot sees the same
/// candidate, with no shared state between callers.
pub struct RotationResolver {
    clock: VenueClock,
    config: RotationConfig,
}

impl RotationResolver {
    /// `config.rotate_every_seconds` must already be clamped to [5, 600]
    /// (`RotationConfig::clamped`); the resolver does not re-validate.
    pub fn new(clock: VenueClock, config: RotationConfig) -> Self {
        Self { clock, config }
    }

    /// Pick the candidate for the rotation slot containing `now`, or `None`
    /// when nothing is eligible today — a valid "nothing to display"
    /// result, not an error.
    pub fn resolve(
        &self,
        candidates: &[RotationCandidate],
        now: DateTime<Utc>,
    ) -> Option<RotationCandidate> {
        let today = self.clock.local_date(now);

        let mut eligible: Vec<&RotationCandidate> = candidates
            .iter()
            .filter(|c| c.eligible_on(today))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        // The tie-break order pins the index-to-candidate mapping across
        // reloads; it never changes which candidates are eligible.
        eligible.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.effective_from.cmp(&a.effective_from))
                .then(b.created_at.cmp(&a.created_at))
        });

        let slot = self.clock.seconds_of_day(now) / self.config.rotate_every_seconds;
        let index = slot as usize % eligible.len();
        Some(eligible[index].clone())
    }
}
