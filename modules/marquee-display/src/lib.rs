//! Pure display resolution for the venue status board.
//!
//! Both resolvers are stateless functions of (current instant, data
//! snapshot, configuration). They fetch nothing and hold nothing; the
//! caller supplies a point-in-time snapshot and gets back plain data for
//! the presentation layer. Re-running with the same inputs always yields
//! the same resolution, which is what lets many TVs poll concurrently
//! without coordination.

pub mod lineup;
pub mod rotation;
pub mod types;

pub use lineup::LineupResolver;
pub use rotation::RotationResolver;
pub use types::{
    LeadWindow, LineupResolution, LineupSlot, RotationCandidate, RotationConfig, ScheduleEntry,
};
