pub mod clock;
pub mod config;
pub mod error;

pub use clock::{parse_time_of_day, VenueClock};
pub use config::Config;
pub use error::MarqueeError;
