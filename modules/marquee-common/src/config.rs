use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Venue
    pub venue_timezone: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Board defaults, used when the settings table has no row.
    // The live values are re-read from the store on every board request.
    pub default_lead_minutes: i64,
    pub default_rotate_seconds: i64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            venue_timezone: env::var("VENUE_TIMEZONE")
                .unwrap_or_else(|_| "America/Chicago".to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            default_lead_minutes: env::var("DEFAULT_LEAD_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("DEFAULT_LEAD_MINUTES must be a number"),
            default_rotate_seconds: env::var("DEFAULT_ROTATE_SECONDS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("DEFAULT_ROTATE_SECONDS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
