use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

/// Booking-grid and reminder settings. Passed explicitly into availability
/// and notification computation rather than read from ambient state.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Step between bookable start times, and the default slot duration when
    /// no service is given.
    pub appointment_interval_minutes: i64,
    /// How long before the appointment start each reminder fires.
    pub reminder_offsets_minutes: Vec<i64>,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::minutes(self.appointment_interval_minutes)
    }

    pub fn reminder_offsets(&self) -> impl Iterator<Item = Duration> + '_ {
        self.reminder_offsets_minutes
            .iter()
            .map(|&m| Duration::minutes(m))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            appointment_interval_minutes: 30,
            reminder_offsets_minutes: vec![60, 24 * 60],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            ),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse DATABASE_MIN_CONNECTIONS")?,
            ),
            Err(_) => Some(1),
        };

        let appointment_interval_minutes = match env::var("APPOINTMENT_INTERVAL_MINUTES") {
            Ok(val) => val
                .parse()
                .context("Failed to parse APPOINTMENT_INTERVAL_MINUTES")?,
            Err(_) => 30,
        };
        let reminder_offsets_minutes = match env::var("REMINDER_OFFSETS_MINUTES") {
            Ok(val) => val
                .split(',')
                .map(|s| s.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to parse REMINDER_OFFSETS_MINUTES")?,
            Err(_) => vec![60, 24 * 60],
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            schedule: ScheduleConfig {
                appointment_interval_minutes,
                reminder_offsets_minutes,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}

use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}
