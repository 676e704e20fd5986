//! Command-line configuration for the server binary

use std::net::SocketAddr;
use std::path::PathBuf;

use cashflow_core::{DEFAULT_HORIZON_YEARS, ProjectionConfig};
use clap::Parser;
use jiff::tz::TimeZone;

#[derive(Parser, Debug)]
#[command(name = "cashflow_server")]
#[command(about = "HTTP API for cash-flow projections")]
pub struct Args {
    /// JSON file holding accounts and events; created on first write
    #[arg(short, long, default_value = "financial_data.json")]
    pub data_file: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Years projected when a request does not ask for a horizon
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    pub horizon_years: i64,

    /// IANA zone (or "UTC") every recurrence rule is read in; without it each
    /// event repeats on the offset its start was written with
    #[arg(short, long)]
    pub time_zone: Option<String>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_file: PathBuf,
    pub bind: SocketAddr,
    pub projection: ProjectionConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("horizon must be at least one year, got {0}")]
    Horizon(i64),

    #[error("unknown time zone {name:?}: {source}")]
    TimeZone { name: String, source: jiff::Error },
}

impl TryFrom<Args> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.horizon_years < 1 {
            return Err(ConfigError::Horizon(args.horizon_years));
        }

        let mut projection = ProjectionConfig::new().with_horizon_years(args.horizon_years);
        if let Some(name) = &args.time_zone {
            projection = projection.with_time_zone(parse_time_zone(name)?);
        }

        Ok(Self {
            data_file: args.data_file,
            bind: args.bind,
            projection,
        })
    }
}

fn parse_time_zone(name: &str) -> Result<TimeZone, ConfigError> {
    if name.eq_ignore_ascii_case("utc") {
        return Ok(TimeZone::UTC);
    }
    TimeZone::get(name).map_err(|source| ConfigError::TimeZone {
        name: name.to_string(),
        source,
    })
}
