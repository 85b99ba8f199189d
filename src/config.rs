use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use serde::Serialize;
use thiserror::Error;

use crate::models::Coordinate;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ACCESS_TOKEN: &str = "pk.pipemap-public-access-token";
pub const DEFAULT_CENTER: Coordinate = [14.5995, 120.9842];
pub const DEFAULT_ZOOM: f64 = 13.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Rendering defaults handed to map clients by `/map-settings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSettings {
    pub access_token: String,
    pub center: Coordinate,
    pub zoom: f64,
}

impl Default for MapSettings {
    fn default() -> MapSettings {
        MapSettings {
            access_token: DEFAULT_ACCESS_TOKEN.to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub map: MapSettings,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            map: MapSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, with the listen address optionally overridden by
    /// `PIPEMAP_HOST`/`PIPEMAP_PORT` from the environment or a `.env` file.
    /// The map settings are never read from the environment.
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenv().ok();
        Settings::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(host) = lookup("PIPEMAP_HOST") {
            settings.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PIPEMAP_PORT")? {
            settings.port = port;
        }

        Ok(settings)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(None),
    }
}
