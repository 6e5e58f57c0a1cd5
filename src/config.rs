// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::models::Coordinates;
use std::env;

/// Default zoom level for map initialization and recentering.
pub const DEFAULT_MAP_ZOOM: u8 = 15;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JSON file backing the key-value store
    pub store_path: String,
    /// Zoom level used when initializing and recentering the map
    pub map_zoom: u8,
    /// Location reported by the server-side location provider, if any
    pub home_location: Option<Coordinates>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            store_path: "data/workouts.json".to_string(),
            map_zoom: DEFAULT_MAP_ZOOM,
            home_location: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store_path: env::var("STORE_PATH")
                .unwrap_or_else(|_| "data/workouts.json".to_string()),
            map_zoom: env::var("MAP_ZOOM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAP_ZOOM),
            home_location: home_location_from_env()?,
        })
    }
}

/// Read `HOME_LATITUDE`/`HOME_LONGITUDE`. Both or neither must be set.
fn home_location_from_env() -> Result<Option<Coordinates>, ConfigError> {
    let lat = env::var("HOME_LATITUDE").ok();
    let lng = env::var("HOME_LONGITUDE").ok();

    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let lat: f64 = lat
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("HOME_LATITUDE"))?;
            let lng: f64 = lng
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("HOME_LONGITUDE"))?;
            Ok(Some(Coordinates { lat, lng }))
        }
        (None, Some(_)) => Err(ConfigError::Missing("HOME_LATITUDE")),
        (Some(_), None) => Err(ConfigError::Missing("HOME_LONGITUDE")),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
