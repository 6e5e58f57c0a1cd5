// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location provider collaborator.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use std::future::Future;

/// Source of the user's current position.
pub trait LocationProvider {
    /// Resolve the current location or fail with `LocationUnavailable`.
    fn current_location(&self) -> impl Future<Output = Result<Coordinates>> + Send;
}

/// Location taken from configuration (`HOME_LATITUDE`/`HOME_LONGITUDE`).
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.home_location)
    }
}

impl LocationProvider for ConfiguredLocation {
    async fn current_location(&self) -> Result<Coordinates> {
        let home = self.home.ok_or_else(|| {
            AppError::LocationUnavailable("no home location configured".to_string())
        })?;

        home.validate()
            .map_err(|e| AppError::LocationUnavailable(e.to_string()))?;
        Ok(home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_location_resolves() {
        let home = Coordinates {
            lat: 37.33,
            lng: -122.07,
        };
        let provider = ConfiguredLocation::new(Some(home));
        assert_eq!(provider.current_location().await.unwrap(), home);
    }

    #[tokio::test]
    async fn test_missing_or_invalid_location_is_unavailable() {
        let missing = ConfiguredLocation::default();
        assert!(matches!(
            missing.current_location().await,
            Err(AppError::LocationUnavailable(_))
        ));

        let invalid = ConfiguredLocation::new(Some(Coordinates {
            lat: 95.0,
            lng: 0.0,
        }));
        assert!(matches!(
            invalid.current_location().await,
            Err(AppError::LocationUnavailable(_))
        ));
    }
}
