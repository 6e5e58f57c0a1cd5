// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout record model and derived metrics.
//!
//! Records are immutable once built. Every constructor validates its inputs
//! and computes the derived fields (pace or speed, description) exactly once,
//! so a `Workout` always satisfies:
//! - distance and duration are strictly positive and finite
//! - running cadence is strictly positive and finite
//! - cycling elevation gain is finite (zero or negative allowed)
//! - pace/speed equal their formula over the stored inputs

use crate::error::{AppError, Result};
use crate::time_utils::month_day_label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting values outside lat [-90,90], lng [-180,180].
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coords = Self { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    /// Check that both components are finite and within geographic range.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Activity kind (the record discriminant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase name as used in forms and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized label used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    /// Glyph shown in marker popups and list entries.
    pub fn glyph(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }

    /// Parse a form value ("running" / "cycling").
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(AppError::InvalidInput(format!(
                "unknown workout type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque workout identifier, the join key between list entries and records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activity-specific inputs and their derived metric.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutMetrics {
    Running {
        cadence_steps_per_min: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_km_per_h: f64,
    },
}

/// One logged workout. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    metrics: WorkoutMetrics,
}

impl Workout {
    /// Create a running workout timestamped now with a fresh id.
    pub fn running(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_steps_per_min: f64,
    ) -> Result<Self> {
        Self::running_with(
            WorkoutId::generate(),
            Utc::now(),
            coordinates,
            distance_km,
            duration_min,
            cadence_steps_per_min,
        )
    }

    /// Create a cycling workout timestamped now with a fresh id.
    pub fn cycling(
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        Self::cycling_with(
            WorkoutId::generate(),
            Utc::now(),
            coordinates,
            distance_km,
            duration_min,
            elevation_gain_m,
        )
    }

    /// Build a running workout with an explicit identity (used on restore).
    pub fn running_with(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_steps_per_min: f64,
    ) -> Result<Self> {
        coordinates.validate()?;
        require_positive("distance", distance_km)?;
        require_positive("duration", duration_min)?;
        require_positive("cadence", cadence_steps_per_min)?;

        Ok(Self {
            description: describe(WorkoutKind::Running, created_at),
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            metrics: WorkoutMetrics::Running {
                cadence_steps_per_min,
                pace_min_per_km: duration_min / distance_km,
            },
        })
    }

    /// Build a cycling workout with an explicit identity (used on restore).
    pub fn cycling_with(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        coordinates.validate()?;
        require_positive("distance", distance_km)?;
        require_positive("duration", duration_min)?;
        if !elevation_gain_m.is_finite() {
            return Err(AppError::InvalidInput(
                "elevation gain must be a finite number".to_string(),
            ));
        }

        Ok(Self {
            description: describe(WorkoutKind::Cycling, created_at),
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            metrics: WorkoutMetrics::Cycling {
                elevation_gain_m,
                speed_km_per_h: distance_km / (duration_min / 60.0),
            },
        })
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.metrics {
            WorkoutMetrics::Running { .. } => WorkoutKind::Running,
            WorkoutMetrics::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metrics(&self) -> &WorkoutMetrics {
        &self.metrics
    }
}

/// Human-readable label, e.g. "Running on April 12".
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), month_day_label(created_at))
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}
