// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw workout form fields as held by the input surface.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Workout, WorkoutKind};
use serde::{Deserialize, Serialize};

/// Snapshot of the input surface's field values.
///
/// All values are raw text. Only the metric field belonging to the
/// selected kind is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWorkoutForm {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String,
}

impl RawWorkoutForm {
    /// Parse the fields and build a workout at `coordinates`.
    ///
    /// Distance, duration and (for running) cadence must be positive finite
    /// numbers; an empty field reads as 0 and is rejected. Elevation may be
    /// any finite number and an empty elevation reads as 0 m.
    pub fn into_workout(self, coordinates: Coordinates) -> Result<Workout> {
        let kind = WorkoutKind::parse(&self.kind)?;
        let distance = parse_number("distance", &self.distance)?;
        let duration = parse_number("duration", &self.duration)?;

        match kind {
            WorkoutKind::Running => {
                let cadence = parse_number("cadence", &self.cadence)?;
                Workout::running(coordinates, distance, duration, cadence)
            }
            WorkoutKind::Cycling => {
                let elevation = parse_number("elevation", &self.elevation)?;
                Workout::cycling(coordinates, distance, duration, elevation)
            }
        }
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse::<f64>().map_err(|_| {
        AppError::InvalidInput(format!("{} must be a number, got '{}'", field, raw))
    })
}
