// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted workout layout.
//!
//! Stored under `keys::WORKOUTS` as a JSON array of flat objects:
//!
//! ```json
//! {"kind":"running","id":"…","createdAt":"2024-04-12T08:30:00Z",
//!  "coordinates":[48.85,2.35],"distanceKm":5.0,"durationMin":25.0,
//!  "description":"Running on April 12",
//!  "cadenceStepsPerMin":178.0,"paceMinPerKm":5.0}
//! ```
//!
//! Derived fields are written for readers of the raw store but are never
//! trusted on the way back in: restoring rebuilds each record through the
//! model constructors, which re-validate inputs and recompute pace, speed
//! and description.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Workout, WorkoutKind, WorkoutMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One workout as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkout {
    pub kind: WorkoutKind,
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// `[lat, lng]`
    pub coordinates: [f64; 2],
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_steps_per_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(workout: &Workout) -> Self {
        let coords = workout.coordinates();
        let mut stored = StoredWorkout {
            kind: workout.kind(),
            id: workout.id().to_string(),
            created_at: workout.created_at(),
            coordinates: [coords.lat, coords.lng],
            distance_km: workout.distance_km(),
            duration_min: workout.duration_min(),
            description: workout.description().to_string(),
            cadence_steps_per_min: None,
            pace_min_per_km: None,
            elevation_gain_m: None,
            speed_km_per_h: None,
        };

        match *workout.metrics() {
            WorkoutMetrics::Running {
                cadence_steps_per_min,
                pace_min_per_km,
            } => {
                stored.cadence_steps_per_min = Some(cadence_steps_per_min);
                stored.pace_min_per_km = Some(pace_min_per_km);
            }
            WorkoutMetrics::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                stored.elevation_gain_m = Some(elevation_gain_m);
                stored.speed_km_per_h = Some(speed_km_per_h);
            }
        }

        stored
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = AppError;

    fn try_from(stored: StoredWorkout) -> Result<Self> {
        let [lat, lng] = stored.coordinates;
        let coordinates = Coordinates { lat, lng };
        let id = stored.id.into();

        let rebuilt = match stored.kind {
            WorkoutKind::Running => {
                let cadence = stored.cadence_steps_per_min.ok_or_else(|| {
                    AppError::CorruptStore(format!("running workout {} has no cadence", id))
                })?;
                Workout::running_with(
                    id,
                    stored.created_at,
                    coordinates,
                    stored.distance_km,
                    stored.duration_min,
                    cadence,
                )
            }
            WorkoutKind::Cycling => {
                let elevation = stored.elevation_gain_m.ok_or_else(|| {
                    AppError::CorruptStore(format!("cycling workout {} has no elevation gain", id))
                })?;
                Workout::cycling_with(
                    id,
                    stored.created_at,
                    coordinates,
                    stored.distance_km,
                    stored.duration_min,
                    elevation,
                )
            }
        };

        rebuilt.map_err(|e| match e {
            AppError::InvalidInput(msg) => AppError::CorruptStore(msg),
            other => other,
        })
    }
}

/// Serialize a whole collection for `keys::WORKOUTS`.
pub fn encode_collection(workouts: &[Workout]) -> Result<String> {
    let stored: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
    serde_json::to_string(&stored)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode workouts: {}", e)))
}

/// Parse and rebuild a stored collection. Any failure is `CorruptStore`.
pub fn decode_collection(data: &str) -> Result<Vec<Workout>> {
    let stored: Vec<StoredWorkout> =
        serde_json::from_str(data).map_err(|e| AppError::CorruptStore(e.to_string()))?;
    stored.into_iter().map(Workout::try_from).collect()
}
