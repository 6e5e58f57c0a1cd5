// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod form;
pub mod workout;

pub use form::RawWorkoutForm;
pub use workout::{describe, Coordinates, Workout, WorkoutId, WorkoutKind, WorkoutMetrics};
