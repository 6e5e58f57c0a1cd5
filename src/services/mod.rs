// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod collection;
pub mod controller;
pub mod location;
pub mod surface;

pub use collection::{PersistOutcome, WorkoutCollection};
pub use controller::{SessionController, SessionState, StartReport, SubmitOutcome};
pub use location::{ConfiguredLocation, LocationProvider};
pub use surface::{InputSurface, ListEntry, MapSurface, MarkerLabel, RenderCommand, RenderQueue};
