// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rendering and input-capture collaborators.
//!
//! The controller never draws anything itself. It asks a [`MapSurface`] to
//! place markers and list entries and an [`InputSurface`] to show or hide
//! the workout form. [`RenderQueue`] implements both by recording
//! [`RenderCommand`]s that an HTTP client applies to its own map and DOM.

use crate::models::{Coordinates, Workout, WorkoutId, WorkoutKind, WorkoutMetrics};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Map and workout-list rendering.
pub trait MapSurface {
    fn initialize(&mut self, center: Coordinates, zoom: u8);
    fn place_marker(&mut self, coordinates: Coordinates, label: MarkerLabel);
    fn recenter(&mut self, coordinates: Coordinates, zoom: u8);
    fn append_list_entry(&mut self, entry: ListEntry);
    fn clear_input_surface(&mut self);
    /// Drop everything rendered so far and start from a clean slate.
    fn reload(&mut self);
}

/// Workout form.
pub trait InputSurface {
    /// Show the form and focus the distance field.
    fn open(&mut self);
    fn close(&mut self);
    /// Show the metric field for `kind` (cadence or elevation) and hide the other.
    fn show_metric_field(&mut self, kind: WorkoutKind);
}

/// Popup content for a workout marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLabel {
    pub glyph: String,
    pub label: String,
    /// Styling hook, e.g. `running-popup`.
    pub class_name: String,
}

impl From<&Workout> for MarkerLabel {
    fn from(workout: &Workout) -> Self {
        let kind = workout.kind();
        Self {
            glyph: kind.glyph().to_string(),
            label: workout.description().to_string(),
            class_name: format!("{}-popup", kind),
        }
    }
}

/// One icon/value/unit row of a list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListDetail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// Summary of a workout for the list panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<ListDetail>,
}

impl From<&Workout> for ListEntry {
    fn from(workout: &Workout) -> Self {
        let kind = workout.kind();
        let mut details = vec![
            ListDetail {
                icon: kind.glyph(),
                value: format_number(workout.distance_km()),
                unit: "km",
            },
            ListDetail {
                icon: "⏱",
                value: format_number(workout.duration_min()),
                unit: "min",
            },
        ];

        match *workout.metrics() {
            WorkoutMetrics::Running {
                cadence_steps_per_min,
                pace_min_per_km,
            } => {
                details.push(ListDetail {
                    icon: "⚡️",
                    value: format!("{:.2}", pace_min_per_km),
                    unit: "min/km",
                });
                details.push(ListDetail {
                    icon: "🦶🏼",
                    value: format_number(cadence_steps_per_min),
                    unit: "spm",
                });
            }
            WorkoutMetrics::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                details.push(ListDetail {
                    icon: "⚡️",
                    value: format!("{:.2}", speed_km_per_h),
                    unit: "km/h",
                });
                details.push(ListDetail {
                    icon: "⛰",
                    value: format_number(elevation_gain_m),
                    unit: "m",
                });
            }
        }

        Self {
            id: workout.id().clone(),
            kind,
            title: workout.description().to_string(),
            details,
        }
    }
}

/// Whole numbers without a trailing `.0`, others as-is.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// A rendering request, serialized for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    InitializeMap {
        center: Coordinates,
        zoom: u8,
    },
    PlaceMarker {
        coordinates: Coordinates,
        label: MarkerLabel,
    },
    Recenter {
        coordinates: Coordinates,
        zoom: u8,
    },
    AppendListEntry {
        entry: ListEntry,
    },
    ClearInputSurface,
    Reload,
    OpenForm,
    CloseForm,
    ShowMetricField {
        kind: WorkoutKind,
    },
}

/// Shared buffer of render commands.
///
/// Clones share the same buffer, so one queue can serve as both the map
/// surface and the input surface and keep commands in issue order.
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all commands recorded so far.
    pub fn drain(&self) -> Vec<RenderCommand> {
        std::mem::take(&mut *self.lock())
    }

    fn push(&self, command: RenderCommand) {
        self.lock().push(command);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RenderCommand>> {
        // The buffer is only pushed to or taken whole, so poisoning is harmless.
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MapSurface for RenderQueue {
    fn initialize(&mut self, center: Coordinates, zoom: u8) {
        self.push(RenderCommand::InitializeMap { center, zoom });
    }

    fn place_marker(&mut self, coordinates: Coordinates, label: MarkerLabel) {
        self.push(RenderCommand::PlaceMarker { coordinates, label });
    }

    fn recenter(&mut self, coordinates: Coordinates, zoom: u8) {
        self.push(RenderCommand::Recenter { coordinates, zoom });
    }

    fn append_list_entry(&mut self, entry: ListEntry) {
        self.push(RenderCommand::AppendListEntry { entry });
    }

    fn clear_input_surface(&mut self) {
        self.push(RenderCommand::ClearInputSurface);
    }

    fn reload(&mut self) {
        self.push(RenderCommand::Reload);
    }
}

impl InputSurface for RenderQueue {
    fn open(&mut self) {
        self.push(RenderCommand::OpenForm);
    }

    fn close(&mut self) {
        self.push(RenderCommand::CloseForm);
    }

    fn show_metric_field(&mut self, kind: WorkoutKind) {
        self.push(RenderCommand::ShowMetricField { kind });
    }
}
