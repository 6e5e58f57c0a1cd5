// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session controller.
//!
//! Drives one user session through two states:
//!
//! ```text
//!   Idle --location_picked--> AwaitingInput --submit ok--> Idle
//!                                  |  ^       --cancel---> Idle
//!                                  |  |
//!                   activity_kind_changed / submit failed
//! ```
//!
//! Events are handled one at a time. The controller owns the workout
//! collection; rendering and form handling go through injected surfaces.
//!
//! Workouts restored at startup are rendered as list entries only. Markers
//! need a live map, and restoring happens before any map exists, so restored
//! workouts never get one.

use crate::db::KeyValueStore;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, RawWorkoutForm, Workout, WorkoutId, WorkoutKind};
use crate::services::collection::WorkoutCollection;
use crate::services::surface::{InputSurface, ListEntry, MapSurface, MarkerLabel};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;

/// Where the session is in the logging flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingInput { coordinates: Coordinates },
}

/// Result of restoring persisted workouts at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    pub restored: usize,
    /// Set when the store was unreadable and has been discarded.
    pub discarded_corrupt_store: bool,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub id: WorkoutId,
    /// Non-fatal persistence warning; the workout is still in the session.
    pub warning: Option<String>,
}

/// Orchestrates location picks, form submits and list clicks.
pub struct SessionController<S, M, I> {
    collection: WorkoutCollection<S>,
    map: M,
    input: I,
    state: SessionState,
    selected_kind: WorkoutKind,
    map_center: Option<Coordinates>,
    zoom: u8,
}

impl<S, M, I> SessionController<S, M, I>
where
    S: KeyValueStore,
    M: MapSurface,
    I: InputSurface,
{
    pub fn new(store: S, map: M, input: I, zoom: u8) -> Self {
        Self {
            collection: WorkoutCollection::new(store),
            map,
            input,
            state: SessionState::Idle,
            selected_kind: WorkoutKind::Running,
            map_center: None,
            zoom,
        }
    }

    /// Restore persisted workouts and render a list entry for each.
    ///
    /// A corrupt store is discarded and the session starts empty.
    pub fn start(&mut self) -> Result<StartReport> {
        let discarded_corrupt_store = match self.collection.restore() {
            Ok(_) => false,
            Err(AppError::CorruptStore(reason)) => {
                tracing::warn!(reason = %reason, "Starting with an empty collection");
                true
            }
            Err(e) => return Err(e),
        };

        for workout in self.collection.workouts() {
            self.map.append_list_entry(ListEntry::from(workout));
        }

        self.state = SessionState::Idle;
        let restored = self.collection.len();
        tracing::info!(restored, "Session started");

        Ok(StartReport {
            restored,
            discarded_corrupt_store,
        })
    }

    /// A live map context is available, centered on the user's location.
    pub fn map_ready(&mut self, center: Coordinates) -> Result<()> {
        center.validate()?;
        self.map.initialize(center, self.zoom);
        self.map_center = Some(center);
        tracing::info!(lat = center.lat, lng = center.lng, "Map initialized");
        Ok(())
    }

    /// The location provider failed; no map context will be created.
    pub fn location_unavailable(&mut self, reason: &str) {
        tracing::warn!(reason, "Could not get current position");
    }

    /// `Idle | AwaitingInput --location_picked--> AwaitingInput`
    pub fn location_picked(&mut self, coordinates: Coordinates) -> Result<()> {
        if self.map_center.is_none() {
            return Err(AppError::LocationUnavailable(
                "map is not initialized".to_string(),
            ));
        }
        coordinates.validate()?;

        self.state = SessionState::AwaitingInput { coordinates };
        self.input.open();
        tracing::debug!(
            lat = coordinates.lat,
            lng = coordinates.lng,
            "Location picked"
        );
        Ok(())
    }

    /// Toggle which metric field the form shows. Ignored while idle.
    pub fn activity_kind_changed(&mut self, kind: WorkoutKind) {
        if !self.is_awaiting_input() {
            tracing::debug!(kind = %kind, "Ignoring kind change with no pending location");
            return;
        }
        self.selected_kind = kind;
        self.input.show_metric_field(kind);
    }

    /// `AwaitingInput --submit--> Idle` on success.
    ///
    /// On `InvalidInput` the session stays in `AwaitingInput`, nothing is
    /// appended and no rendering is requested.
    pub fn submit(&mut self, form: RawWorkoutForm) -> Result<SubmitOutcome> {
        let SessionState::AwaitingInput { coordinates } = self.state else {
            return Err(AppError::NotAwaitingInput);
        };

        let workout = form.into_workout(coordinates).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected workout form");
        })?;

        let id = workout.id().clone();
        let kind = workout.kind();
        let created_at = format_utc_rfc3339(workout.created_at());
        let marker = MarkerLabel::from(&workout);
        let entry = ListEntry::from(&workout);

        let outcome = self.collection.append(workout)?;

        self.map.place_marker(coordinates, marker);
        self.map.append_list_entry(entry);
        self.input.close();
        self.map.clear_input_surface();
        self.state = SessionState::Idle;

        tracing::info!(
            workout_id = %id,
            kind = %kind,
            created_at = %created_at,
            "Workout logged"
        );

        Ok(SubmitOutcome {
            id,
            warning: outcome.warning().map(str::to_string),
        })
    }

    /// `AwaitingInput --cancel--> Idle`
    pub fn cancel(&mut self) -> Result<()> {
        if !self.is_awaiting_input() {
            return Err(AppError::NotAwaitingInput);
        }
        self.input.close();
        self.map.clear_input_surface();
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Recenter the map on a listed workout.
    ///
    /// Returns `false` without doing anything if there is no map yet or the
    /// id is unknown.
    pub fn list_entry_clicked(&mut self, id: &WorkoutId) -> bool {
        if self.map_center.is_none() {
            tracing::debug!(workout_id = %id, "No map to recenter");
            return false;
        }
        let Some(workout) = self.collection.find(id) else {
            tracing::debug!(workout_id = %id, "Clicked workout not found");
            return false;
        };

        self.map.recenter(workout.coordinates(), self.zoom);
        true
    }

    /// Clear the store and restart the session from a clean slate.
    pub fn reset(&mut self) -> Result<()> {
        self.collection.reset()?;
        self.state = SessionState::Idle;
        self.selected_kind = WorkoutKind::Running;
        // The reloaded client has no map until it reports a location again.
        self.map_center = None;
        self.map.reload();
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting_input(&self) -> bool {
        matches!(self.state, SessionState::AwaitingInput { .. })
    }

    pub fn selected_kind(&self) -> WorkoutKind {
        self.selected_kind
    }

    pub fn map_center(&self) -> Option<Coordinates> {
        self.map_center
    }

    pub fn workouts(&self) -> &[Workout] {
        self.collection.workouts()
    }

    pub fn collection(&self) -> &WorkoutCollection<S> {
        &self.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{keys, MemoryStore};
    use crate::models::WorkoutMetrics;
    use crate::services::surface::{RenderCommand, RenderQueue};
    use crate::time_utils::month_day_label;

    type TestController = SessionController<MemoryStore, RenderQueue, RenderQueue>;

    const PARIS: Coordinates = Coordinates {
        lat: 48.85,
        lng: 2.35,
    };

    fn controller_with(store: MemoryStore) -> (TestController, RenderQueue) {
        let queue = RenderQueue::new();
        let controller = SessionController::new(store, queue.clone(), queue.clone(), 15);
        (controller, queue)
    }

    fn ready_controller() -> (TestController, RenderQueue) {
        let (mut controller, queue) = controller_with(MemoryStore::new());
        controller.start().unwrap();
        controller.map_ready(PARIS).unwrap();
        queue.drain();
        (controller, queue)
    }

    fn running_form(distance: &str, duration: &str, cadence: &str) -> RawWorkoutForm {
        RawWorkoutForm {
            kind: "running".to_string(),
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    fn count(commands: &[RenderCommand], pred: fn(&RenderCommand) -> bool) -> usize {
        commands.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_submit_running_scenario() {
        let (mut controller, queue) = ready_controller();

        controller.location_picked(PARIS).unwrap();
        assert_eq!(queue.drain(), vec![RenderCommand::OpenForm]);

        let outcome = controller
            .submit(running_form("5", "25", "178"))
            .unwrap();

        assert_eq!(outcome.warning, None);
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.workouts().len(), 1);

        let workout = &controller.workouts()[0];
        assert_eq!(workout.id(), &outcome.id);
        assert_eq!(workout.coordinates(), PARIS);
        assert_eq!(
            workout.metrics(),
            &WorkoutMetrics::Running {
                cadence_steps_per_min: 178.0,
                pace_min_per_km: 5.0,
            }
        );
        assert_eq!(
            workout.description(),
            format!("Running on {}", month_day_label(workout.created_at()))
        );

        let commands = queue.drain();
        assert_eq!(
            count(&commands, |c| matches!(c, RenderCommand::PlaceMarker { .. })),
            1
        );
        assert_eq!(
            count(&commands, |c| matches!(
                c,
                RenderCommand::AppendListEntry { .. }
            )),
            1
        );
        assert!(commands.contains(&RenderCommand::CloseForm));
        assert!(commands.contains(&RenderCommand::ClearInputSurface));
    }

    #[test]
    fn test_invalid_submit_keeps_awaiting_input() {
        let (mut controller, queue) = ready_controller();
        controller.location_picked(PARIS).unwrap();
        queue.drain();

        let result = controller.submit(running_form("0", "25", "178"));

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(controller.workouts().is_empty());
        assert_eq!(
            controller.state(),
            SessionState::AwaitingInput {
                coordinates: PARIS
            }
        );
        assert!(queue.drain().is_empty());
        assert_eq!(controller.collection().store().writes(), 0);

        // The form is still open; a corrected submit goes through.
        controller.submit(running_form("5", "25", "178")).unwrap();
        assert_eq!(controller.workouts().len(), 1);
    }

    #[test]
    fn test_cycling_allows_negative_elevation() {
        let (mut controller, _queue) = ready_controller();
        controller.location_picked(PARIS).unwrap();
        controller.activity_kind_changed(WorkoutKind::Cycling);

        let form = RawWorkoutForm {
            kind: "cycling".to_string(),
            distance: "30".to_string(),
            duration: "90".to_string(),
            cadence: String::new(),
            elevation: "-250".to_string(),
        };
        controller.submit(form).unwrap();

        assert_eq!(
            controller.workouts()[0].metrics(),
            &WorkoutMetrics::Cycling {
                elevation_gain_m: -250.0,
                speed_km_per_h: 20.0,
            }
        );
    }

    #[test]
    fn test_submit_while_idle_is_rejected() {
        let (mut controller, queue) = ready_controller();
        assert!(matches!(
            controller.submit(running_form("5", "25", "178")),
            Err(AppError::NotAwaitingInput)
        ));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_location_pick_requires_map() {
        let (mut controller, queue) = controller_with(MemoryStore::new());
        controller.start().unwrap();
        controller.location_unavailable("permission denied");

        assert!(matches!(
            controller.location_picked(PARIS),
            Err(AppError::LocationUnavailable(_))
        ));
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_second_pick_replaces_pending_location() {
        let (mut controller, _queue) = ready_controller();
        let elsewhere = Coordinates {
            lat: 45.76,
            lng: 4.84,
        };
        controller.location_picked(PARIS).unwrap();
        controller.location_picked(elsewhere).unwrap();

        controller.submit(running_form("5", "25", "178")).unwrap();
        assert_eq!(controller.workouts()[0].coordinates(), elsewhere);
    }

    #[test]
    fn test_kind_change_toggles_field_only_while_awaiting_input() {
        let (mut controller, queue) = ready_controller();

        controller.activity_kind_changed(WorkoutKind::Cycling);
        assert!(queue.drain().is_empty());

        controller.location_picked(PARIS).unwrap();
        queue.drain();
        controller.activity_kind_changed(WorkoutKind::Cycling);

        assert_eq!(
            queue.drain(),
            vec![RenderCommand::ShowMetricField {
                kind: WorkoutKind::Cycling
            }]
        );
        assert_eq!(controller.selected_kind(), WorkoutKind::Cycling);
        assert!(controller.workouts().is_empty());
        assert!(controller.is_awaiting_input());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let (mut controller, queue) = ready_controller();
        controller.location_picked(PARIS).unwrap();
        queue.drain();

        controller.cancel().unwrap();

        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(
            queue.drain(),
            vec![RenderCommand::CloseForm, RenderCommand::ClearInputSurface]
        );
        assert!(matches!(
            controller.cancel(),
            Err(AppError::NotAwaitingInput)
        ));
    }

    #[test]
    fn test_restored_workouts_get_list_entries_but_no_markers() {
        let (mut first, _) = ready_controller();
        for _ in 0..2 {
            first.location_picked(PARIS).unwrap();
            first.submit(running_form("5", "25", "178")).unwrap();
        }
        let store = first.collection().store().clone();

        let (mut second, queue) = controller_with(store);
        let report = second.start().unwrap();
        assert_eq!(report.restored, 2);
        assert!(!report.discarded_corrupt_store);

        second.map_ready(PARIS).unwrap();
        let commands = queue.drain();
        assert_eq!(
            count(&commands, |c| matches!(
                c,
                RenderCommand::AppendListEntry { .. }
            )),
            2
        );
        assert_eq!(
            count(&commands, |c| matches!(c, RenderCommand::PlaceMarker { .. })),
            0
        );
    }

    #[test]
    fn test_list_click_is_noop_without_map() {
        let (mut first, _) = ready_controller();
        first.location_picked(PARIS).unwrap();
        let id = first.submit(running_form("5", "25", "178")).unwrap().id;
        let store = first.collection().store().clone();

        let (mut second, queue) = controller_with(store);
        second.start().unwrap();
        queue.drain();

        assert!(!second.list_entry_clicked(&id));
        assert!(queue.drain().is_empty());

        second.map_ready(PARIS).unwrap();
        queue.drain();
        assert!(second.list_entry_clicked(&id));
        assert_eq!(
            queue.drain(),
            vec![RenderCommand::Recenter {
                coordinates: PARIS,
                zoom: 15
            }]
        );
    }

    #[test]
    fn test_list_click_unknown_id_is_noop() {
        let (mut controller, queue) = ready_controller();
        assert!(!controller.list_entry_clicked(&WorkoutId::from("missing")));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_corrupt_store_starts_empty() {
        let mut store = MemoryStore::new();
        store
            .set_item(keys::WORKOUTS, r#"[{"kind":"running","id":"x"}]"#)
            .unwrap();
        let (mut controller, queue) = controller_with(store);

        let report = controller.start().unwrap();

        assert_eq!(report.restored, 0);
        assert!(report.discarded_corrupt_store);
        assert!(controller.workouts().is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_persistence_failure_is_a_warning() {
        let (mut controller, queue) = controller_with(MemoryStore::with_quota(10));
        controller.start().unwrap();
        controller.map_ready(PARIS).unwrap();
        controller.location_picked(PARIS).unwrap();
        queue.drain();

        let outcome = controller.submit(running_form("5", "25", "178")).unwrap();

        assert!(outcome.warning.is_some());
        assert_eq!(controller.workouts().len(), 1);
        assert_eq!(
            count(&queue.drain(), |c| matches!(
                c,
                RenderCommand::PlaceMarker { .. }
            )),
            1
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut controller, queue) = ready_controller();
        controller.location_picked(PARIS).unwrap();
        controller.submit(running_form("5", "25", "178")).unwrap();
        controller.location_picked(PARIS).unwrap();
        queue.drain();

        controller.reset().unwrap();

        assert!(controller.workouts().is_empty());
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(controller.map_center(), None);
        assert_eq!(queue.drain(), vec![RenderCommand::Reload]);
        assert_eq!(
            controller.collection().store().get_item(keys::WORKOUTS).unwrap(),
            None
        );

        // Picking needs a fresh map after the reload.
        assert!(matches!(
            controller.location_picked(PARIS),
            Err(AppError::LocationUnavailable(_))
        ));
    }
}
