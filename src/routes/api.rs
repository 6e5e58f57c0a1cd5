// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session API routes.
//!
//! Each event endpoint applies one controller event under the session lock
//! and answers with the render commands that event produced, in order.

use crate::error::Result;
use crate::models::{Coordinates, RawWorkoutForm, WorkoutId, WorkoutKind};
use crate::services::{ListEntry, RenderCommand, SessionState};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(submit_workout))
        .route("/api/workouts/{id}/focus", post(focus_workout))
        .route("/api/session", get(get_session))
        .route("/api/session/map", post(map_ready))
        .route("/api/session/pick", post(pick_location))
        .route("/api/session/kind", post(change_kind))
        .route("/api/session/cancel", post(cancel))
        .route("/api/reset", post(reset))
}

// ─── Responses ───────────────────────────────────────────────

/// Render commands produced by one event.
#[derive(Debug, Serialize)]
pub struct CommandsResponse {
    pub commands: Vec<RenderCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CommandsResponse {
    fn new(commands: Vec<RenderCommand>) -> Self {
        Self {
            commands,
            warning: None,
        }
    }
}

/// Result of submitting the workout form.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: String,
    #[serde(flatten)]
    pub render: CommandsResponse,
}

/// Result of clicking a list entry.
#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub recentered: bool,
    #[serde(flatten)]
    pub render: CommandsResponse,
}

/// Current session snapshot.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionState,
    pub selected_kind: WorkoutKind,
    pub map_center: Option<Coordinates>,
    pub workout_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct KindRequest {
    pub kind: WorkoutKind,
}

// ─── Queries ─────────────────────────────────────────────────

/// List entries for every workout, oldest first.
async fn list_workouts(State(state): State<Arc<AppState>>) -> Json<Vec<ListEntry>> {
    let session = state.session.lock().await;
    Json(session.workouts().iter().map(ListEntry::from).collect())
}

async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(SessionResponse {
        session: session.state(),
        selected_kind: session.selected_kind(),
        map_center: session.map_center(),
        workout_count: session.workouts().len(),
    })
}

// ─── Events ──────────────────────────────────────────────────

/// The client acquired its position; initialize the map there.
async fn map_ready(
    State(state): State<Arc<AppState>>,
    Json(center): Json<Coordinates>,
) -> Result<Json<CommandsResponse>> {
    let mut session = state.session.lock().await;
    let result = session.map_ready(center);
    let commands = state.render_queue.drain();
    result?;
    Ok(Json(CommandsResponse::new(commands)))
}

async fn pick_location(
    State(state): State<Arc<AppState>>,
    Json(coordinates): Json<Coordinates>,
) -> Result<Json<CommandsResponse>> {
    let mut session = state.session.lock().await;
    let result = session.location_picked(coordinates);
    let commands = state.render_queue.drain();
    result?;
    Ok(Json(CommandsResponse::new(commands)))
}

async fn change_kind(
    State(state): State<Arc<AppState>>,
    Json(request): Json<KindRequest>,
) -> Json<CommandsResponse> {
    let mut session = state.session.lock().await;
    session.activity_kind_changed(request.kind);
    Json(CommandsResponse::new(state.render_queue.drain()))
}

async fn cancel(State(state): State<Arc<AppState>>) -> Result<Json<CommandsResponse>> {
    let mut session = state.session.lock().await;
    let result = session.cancel();
    let commands = state.render_queue.drain();
    result?;
    Ok(Json(CommandsResponse::new(commands)))
}

/// Submit the workout form for the pending location.
async fn submit_workout(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RawWorkoutForm>,
) -> Result<Json<SubmitResponse>> {
    let mut session = state.session.lock().await;
    let result = session.submit(form);
    let commands = state.render_queue.drain();
    let outcome = result?;

    let mut render = CommandsResponse::new(commands);
    render.warning = outcome.warning;
    Ok(Json(SubmitResponse {
        id: outcome.id.to_string(),
        render,
    }))
}

async fn focus_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<FocusResponse> {
    let mut session = state.session.lock().await;
    let recentered = session.list_entry_clicked(&WorkoutId::from(id));
    Json(FocusResponse {
        recentered,
        render: CommandsResponse::new(state.render_queue.drain()),
    })
}

/// Clear all stored workouts and restart the session.
async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<CommandsResponse>> {
    let mut session = state.session.lock().await;
    tracing::info!(
        workouts = session.workouts().len(),
        "Resetting workout store"
    );
    let result = session.reset();
    let commands = state.render_queue.drain();
    result?;
    Ok(Json(CommandsResponse::new(commands)))
}
