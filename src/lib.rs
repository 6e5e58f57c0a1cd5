// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log runs and rides against a map.
//!
//! This crate provides the workout model, the persisted workout collection,
//! and the session controller that turns map clicks and form submits into
//! workouts, plus an HTTP API that drives the controller for a map client.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::KeyValueStore;
use services::{RenderQueue, SessionController};
use tokio::sync::Mutex;

/// Controller type served over HTTP; both surfaces share one render queue.
pub type HttpSession = SessionController<Box<dyn KeyValueStore + Send>, RenderQueue, RenderQueue>;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Events are applied one at a time under this lock.
    pub session: Mutex<HttpSession>,
    /// Commands produced by the session, drained into each response.
    pub render_queue: RenderQueue,
}

impl AppState {
    /// Build state around `store`. The session is not started yet.
    pub fn new(config: Config, store: Box<dyn KeyValueStore + Send>) -> Self {
        let render_queue = RenderQueue::new();
        let session = SessionController::new(
            store,
            render_queue.clone(),
            render_queue.clone(),
            config.map_zoom,
        );
        Self {
            config,
            session: Mutex::new(session),
            render_queue,
        }
    }
}
