// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout collection and its persistence bridge.
//!
//! The collection is the authoritative, insertion-ordered list of workouts
//! for one session. Every append rewrites the whole list under
//! `keys::WORKOUTS`. A failed write is reported to the caller but never
//! rolls back the in-memory list.

use crate::db::schema::{decode_collection, encode_collection};
use crate::db::{keys, KeyValueStore};
use crate::error::{AppError, Result};
use crate::models::{Workout, WorkoutId};
use std::collections::HashSet;

/// Outcome of persisting the collection after an append.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PersistOutcome {
    Saved,
    /// The write failed; in-memory state remains authoritative.
    Failed(String),
}

impl PersistOutcome {
    /// Warning text for the user, if the write failed.
    pub fn warning(&self) -> Option<&str> {
        match self {
            PersistOutcome::Saved => None,
            PersistOutcome::Failed(msg) => Some(msg),
        }
    }
}

/// Ordered workout collection bound to a key-value store.
pub struct WorkoutCollection<S> {
    workouts: Vec<Workout>,
    store: S,
}

impl<S: KeyValueStore> WorkoutCollection<S> {
    /// Empty collection over `store`. Call [`restore`](Self::restore) to load.
    pub fn new(store: S) -> Self {
        Self {
            workouts: Vec::new(),
            store,
        }
    }

    /// Append a workout and persist the whole collection.
    ///
    /// Fails only if the id is already present; storage failures come back
    /// as [`PersistOutcome::Failed`].
    pub fn append(&mut self, workout: Workout) -> Result<PersistOutcome> {
        if self.find(workout.id()).is_some() {
            return Err(AppError::DuplicateId(workout.id().to_string()));
        }

        self.workouts.push(workout);
        Ok(self.persist())
    }

    /// Replace the in-memory list with the stored one.
    ///
    /// No stored value yields an empty list. Unreadable data, records that
    /// fail model validation and duplicate ids are `CorruptStore`; in that
    /// case the stored value is discarded and the collection is left empty.
    pub fn restore(&mut self) -> Result<&[Workout]> {
        self.workouts.clear();

        let Some(data) = self.store.get_item(keys::WORKOUTS)? else {
            tracing::debug!("No stored workouts");
            return Ok(&self.workouts);
        };

        match decode_collection(&data).and_then(reject_duplicate_ids) {
            Ok(workouts) => {
                tracing::info!(count = workouts.len(), "Restored workouts");
                self.workouts = workouts;
                Ok(&self.workouts)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable workout store");
                if let Err(e) = self.store.remove_item(keys::WORKOUTS) {
                    tracing::warn!(error = %e, "Failed to remove corrupt workout store");
                }
                Err(err)
            }
        }
    }

    /// Clear the stored collection and the in-memory list.
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove_item(keys::WORKOUTS)?;
        self.workouts.clear();
        tracing::info!("Workout store reset");
        Ok(())
    }

    /// Look up a workout by id.
    pub fn find(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Workouts in creation order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> PersistOutcome {
        let written = encode_collection(&self.workouts).and_then(|data| {
            self.store
                .set_item(keys::WORKOUTS, &data)
                .map_err(AppError::from)
        });

        match written {
            Ok(()) => {
                tracing::debug!(count = self.workouts.len(), "Persisted workouts");
                PersistOutcome::Saved
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to persist workouts");
                PersistOutcome::Failed(err.to_string())
            }
        }
    }
}

fn reject_duplicate_ids(workouts: Vec<Workout>) -> Result<Vec<Workout>> {
    {
        let mut seen = HashSet::with_capacity(workouts.len());
        for workout in &workouts {
            if !seen.insert(workout.id()) {
                return Err(AppError::CorruptStore(format!(
                    "duplicate workout id {}",
                    workout.id()
                )));
            }
        }
    }
    Ok(workouts)
}
