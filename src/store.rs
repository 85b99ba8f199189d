use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{total_distance, DisplayData, Landmark, Pipe};

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReport {
    pub individual_pipes: Vec<Pipe>,
    pub total_distance: f64,
}

// An empty register reports a total of `0`, not `0.0`.
impl Serialize for DistanceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut report = serializer.serialize_struct("DistanceReport", 2)?;
        report.serialize_field("individual_pipes", &self.individual_pipes)?;
        if self.individual_pipes.is_empty() {
            report.serialize_field("total_distance", &0u64)?;
        } else {
            report.serialize_field("total_distance", &self.total_distance)?;
        }
        report.end()
    }
}

/// Process-wide map state. Each register has its own lock and no operation
/// holds two of them at once, so concurrent writers simply race and the last
/// one to finish wins.
#[derive(Debug, Default)]
pub struct MapStore {
    pipes: RwLock<Vec<Pipe>>,
    landmarks: RwLock<Vec<Landmark>>,
    saved_maps: RwLock<HashMap<String, Value>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MapStore {
    pub fn new() -> MapStore {
        MapStore::default()
    }

    /// Replace the pipe register. An empty submission still clears it, but is
    /// reported as an error.
    pub fn submit_pipes(&self, pipes: Vec<Pipe>) -> Result<Vec<Pipe>, StoreError> {
        if pipes.is_empty() {
            write(&self.pipes).clear();
            info!("pipe register cleared by empty submission");
            return Err(StoreError::NoPipesSelected);
        }

        info!(count = pipes.len(), "storing pipes");
        *write(&self.pipes) = pipes.clone();
        Ok(pipes)
    }

    pub fn distances(&self) -> DistanceReport {
        let pipes = read(&self.pipes).clone();
        let total_distance = total_distance(&pipes);
        DistanceReport {
            individual_pipes: pipes,
            total_distance,
        }
    }

    /// Replace the landmark register, empty list included.
    pub fn submit_landmarks(&self, landmarks: Vec<Landmark>) -> Vec<Landmark> {
        info!(count = landmarks.len(), "storing landmarks");
        *write(&self.landmarks) = landmarks.clone();
        landmarks
    }

    pub fn landmarks(&self) -> Result<Vec<Landmark>, StoreError> {
        let landmarks = read(&self.landmarks);
        if landmarks.is_empty() {
            return Err(StoreError::NoLandmarks);
        }
        Ok(landmarks.clone())
    }

    pub fn save_map(&self, user_id: String, map_data: Value) {
        info!(%user_id, "saving map");
        write(&self.saved_maps).insert(user_id, map_data);
    }

    pub fn load_map(&self, user_id: &str) -> Result<Value, StoreError> {
        match read(&self.saved_maps).get(user_id) {
            Some(map_data) => Ok(map_data.clone()),
            None => {
                debug!(%user_id, "no saved map");
                Err(StoreError::MapNotFound)
            }
        }
    }

    /// Current pipes and landmarks. The two registers are read one after the
    /// other, not as a snapshot.
    pub fn display_data(&self) -> Result<DisplayData, StoreError> {
        let pipes = read(&self.pipes).clone();
        let landmarks = read(&self.landmarks).clone();
        let data = DisplayData::combine(pipes, landmarks);
        if data.is_empty() {
            return Err(StoreError::NoDisplayData);
        }
        Ok(data)
    }
}
