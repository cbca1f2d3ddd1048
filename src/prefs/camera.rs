//! Per-board camera positions, cached in local storage.
//!
//! All boards share one JSON mapping `{board_id: {x, y, scale}}` stored
//! under [`STORAGE_KEY`]. Every write rewrites the whole mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{self, KvStore};

#[cfg(test)]
#[path = "camera_test.rs"]
mod tests;

pub const STORAGE_KEY: &str = "boardshare_camera_positions";

/// Pan offset and zoom factor of the canvas camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    /// Zoom factor, 1.0 = no zoom.
    pub scale: f64,
}

impl CameraPosition {
    /// Finite coordinates and a positive finite zoom. Anything else would not
    /// survive a JSON round trip.
    #[must_use]
    pub fn is_usable(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

type Positions = BTreeMap<String, CameraPosition>;

pub struct CameraStorage<S> {
    store: S,
}

impl<S: KvStore> CameraStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Store `position` for `board_id`. Unusable positions are dropped so
    /// they cannot corrupt the mapping shared with other boards.
    pub fn save(&self, board_id: &str, position: CameraPosition) {
        if !position.is_usable() {
            warn!(
                board_id,
                x = position.x,
                y = position.y,
                scale = position.scale,
                "ignoring unusable camera position"
            );
            return;
        }
        let mut positions = self.all();
        positions.insert(board_id.to_owned(), position);
        storage::save_json(&self.store, STORAGE_KEY, &positions);
    }

    pub fn get(&self, board_id: &str) -> Option<CameraPosition> {
        self.all().get(board_id).copied()
    }

    pub fn remove(&self, board_id: &str) {
        let mut positions = self.all();
        if positions.remove(board_id).is_some() {
            storage::save_json(&self.store, STORAGE_KEY, &positions);
        }
    }

    pub fn clear(&self) {
        storage::remove_key(&self.store, STORAGE_KEY);
    }

    /// Every stored position keyed by board id.
    pub fn all(&self) -> BTreeMap<String, CameraPosition> {
        storage::load_json::<Positions>(&self.store, STORAGE_KEY).unwrap_or_default()
    }
}
