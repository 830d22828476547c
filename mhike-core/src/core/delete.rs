//! Result type for hike removal.
//!
//! Deleting a hike always removes its observations as well, inside the same
//! transaction. [`DeleteResult`] reports how many rows of each kind went.
//!
//! ## Serialization
//!
//! Fields serialize in camelCase (`hikesDeleted`, `observationsDeleted`),
//! consistent with every other type that crosses the UI boundary.
//!
//! ## Examples
//!
//! ```rust
//! use mhike_core::DeleteResult;
//!
//! let result = DeleteResult {
//!     hikes_deleted: 1,
//!     observations_deleted: 2,
//! };
//! let json = serde_json::to_string(&result).unwrap();
//! assert!(json.contains("hikesDeleted"));
//! assert!(json.contains("observationsDeleted"));
//! ```

use serde::{Deserialize, Serialize};

/// The outcome of [`Logbook::delete_hike`](crate::Logbook::delete_hike) or
/// [`Logbook::delete_all_hikes`](crate::Logbook::delete_all_hikes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Hike rows removed. Zero when the id did not exist.
    pub hikes_deleted: usize,

    /// Observation rows removed along with their parent hikes.
    pub observations_deleted: usize,
}

impl DeleteResult {
    /// True when nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.hikes_deleted == 0 && self.observations_deleted == 0
    }
}
