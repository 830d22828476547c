//! Core library for M-Hike — a local-first logbook of hikes and field observations.
//!
//! The primary entry point is [`Logbook`], which represents an open logbook
//! database. All reads and writes go through `Logbook` methods; filtering and
//! search run in memory over loaded hikes via [`HikeFilter`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    codec::{decode_hike, decode_observation, encode_hike, encode_observation},
    delete::DeleteResult,
    error::{HikeLogError, Result},
    filter::{search_by_name, HikeFilter},
    hike::{Difficulty, Hike},
    logbook::Logbook,
    noop::NoopBackend,
    observation::Observation,
    settings::{
        load_settings, load_settings_from, save_settings, save_settings_to, LogbookSettings,
        MissingRowPolicy,
    },
    storage::{migrate, RunResult, SqliteBackend, StorageBackend, StoredRow, WriteStatement},
};
