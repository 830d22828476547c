//! High-level logbook operations over a storage backend.

use crate::core::codec::{decode_hike, decode_observation, encode_hike, encode_observation};
use crate::core::storage::migrate;
use crate::{
    search_by_name, DeleteResult, Hike, HikeFilter, HikeLogError, LogbookSettings,
    MissingRowPolicy, NoopBackend, Observation, Result, SqliteBackend, StorageBackend,
    StoredRow, WriteStatement,
};
use rusqlite::types::Value;
use std::path::Path;

const INSERT_HIKE: &str = "INSERT INTO Hike (name, location, date, parkingAvailable, length, difficulty, description, images)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE_HIKE: &str = "UPDATE Hike
     SET name = ?, location = ?, date = ?, parkingAvailable = ?, length = ?, difficulty = ?, description = ?, images = ?
     WHERE id = ?";
const SELECT_HIKE: &str = "SELECT * FROM Hike WHERE id = ?";
const SELECT_ALL_HIKES: &str = "SELECT * FROM Hike";

const INSERT_OBSERVATION: &str = "INSERT INTO Observation (name, description, hikeId) VALUES (?, ?, ?)";
const UPDATE_OBSERVATION: &str = "UPDATE Observation SET name = ?, description = ?, hikeId = ? WHERE id = ?";
const SELECT_OBSERVATION: &str = "SELECT * FROM Observation WHERE id = ?";
const SELECT_ALL_OBSERVATIONS: &str = "SELECT * FROM Observation";
const SELECT_OBSERVATIONS_FOR_HIKE: &str = "SELECT * FROM Observation WHERE hikeId = ?";
const DELETE_OBSERVATION: &str = "DELETE FROM Observation WHERE id = ?";
const DELETE_OBSERVATIONS_FOR_HIKE: &str = "DELETE FROM Observation WHERE hikeId = ?";

/// An open logbook: the CRUD service for hikes and their observations.
///
/// Create one at startup with [`Logbook::open`] (or one of its siblings),
/// share it by reference, and call [`Logbook::close`] on shutdown. The schema
/// is created when the handle is constructed, so every other method may
/// assume both tables exist.
///
/// Deleting a hike always takes its observations with it, in one
/// transaction. Updates replace every mutable field; what happens when the
/// id does not exist is governed by [`MissingRowPolicy`].
pub struct Logbook {
    backend: Box<dyn StorageBackend>,
    missing_row_policy: MissingRowPolicy,
}

impl Logbook {
    /// Opens (or creates) the logbook database at `path` and ensures the schema.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if the file is not a usable SQLite
    /// database.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let backend = SqliteBackend::open(path)?;
        let logbook = Self::with_backend(Box::new(backend)).await?;
        log::info!("Opened logbook at {}", path.display());
        Ok(logbook)
    }

    /// Opens a throwaway logbook held entirely in memory.
    pub async fn open_in_memory() -> Result<Self> {
        Self::with_backend(Box::new(SqliteBackend::open_in_memory()?)).await
    }

    /// Opens the logbook at `path`, falling back to a [`NoopBackend`] if the
    /// native engine cannot be used.
    ///
    /// The fallback accepts every call and returns empty results, so the
    /// application keeps running with an empty, non-persistent logbook.
    pub async fn open_or_degrade<P: AsRef<Path>>(path: P) -> Self {
        match Self::open(&path).await {
            Ok(logbook) => logbook,
            Err(e) => {
                log::warn!(
                    "Logbook storage unavailable at {}, continuing without persistence: {e}",
                    path.as_ref().display()
                );
                Self {
                    backend: Box::new(NoopBackend),
                    missing_row_policy: MissingRowPolicy::default(),
                }
            }
        }
    }

    /// Opens the database named by `settings` and applies its policy.
    ///
    /// Missing parent directories of the database file are created.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Io`] if the directory cannot be created, or
    /// [`HikeLogError::Database`] if the database cannot be opened.
    pub async fn from_settings(settings: &LogbookSettings) -> Result<Self> {
        let path = Path::new(&settings.database_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let parent = parent.to_path_buf();
            tokio::task::spawn_blocking(move || std::fs::create_dir_all(parent)).await??;
        }
        Ok(Self::open(path)
            .await?
            .with_missing_row_policy(settings.missing_row_policy))
    }

    /// Wraps an arbitrary backend and runs the schema migration on it.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports if the migration is rejected.
    pub async fn with_backend(backend: Box<dyn StorageBackend>) -> Result<Self> {
        migrate(backend.as_ref()).await?;
        Ok(Self {
            backend,
            missing_row_policy: MissingRowPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_missing_row_policy(mut self, policy: MissingRowPolicy) -> Self {
        self.missing_row_policy = policy;
        self
    }

    pub fn missing_row_policy(&self) -> MissingRowPolicy {
        self.missing_row_policy
    }

    /// Closes the underlying connection.
    pub async fn close(self) -> Result<()> {
        self.backend.close().await?;
        log::info!("Closed logbook");
        Ok(())
    }

    // ── Hikes ─────────────────────────────────────────────────────

    /// Inserts `hike` and returns the id the store assigned to it.
    ///
    /// `hike.id` is ignored. Ids increase monotonically and are never reused,
    /// even after the hike is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if the insert fails.
    pub async fn add_hike(&self, hike: &Hike) -> Result<i64> {
        let result = self.backend.run(INSERT_HIKE, encode_hike(hike)?).await?;
        log::debug!("Added hike {}", result.last_insert_id);
        Ok(result.last_insert_id)
    }

    /// Fetches one hike, or `None` if no hike has `id`.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] for SQLite failures or
    /// [`HikeLogError::CorruptRecord`] if the row cannot be decoded.
    pub async fn get_hike(&self, id: i64) -> Result<Option<Hike>> {
        self.backend
            .fetch_first(SELECT_HIKE, vec![Value::Integer(id)])
            .await?
            .map(|row| decode_hike(&row))
            .transpose()
    }

    /// Returns every hike in store order. Sort explicitly if order matters.
    ///
    /// Rows that cannot be decoded are skipped with a warning, so one damaged
    /// record never hides the rest.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] for SQLite failures.
    pub async fn list_hikes(&self) -> Result<Vec<Hike>> {
        let rows = self.backend.fetch_all(SELECT_ALL_HIKES, vec![]).await?;
        Ok(decode_all(&rows, decode_hike))
    }

    /// Replaces every mutable field of hike `id` with the values in `hike`.
    ///
    /// `hike.id` is ignored; `id` selects the row.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::HikeNotFound`] if `id` does not exist and the
    /// policy is [`MissingRowPolicy::Reject`], or [`HikeLogError::Database`]
    /// if the update fails.
    pub async fn update_hike(&self, id: i64, hike: &Hike) -> Result<()> {
        let mut params = encode_hike(hike)?;
        params.push(Value::Integer(id));
        let result = self.backend.run(UPDATE_HIKE, params).await?;
        if result.changes == 0 {
            return self.on_missing_row(HikeLogError::HikeNotFound(id));
        }
        log::debug!("Updated hike {id}");
        Ok(())
    }

    /// Deletes hike `id` and all of its observations in one transaction.
    ///
    /// A missing id is not an error; the result simply reports zero rows.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if either delete fails, in which
    /// case neither is applied.
    pub async fn delete_hike(&self, id: i64) -> Result<DeleteResult> {
        let results = self
            .backend
            .run_atomic(vec![
                WriteStatement::new(DELETE_OBSERVATIONS_FOR_HIKE, vec![Value::Integer(id)]),
                WriteStatement::new("DELETE FROM Hike WHERE id = ?", vec![Value::Integer(id)]),
            ])
            .await?;
        let deleted = delete_result(&results);
        log::debug!(
            "Deleted hike {id} ({} observations)",
            deleted.observations_deleted
        );
        Ok(deleted)
    }

    /// Deletes every observation and then every hike, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if either delete fails, in which
    /// case neither is applied.
    pub async fn delete_all_hikes(&self) -> Result<DeleteResult> {
        let results = self
            .backend
            .run_atomic(vec![
                WriteStatement::new("DELETE FROM Observation", vec![]),
                WriteStatement::new("DELETE FROM Hike", vec![]),
            ])
            .await?;
        let deleted = delete_result(&results);
        log::debug!(
            "Deleted all hikes ({} hikes, {} observations)",
            deleted.hikes_deleted,
            deleted.observations_deleted
        );
        Ok(deleted)
    }

    /// Loads every hike and keeps those matching `filter`.
    pub async fn filter_hikes(&self, filter: &HikeFilter) -> Result<Vec<Hike>> {
        Ok(filter.apply(&self.list_hikes().await?))
    }

    /// Loads every hike and keeps those whose name contains `query`, ignoring case.
    pub async fn search_hikes(&self, query: &str) -> Result<Vec<Hike>> {
        Ok(search_by_name(&self.list_hikes().await?, query))
    }

    // ── Observations ──────────────────────────────────────────────

    /// Inserts `observation` and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if the insert fails, including when
    /// `observation.hike_id` names no existing hike.
    pub async fn add_observation(&self, observation: &Observation) -> Result<i64> {
        let result = self
            .backend
            .run(INSERT_OBSERVATION, encode_observation(observation))
            .await?;
        log::debug!(
            "Added observation {} to hike {}",
            result.last_insert_id,
            observation.hike_id
        );
        Ok(result.last_insert_id)
    }

    /// Fetches one observation, or `None` if no observation has `id`.
    pub async fn get_observation(&self, id: i64) -> Result<Option<Observation>> {
        self.backend
            .fetch_first(SELECT_OBSERVATION, vec![Value::Integer(id)])
            .await?
            .map(|row| decode_observation(&row))
            .transpose()
    }

    /// Returns every observation in store order, skipping undecodable rows.
    pub async fn list_observations(&self) -> Result<Vec<Observation>> {
        let rows = self.backend.fetch_all(SELECT_ALL_OBSERVATIONS, vec![]).await?;
        Ok(decode_all(&rows, decode_observation))
    }

    /// Returns the observations recorded on hike `hike_id`.
    pub async fn observations_for_hike(&self, hike_id: i64) -> Result<Vec<Observation>> {
        let rows = self
            .backend
            .fetch_all(SELECT_OBSERVATIONS_FOR_HIKE, vec![Value::Integer(hike_id)])
            .await?;
        Ok(decode_all(&rows, decode_observation))
    }

    /// Replaces the name, description and parent hike of observation `id`.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::ObservationNotFound`] if `id` does not exist
    /// and the policy is [`MissingRowPolicy::Reject`], or
    /// [`HikeLogError::Database`] if the update fails (for instance when the
    /// new `hike_id` does not exist).
    pub async fn update_observation(&self, id: i64, observation: &Observation) -> Result<()> {
        let mut params = encode_observation(observation);
        params.push(Value::Integer(id));
        let result = self.backend.run(UPDATE_OBSERVATION, params).await?;
        if result.changes == 0 {
            return self.on_missing_row(HikeLogError::ObservationNotFound(id));
        }
        log::debug!("Updated observation {id}");
        Ok(())
    }

    /// Deletes observation `id`. Returns whether a row was removed.
    pub async fn delete_observation(&self, id: i64) -> Result<bool> {
        let result = self
            .backend
            .run(DELETE_OBSERVATION, vec![Value::Integer(id)])
            .await?;
        log::debug!("Deleted observation {id} ({} rows)", result.changes);
        Ok(result.changes > 0)
    }

    /// Deletes every observation on hike `hike_id`, leaving the hike itself.
    /// Returns the number of observations removed.
    pub async fn delete_observations_for_hike(&self, hike_id: i64) -> Result<usize> {
        let result = self
            .backend
            .run(DELETE_OBSERVATIONS_FOR_HIKE, vec![Value::Integer(hike_id)])
            .await?;
        log::debug!("Deleted {} observations from hike {hike_id}", result.changes);
        Ok(result.changes)
    }

    fn on_missing_row(&self, not_found: HikeLogError) -> Result<()> {
        match self.missing_row_policy {
            MissingRowPolicy::Ignore => {
                log::debug!("Update matched no rows: {not_found}");
                Ok(())
            }
            MissingRowPolicy::Reject => Err(not_found),
        }
    }
}

/// Decodes every row that can be decoded; the rest are logged and dropped.
fn decode_all<T>(rows: &[StoredRow], decode: fn(&StoredRow) -> Result<T>) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match decode(row) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping unreadable row: {e}");
                None
            }
        })
        .collect()
}

/// Reads the two-statement cascade result: observations first, hikes second.
fn delete_result(results: &[crate::RunResult]) -> DeleteResult {
    let changes = |idx: usize| results.get(idx).map_or(0, |r| r.changes);
    DeleteResult {
        observations_deleted: changes(0),
        hikes_deleted: changes(1),
    }
}
