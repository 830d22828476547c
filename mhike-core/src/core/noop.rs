//! A storage backend that accepts everything and stores nothing.

use crate::{Result, RunResult, StorageBackend, StoredRow, WriteStatement};
use async_trait::async_trait;
use rusqlite::types::Value;

/// Stand-in for platforms without a native SQLite engine.
///
/// Writes succeed with `RunResult { last_insert_id: 0, changes: 0 }` and
/// reads return nothing, so a UI built on the logbook shows an empty list
/// instead of crashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

#[async_trait]
impl StorageBackend for NoopBackend {
    async fn execute(&self, _sql: &str) -> Result<()> {
        Ok(())
    }

    async fn run(&self, _sql: &str, _params: Vec<Value>) -> Result<RunResult> {
        Ok(RunResult::default())
    }

    async fn run_atomic(&self, statements: Vec<WriteStatement>) -> Result<Vec<RunResult>> {
        Ok(vec![RunResult::default(); statements.len()])
    }

    async fn fetch_all(&self, _sql: &str, _params: Vec<Value>) -> Result<Vec<StoredRow>> {
        Ok(Vec::new())
    }

    async fn fetch_first(&self, _sql: &str, _params: Vec<Value>) -> Result<Option<StoredRow>> {
        Ok(None)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
