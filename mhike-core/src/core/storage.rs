//! Storage backend abstraction and the SQLite implementation.
//!
//! The service layer only ever talks to a [`StorageBackend`]: four primitives
//! (execute, run, fetch-all, fetch-first) plus an atomic multi-statement run
//! used for cascade deletes. [`SqliteBackend`] is the real engine;
//! [`NoopBackend`](crate::NoopBackend) stands in on platforms without one.
//!
//! Rows cross the boundary as [`StoredRow`], a column-name keyed map of
//! SQLite values, so the codec never depends on column positions.

use crate::{HikeLogError, Result};
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// DDL for the `Hike` and `Observation` tables. Every statement is create-if-absent.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Table names as they appear in SQL and in error messages.
pub const HIKE_TABLE: &str = "Hike";
pub const OBSERVATION_TABLE: &str = "Observation";

/// Outcome of a single write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunResult {
    /// Row id of the most recent successful INSERT on the connection.
    pub last_insert_id: i64,
    /// Rows inserted, updated or deleted by this statement.
    pub changes: usize,
}

/// One parameterised write, queued for [`StorageBackend::run_atomic`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl WriteStatement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// A fetched row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredRow {
    columns: HashMap<String, Value>,
}

impl StoredRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for assembling rows by hand.
    #[must_use]
    pub fn with(mut self, column: &str, value: Value) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: Value) {
        self.columns.insert(column.to_string(), value);
    }

    /// The raw value of `column`, or `None` if the row has no such column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// `column` as an integer; `None` for NULL, missing or non-integer values.
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// `column` as text; `None` for NULL, missing or non-text values.
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Value)> for StoredRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// The primitives the logbook needs from a relational store.
///
/// All calls are asynchronous. Implementations must be safe to share across
/// tasks; ordering between concurrently issued calls is unspecified.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Runs one or more parameterless statements, e.g. schema DDL.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Runs one parameterised write statement.
    async fn run(&self, sql: &str, params: Vec<Value>) -> Result<RunResult>;

    /// Runs every statement inside one transaction: either all apply or none do.
    async fn run_atomic(&self, statements: Vec<WriteStatement>) -> Result<Vec<RunResult>>;

    /// Returns every row produced by `sql`.
    async fn fetch_all(&self, sql: &str, params: Vec<Value>) -> Result<Vec<StoredRow>>;

    /// Returns the first row produced by `sql`, or `None` if there is none.
    async fn fetch_first(&self, sql: &str, params: Vec<Value>) -> Result<Option<StoredRow>>;

    /// Releases the underlying connection. Later calls fail with
    /// [`HikeLogError::StoreClosed`].
    async fn close(&self) -> Result<()>;
}

/// Creates the logbook tables if they are absent.
///
/// # Errors
///
/// Returns [`HikeLogError::Database`] if the engine rejects the DDL.
pub async fn migrate(backend: &dyn StorageBackend) -> Result<()> {
    backend.execute(SCHEMA).await
}

/// A [`StorageBackend`] over a single SQLite connection.
///
/// The connection lives behind a mutex and every call runs on tokio's
/// blocking pool, so concurrent callers serialize at the connection without
/// stalling the async executor.
pub struct SqliteBackend {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::Database`] if the file cannot be opened as SQLite.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database, discarded on close.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Required for the Observation -> Hike foreign key to be enforced.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let conn = guard.as_mut().ok_or(HikeLogError::StoreClosed)?;
            f(conn)
        })
        .await?
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn execute(&self, sql: &str) -> Result<()> {
        let sql = sql.to_string();
        self.with_connection(move |conn| Ok(conn.execute_batch(&sql)?))
            .await
    }

    async fn run(&self, sql: &str, params: Vec<Value>) -> Result<RunResult> {
        let sql = sql.to_string();
        self.with_connection(move |conn| Ok(run_statement(conn, &sql, &params)?))
            .await
    }

    async fn run_atomic(&self, statements: Vec<WriteStatement>) -> Result<Vec<RunResult>> {
        self.with_connection(move |conn| {
            // Dropping the transaction without commit rolls it back.
            let tx = conn.transaction()?;
            let mut results = Vec::with_capacity(statements.len());
            for statement in &statements {
                results.push(run_statement(&tx, &statement.sql, &statement.params)?);
            }
            tx.commit()?;
            Ok(results)
        })
        .await
    }

    async fn fetch_all(&self, sql: &str, params: Vec<Value>) -> Result<Vec<StoredRow>> {
        let sql = sql.to_string();
        self.with_connection(move |conn| Ok(query_rows(conn, &sql, &params, None)?))
            .await
    }

    async fn fetch_first(&self, sql: &str, params: Vec<Value>) -> Result<Option<StoredRow>> {
        let sql = sql.to_string();
        self.with_connection(move |conn| {
            Ok(query_rows(conn, &sql, &params, Some(1))?.into_iter().next())
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let taken = conn.lock().unwrap_or_else(PoisonError::into_inner).take();
            match taken {
                Some(conn) => conn.close().map_err(|(_, e)| HikeLogError::Database(e)),
                None => Ok(()),
            }
        })
        .await?
    }
}

fn run_statement(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<RunResult> {
    let changes = conn.execute(sql, params_from_iter(params.iter()))?;
    Ok(RunResult {
        last_insert_id: conn.last_insert_rowid(),
        changes,
    })
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
    limit: Option<usize>,
) -> rusqlite::Result<Vec<StoredRow>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let mut rows = stmt.query(params_from_iter(params.iter()))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut columns = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            columns.insert(name.clone(), row.get::<_, Value>(idx)?);
        }
        out.push(StoredRow { columns });
        if limit.is_some_and(|n| out.len() >= n) {
            break;
        }
    }
    Ok(out)
}
