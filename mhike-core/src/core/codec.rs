//! Conversion between stored rows and in-memory records.
//!
//! Column layout is flat: booleans are stored as `0`/`1`, the images list as a
//! JSON array of strings, and unset optional text as SQL `NULL` (never `""`).
//!
//! Decoding is lenient where the data can be degraded safely. A missing or
//! malformed `images` column becomes an empty list so one damaged row never
//! blocks listing the others. The only hard failure is a `difficulty` that is
//! not one of the known ratings.

use crate::core::storage::{HIKE_TABLE, OBSERVATION_TABLE};
use crate::{Difficulty, Hike, HikeLogError, Observation, Result, StoredRow};
use rusqlite::types::Value;

/// Writable `Hike` columns, in the order [`encode_hike`] emits values.
pub const HIKE_COLUMNS: [&str; 8] = [
    "name",
    "location",
    "date",
    "parkingAvailable",
    "length",
    "difficulty",
    "description",
    "images",
];

/// Writable `Observation` columns, in the order [`encode_observation`] emits values.
pub const OBSERVATION_COLUMNS: [&str; 3] = ["name", "description", "hikeId"];

/// Encodes the mutable fields of `hike` as SQL parameters in [`HIKE_COLUMNS`] order.
///
/// The identifier is not part of the output; the store assigns it.
///
/// # Errors
///
/// Returns [`HikeLogError::Json`] if the images list cannot be serialized.
pub fn encode_hike(hike: &Hike) -> Result<Vec<Value>> {
    Ok(vec![
        Value::Text(hike.name.clone()),
        Value::Text(hike.location.clone()),
        Value::Text(hike.date.clone()),
        Value::Integer(i64::from(hike.parking_available)),
        Value::Real(hike.length),
        Value::Text(hike.difficulty.as_str().to_string()),
        optional_text(hike.description.as_deref()),
        Value::Text(serde_json::to_string(&hike.images)?),
    ])
}

/// Rebuilds a [`Hike`] from a `SELECT * FROM Hike` row.
///
/// # Errors
///
/// Returns [`HikeLogError::CorruptRecord`] if `difficulty` is NULL or unknown.
pub fn decode_hike(row: &StoredRow) -> Result<Hike> {
    let id = row.integer("id");
    let difficulty = row
        .text("difficulty")
        .ok_or_else(|| "difficulty is missing".to_string())
        .and_then(str::parse::<Difficulty>)
        .map_err(|reason| HikeLogError::CorruptRecord {
            table: HIKE_TABLE,
            id: id.unwrap_or_default(),
            reason,
        })?;

    Ok(Hike {
        id,
        name: required_text(row, "name"),
        location: required_text(row, "location"),
        date: required_text(row, "date"),
        parking_available: decode_flag(row.get("parkingAvailable")),
        length: decode_real(row.get("length")),
        difficulty,
        description: row.text("description").map(str::to_string),
        images: decode_images(row, id),
    })
}

/// Encodes `observation` as SQL parameters in [`OBSERVATION_COLUMNS`] order.
pub fn encode_observation(observation: &Observation) -> Vec<Value> {
    vec![
        Value::Text(observation.name.clone()),
        Value::Text(observation.description.clone()),
        Value::Integer(observation.hike_id),
    ]
}

/// Rebuilds an [`Observation`] from a `SELECT * FROM Observation` row.
///
/// # Errors
///
/// Returns [`HikeLogError::CorruptRecord`] if `hikeId` is NULL, which the
/// foreign key should make impossible for rows written by this crate.
pub fn decode_observation(row: &StoredRow) -> Result<Observation> {
    let id = row.integer("id");
    let hike_id = row
        .integer("hikeId")
        .ok_or_else(|| HikeLogError::CorruptRecord {
            table: OBSERVATION_TABLE,
            id: id.unwrap_or_default(),
            reason: "hikeId is missing".to_string(),
        })?;

    Ok(Observation {
        id,
        hike_id,
        name: required_text(row, "name"),
        description: required_text(row, "description"),
    })
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

fn required_text(row: &StoredRow, column: &str) -> String {
    row.text(column).unwrap_or_default().to_string()
}

fn decode_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Integer(i)) => *i != 0,
        Some(Value::Real(f)) => *f != 0.0,
        _ => false,
    }
}

fn decode_real(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Real(f)) => *f,
        Some(Value::Integer(i)) => *i as f64,
        Some(Value::Text(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn decode_images(row: &StoredRow, id: Option<i64>) -> Vec<String> {
    let raw = match row.text("images") {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(images) => images,
        Err(e) => {
            log::warn!(
                "Hike {}: images column is not a JSON string array, loading as empty: {e}",
                id.unwrap_or_default()
            );
            Vec::new()
        }
    }
}
