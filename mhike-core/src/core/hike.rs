//! The hike record and its difficulty rating.

use crate::{HikeLogError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of [`Hike::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How strenuous a hike is.
///
/// Serialized and stored as the PascalCase variant name (`"Easy"`, `"Medium"`,
/// `"Hard"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Every difficulty in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The text stored in the `difficulty` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// A logged trip.
///
/// `id` is `None` until the record has been persisted; the store assigns it.
/// `images` holds URIs in display order and is never absent: rows with a
/// missing or malformed images column load as an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hike {
    pub id: Option<i64>,
    pub name: String,
    pub location: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub parking_available: bool,
    /// Length in kilometres.
    pub length: f64,
    pub difficulty: Difficulty,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Hike {
    /// Checks the fields the entry form requires before a save is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::ValidationFailed`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("Name", &self.name),
            ("Location", &self.location),
            ("Date", &self.date),
        ] {
            if value.trim().is_empty() {
                return Err(HikeLogError::ValidationFailed(format!("{label} is required")));
            }
        }
        if NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).is_err() {
            return Err(HikeLogError::ValidationFailed(format!(
                "Date '{}' is not a valid YYYY-MM-DD date",
                self.date
            )));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(HikeLogError::ValidationFailed(
                "Length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hike {
        Hike {
            id: None,
            name: "Ba Vi".to_string(),
            location: "Hanoi".to_string(),
            date: "2024-03-01".to_string(),
            parking_available: true,
            length: 12.5,
            difficulty: Difficulty::Medium,
            description: Some(String::new()),
            images: vec![],
        }
    }

    #[test]
    fn test_valid_hike_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let hike = Hike { name: "   ".to_string(), ..sample() };
        let err = hike.validate().unwrap_err();
        assert!(matches!(err, HikeLogError::ValidationFailed(ref m) if m.contains("Name")));
    }

    #[test]
    fn test_bad_date_rejected() {
        let hike = Hike { date: "01/03/2024".to_string(), ..sample() };
        assert!(matches!(hike.validate(), Err(HikeLogError::ValidationFailed(_))));
    }

    #[test]
    fn test_non_positive_length_rejected() {
        for length in [0.0, -1.0, f64::NAN] {
            let hike = Hike { length, ..sample() };
            assert!(hike.validate().is_err(), "length {length} should be rejected");
        }
    }

    #[test]
    fn test_difficulty_parses_stored_text() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("hard".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
    }

    #[test]
    fn test_hike_serializes_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"parkingAvailable\":true"));
        assert!(json.contains("\"difficulty\":\"Medium\""));
    }
}
