use crate::{HikeLogError, Result};
use serde::{Deserialize, Serialize};

/// A field note attached to exactly one [`Hike`](crate::Hike).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: Option<i64>,
    pub hike_id: i64,
    pub name: String,
    pub description: String,
}

impl Observation {
    /// Checks that both text fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`HikeLogError::ValidationFailed`] if the name or description is blank.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(HikeLogError::ValidationFailed(
                "Observation name and description are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_rejected() {
        let obs = Observation {
            id: None,
            hike_id: 1,
            name: "Heron".to_string(),
            description: " ".to_string(),
        };
        assert!(matches!(obs.validate(), Err(HikeLogError::ValidationFailed(_))));
    }

    #[test]
    fn test_serializes_hike_id_camel_case() {
        let obs = Observation {
            id: Some(3),
            hike_id: 1,
            name: "Heron".to_string(),
            description: "By the lake".to_string(),
        };
        assert!(obs.validate().is_ok());
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"hikeId\":1"));
    }
}
