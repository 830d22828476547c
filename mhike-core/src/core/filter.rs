//! In-memory filtering and name search over loaded hikes.
//!
//! Filtering never touches the store: callers load the full collection once
//! and re-run the filter on every change. Criteria compose with logical AND
//! and an unset criterion matches everything.

use crate::{Difficulty, Hike};
use serde::{Deserialize, Serialize};

/// Optional criteria used to narrow a hike collection.
///
/// Defaults: text criteria unset, any difficulty, `min_length = 0`,
/// `max_length = +infinity`. Serialized in camelCase (`minLength`,
/// `maxLength`) so a front-end can send it directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HikeFilter {
    /// Case-insensitive substring of the hike name. Empty means "any".
    pub name: Option<String>,
    /// Case-insensitive substring of the hike location. Empty means "any".
    pub location: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Inclusive lower bound on length in kilometres.
    pub min_length: Option<f64>,
    /// Inclusive upper bound on length in kilometres.
    pub max_length: Option<f64>,
}

impl HikeFilter {
    /// A filter with only the name criterion set.
    pub fn by_name(query: &str) -> Self {
        Self {
            name: Some(query.to_string()),
            ..Self::default()
        }
    }

    pub fn min_length(&self) -> f64 {
        self.min_length.unwrap_or(0.0)
    }

    pub fn max_length(&self) -> f64 {
        self.max_length.unwrap_or(f64::INFINITY)
    }

    /// True when no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        needle(self.name.as_deref()).is_none()
            && needle(self.location.as_deref()).is_none()
            && self.difficulty.is_none()
            && self.min_length() <= 0.0
            && self.max_length() == f64::INFINITY
    }

    /// Tests a single hike against every active criterion.
    pub fn matches(&self, hike: &Hike) -> bool {
        contains_ignore_case(&hike.name, self.name.as_deref())
            && contains_ignore_case(&hike.location, self.location.as_deref())
            && self.difficulty.map_or(true, |d| hike.difficulty == d)
            && hike.length >= self.min_length()
            && hike.length <= self.max_length()
    }

    /// Returns the matching hikes in their original order.
    pub fn apply(&self, hikes: &[Hike]) -> Vec<Hike> {
        hikes.iter().filter(|h| self.matches(h)).cloned().collect()
    }
}

/// Case-insensitive name search; every other criterion is unconstrained.
pub fn search_by_name(hikes: &[Hike], query: &str) -> Vec<Hike> {
    HikeFilter::by_name(query).apply(hikes)
}

fn needle(criterion: Option<&str>) -> Option<&str> {
    criterion.filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, criterion: Option<&str>) -> bool {
    match needle(criterion) {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hike(name: &str, location: &str, difficulty: Difficulty, length: f64) -> Hike {
        Hike {
            id: None,
            name: name.to_string(),
            location: location.to_string(),
            date: "2024-05-01".to_string(),
            parking_available: false,
            length,
            difficulty,
            description: None,
            images: vec![],
        }
    }

    fn collection() -> Vec<Hike> {
        vec![
            hike("Fox Ridge", "Lake District", Difficulty::Hard, 14.0),
            hike("Silver Fox Loop", "Peak District", Difficulty::Easy, 5.0),
            hike("Heron Walk", "Norfolk", Difficulty::Hard, 9.5),
            hike("Ba Vi", "Hanoi", Difficulty::Medium, 12.5),
        ]
    }

    fn names(hikes: &[Hike]) -> Vec<&str> {
        hikes.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_unchanged() {
        let all = collection();
        let filter = HikeFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&all), all);
    }

    #[test]
    fn test_criteria_compose_with_and() {
        let filter = HikeFilter {
            name: Some("Fox".to_string()),
            difficulty: Some(Difficulty::Hard),
            ..HikeFilter::default()
        };
        assert_eq!(names(&filter.apply(&collection())), vec!["Fox Ridge"]);
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let filter = HikeFilter {
            location: Some("DISTRICT".to_string()),
            ..HikeFilter::default()
        };
        assert_eq!(
            names(&filter.apply(&collection())),
            vec!["Fox Ridge", "Silver Fox Loop"]
        );
    }

    #[test]
    fn test_empty_text_criteria_match_all() {
        let filter = HikeFilter {
            name: Some(String::new()),
            location: Some(String::new()),
            ..HikeFilter::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&collection()).len(), 4);
    }

    #[test]
    fn test_whitespace_in_needle_is_matched_literally() {
        let hikes = vec![
            hike("Fox Ridge", "Lake District", Difficulty::Hard, 14.0),
            hike("Ridgeway", "Wiltshire", Difficulty::Easy, 7.0),
        ];
        assert_eq!(names(&search_by_name(&hikes, " ridge")), vec!["Fox Ridge"]);
        assert_eq!(names(&search_by_name(&hikes, " ")), vec!["Fox Ridge"]);

        let filter = HikeFilter {
            location: Some("  ".to_string()),
            ..HikeFilter::default()
        };
        assert!(!filter.is_empty());
        assert!(filter.apply(&hikes).is_empty());
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let filter = HikeFilter {
            min_length: Some(9.5),
            max_length: Some(12.5),
            ..HikeFilter::default()
        };
        assert_eq!(names(&filter.apply(&collection())), vec!["Heron Walk", "Ba Vi"]);
    }

    #[test]
    fn test_length_defaults_are_open_ended() {
        let filter = HikeFilter {
            min_length: Some(10.0),
            ..HikeFilter::default()
        };
        assert_eq!(filter.max_length(), f64::INFINITY);
        assert_eq!(names(&filter.apply(&collection())), vec!["Fox Ridge", "Ba Vi"]);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_search_ignores_other_fields() {
        assert_eq!(
            names(&search_by_name(&collection(), "fox")),
            vec!["Fox Ridge", "Silver Fox Loop"]
        );
        assert!(search_by_name(&collection(), "Everest").is_empty());
        assert_eq!(search_by_name(&collection(), "").len(), 4);
    }

    #[test]
    fn test_filter_deserializes_from_partial_json() {
        let filter: HikeFilter =
            serde_json::from_str(r#"{"difficulty":"Easy","maxLength":6}"#).unwrap();
        assert_eq!(filter.difficulty, Some(Difficulty::Easy));
        assert_eq!(filter.min_length(), 0.0);
        assert_eq!(names(&filter.apply(&collection())), vec!["Silver Fox Loop"]);
    }
}
