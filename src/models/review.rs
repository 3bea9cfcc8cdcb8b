//! Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review as stored, owned exclusively by its creating user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    /// Rating in [1, 5]
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A review joined with reviewer and place display data for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewWithNames {
    pub id: i64,
    pub user_id: i64,
    pub place_id: i64,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub place_name: String,
}

/// Supported orderings for review listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    RatingAsc,
    RatingDesc,
    /// Most recent first (the default)
    #[default]
    Newest,
    Oldest,
}

impl ReviewSort {
    /// ORDER BY clause for this sort. Values are fixed SQL fragments, never
    /// caller input.
    pub fn order_by(self) -> &'static str {
        match self {
            ReviewSort::RatingAsc => "r.rating ASC",
            ReviewSort::RatingDesc => "r.rating DESC",
            ReviewSort::Newest => "r.created_at DESC",
            ReviewSort::Oldest => "r.created_at ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort_is_newest() {
        assert_eq!(ReviewSort::default(), ReviewSort::Newest);
        assert_eq!(ReviewSort::default().order_by(), "r.created_at DESC");
    }

    #[test]
    fn test_sort_deserializes_from_snake_case() {
        let sort: ReviewSort = serde_json::from_str("\"rating_desc\"").unwrap();
        assert_eq!(sort, ReviewSort::RatingDesc);
    }
}
