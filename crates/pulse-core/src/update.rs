//! Development update records produced by the summarizer.
//!
//! Enums serialize as lowercase strings, matching what the model is asked to
//! emit.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Kind of development an update describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Partnership,
    Business,
    Milestone,
    Community,
    Other,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Technical,
        Self::Partnership,
        Self::Business,
        Self::Milestone,
        Self::Community,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Partnership => "partnership",
            Self::Business => "business",
            Self::Milestone => "milestone",
            Self::Community => "community",
            Self::Other => "other",
        }
    }

    /// Case-insensitive lookup that maps anything unrecognized to [`Self::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Impact
// ---------------------------------------------------------------------------

/// How significant an update is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Case-insensitive lookup. Unlike [`Category::from_label`] there is no
    /// catch-all variant, so unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [Self::High, Self::Medium, Self::Low]
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UpdateRecord
// ---------------------------------------------------------------------------

/// A single summarized development update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateRecord {
    /// Short headline. The model is asked for at most 60 characters but
    /// longer titles are kept as-is.
    pub title: String,
    pub category: Category,
    pub impact: Impact,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("technical", Category::Technical)]
    #[case("Partnership", Category::Partnership)]
    #[case(" MILESTONE ", Category::Milestone)]
    #[case("product", Category::Other)]
    #[case("", Category::Other)]
    fn category_from_label(#[case] label: &str, #[case] expected: Category) {
        assert_eq!(Category::from_label(label), expected);
    }

    #[rstest]
    #[case("high", Some(Impact::High))]
    #[case("Medium", Some(Impact::Medium))]
    #[case("LOW", Some(Impact::Low))]
    #[case("critical", None)]
    fn impact_from_label(#[case] label: &str, #[case] expected: Option<Impact>) {
        assert_eq!(Impact::from_label(label), expected);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Community).unwrap(),
            "\"community\""
        );
        assert_eq!(serde_json::to_string(&Impact::High).unwrap(), "\"high\"");
    }

    #[test]
    fn key_points_default_to_empty() {
        let record: UpdateRecord = serde_json::from_str(
            r#"{"title":"T","category":"business","impact":"low","summary":"s"}"#,
        )
        .unwrap();
        assert!(record.key_points.is_empty());
    }
}
