//! Projection of a result set onto the user's filter/sort selection.
//!
//! [`project`] is pure: the stored results are never reordered or mutated,
//! only the borrowed display list changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::response::ImageResult;

/// Categories offered in the filter panel, besides "all".
pub const KNOWN_CATEGORIES: &[&str] = &["nature", "urban", "portrait", "food"];

const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Match score, highest first
    #[default]
    Similarity,
    /// Identifier, lowest first
    Id,
}

/// Filter/sort state of one results view. Resets on every mount.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl CategoryFilter {
    pub fn matches(&self, result: &ImageResult) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => result.category == *category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(category) => category,
        }
    }
}

impl CategoryFilter {
    /// Whether the filter panel offers this selection.
    pub fn is_known(&self) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => KNOWN_CATEGORIES.contains(&category.as_str()),
        }
    }
}

/// Filter panel options in display order, "all" first.
pub fn category_options() -> Vec<&'static str> {
    std::iter::once(ALL)
        .chain(KNOWN_CATEGORIES.iter().copied())
        .collect()
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "similarity" => Ok(Self::Similarity),
            "id" => Ok(Self::Id),
            other => Err(format!(
                "unknown sort key '{other}' (expected 'similarity' or 'id')"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Similarity => write!(f, "similarity"),
            Self::Id => write!(f, "id"),
        }
    }
}

impl Selection {
    pub fn new(category: impl Into<CategoryFilter>, sort: SortKey) -> Self {
        Self {
            category: category.into(),
            sort,
        }
    }
}

/// Filter, then stable-sort, the results for display.
pub fn project<'a>(results: &'a [ImageResult], selection: &Selection) -> Vec<&'a ImageResult> {
    let mut display: Vec<&ImageResult> = results
        .iter()
        .filter(|result| selection.category.matches(result))
        .collect();

    // sort_by is stable: equal keys keep their received order.
    match selection.sort {
        SortKey::Similarity => display.sort_by(|a, b| b.score.total_cmp(&a.score)),
        SortKey::Id => display.sort_by_key(|result| result.id),
    }

    display
}

/// Headline above the grid, e.g. `We found 3 images that match your search in category "nature"`.
pub fn summary(count: usize, category: &CategoryFilter) -> String {
    let plural = if count == 1 { "" } else { "s" };
    let scope = match category {
        CategoryFilter::All => String::new(),
        CategoryFilter::Only(name) => format!(" in category \"{name}\""),
    };
    format!("We found {count} image{plural} that match your search{scope}")
}

/// What one grid card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub title: String,
    pub badge: String,
    pub category: String,
    pub tags: Vec<String>,
    pub id: i64,
}

/// Cards for a display list, numbered from 1 in display order.
pub fn cards(display: &[&ImageResult]) -> Vec<ResultCard> {
    display
        .iter()
        .enumerate()
        .map(|(index, result)| ResultCard {
            title: format!("Similar Image {}", index + 1),
            badge: result.score_label(),
            category: result.category.clone(),
            tags: result.tags.clone(),
            id: result.id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<ImageResult> {
        vec![
            ImageResult::new(3, 80.0, "nature"),
            ImageResult::new(1, 95.0, "urban"),
            ImageResult::new(4, 80.0, "food"),
            ImageResult::new(2, 60.0, "nature"),
            ImageResult::new(5, 80.0, "nature"),
        ]
    }

    fn ids(display: &[&ImageResult]) -> Vec<i64> {
        display.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_all_by_similarity_is_descending_and_stable() {
        let all = results();
        let display = project(&all, &Selection::default());
        // Ties at 80 keep received order: 3, 4, 5
        assert_eq!(ids(&display), vec![1, 3, 4, 5, 2]);
    }

    #[test]
    fn test_sort_by_id_ascending() {
        let all = results();
        let display = project(&all, &Selection::new("all", SortKey::Id));
        assert_eq!(ids(&display), vec![1, 2, 3, 4, 5]);

        // Equal ids keep received order
        let tied = vec![
            ImageResult::new(7, 50.0, "food"),
            ImageResult::new(2, 90.0, "urban"),
            ImageResult::new(7, 95.0, "nature"),
            ImageResult::new(7, 10.0, "portrait"),
        ];
        let display = project(&tied, &Selection::new("all", SortKey::Id));
        let order: Vec<(i64, &str)> = display
            .iter()
            .map(|r| (r.id, r.category.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(2, "urban"), (7, "food"), (7, "nature"), (7, "portrait")]
        );
    }

    #[test]
    fn test_category_options() {
        assert_eq!(
            category_options(),
            vec!["all", "nature", "urban", "portrait", "food"]
        );
        assert!(CategoryFilter::from("urban").is_known());
        assert!(CategoryFilter::All.is_known());
        assert!(!CategoryFilter::from("sports").is_known());
    }

    #[test]
    fn test_category_filter() {
        let all = results();

        let by_score = project(&all, &Selection::new("nature", SortKey::Similarity));
        assert_eq!(ids(&by_score), vec![3, 5, 2]);
        assert!(by_score.iter().all(|r| r.category == "nature"));

        let by_id = project(&all, &Selection::new("nature", SortKey::Id));
        assert_eq!(ids(&by_id), vec![2, 3, 5]);

        assert!(project(&all, &Selection::new("portrait", SortKey::Id)).is_empty());
    }

    #[test]
    fn test_projection_does_not_touch_source() {
        let all = results();
        let before = all.clone();
        let _ = project(&all, &Selection::new("nature", SortKey::Id));
        assert_eq!(all, before);
    }

    #[test]
    fn test_parse_selection_values() {
        assert_eq!(CategoryFilter::from("ALL"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("food"),
            CategoryFilter::Only("food".to_string())
        );
        assert_eq!("ID".parse::<SortKey>().unwrap(), SortKey::Id);
        assert!("date".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(
            summary(1, &CategoryFilter::All),
            "We found 1 image that match your search"
        );
        assert_eq!(
            summary(3, &CategoryFilter::from("nature")),
            "We found 3 images that match your search in category \"nature\""
        );
    }

    #[test]
    fn test_cards_number_in_display_order() {
        let all = results();
        let display = project(&all, &Selection::default());
        let cards = cards(&display);
        assert_eq!(cards[0].title, "Similar Image 1");
        assert_eq!(cards[0].badge, "95% match");
        assert_eq!(cards[0].category, "urban");
    }
}
