//! Search and ordering for the course dashboard.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::models::CourseSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    /// Newest first.
    Date,
    /// Ready courses first.
    Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

/// Filter by case-insensitive name substring, then sort. Sorting is stable.
pub fn arrange(courses: Vec<CourseSummary>, query: &ListQuery) -> Vec<CourseSummary> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matching: Vec<CourseSummary> = courses
        .into_iter()
        .filter(|summary| match &needle {
            Some(needle) => summary.course.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    matching.sort_by(|a, b| compare(a, b, query.sort));
    matching
}

fn compare(a: &CourseSummary, b: &CourseSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a
            .course
            .name
            .to_lowercase()
            .cmp(&b.course.name.to_lowercase()),
        SortKey::Date => {
            let created = |s: &CourseSummary| {
                s.course
                    .created_at
                    .map(|dt| dt.timestamp_millis())
                    .unwrap_or(0)
            };
            created(b).cmp(&created(a))
        }
        SortKey::Status => b.readiness.ready.cmp(&a.readiness.ready),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, NewCourseRequest};
    use crate::validation::Readiness;
    use chrono::{TimeZone, Utc};

    fn summary(id: i64, name: &str, day: u32, ready: bool) -> CourseSummary {
        let course = Course::from_request(
            id,
            Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            NewCourseRequest {
                name: name.to_string(),
                ..Default::default()
            },
        );
        CourseSummary {
            course,
            readiness: Readiness {
                ready,
                missing_fields: Vec::new(),
            },
        }
    }

    fn ids(list: &[CourseSummary]) -> Vec<i64> {
        list.iter().map(|s| s.course.id).collect()
    }

    fn fixture() -> Vec<CourseSummary> {
        vec![
            summary(1, "beta course", 3, false),
            summary(2, "Alpha", 1, true),
            summary(3, "Gamma Intro", 2, false),
            summary(4, "intro to X", 4, true),
        ]
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let sorted = arrange(fixture(), &ListQuery::default());
        assert_eq!(ids(&sorted), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let query = ListQuery {
            sort: SortKey::Date,
            ..Default::default()
        };
        assert_eq!(ids(&arrange(fixture(), &query)), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sort_by_status_ready_first_and_stable() {
        let query = ListQuery {
            sort: SortKey::Status,
            ..Default::default()
        };
        assert_eq!(ids(&arrange(fixture(), &query)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let query = ListQuery {
            search: Some("INTRO".to_string()),
            sort: SortKey::Name,
        };
        assert_eq!(ids(&arrange(fixture(), &query)), vec![3, 4]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let query = ListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(arrange(fixture(), &query).len(), 4);
    }
}
