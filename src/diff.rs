//! Change detection between two fetches of the grade list.
//!
//! The portal guarantees no stable primary key per sitting, so records are
//! identified by a composite of course code, syllabus year, exam-period id,
//! and grade value. Two distinct sittings with the same grade in the same
//! nominal period collide under this key; that approximation is accepted.

use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::GradeRecord;

/// A record present in the current fetch but not the previous one.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradeChange {
    /// First sitting ever seen for this course.
    NewCourse { record: GradeRecord },
    /// Additional sitting for a course that already had history.
    NewAttempt { record: GradeRecord },
}

impl GradeChange {
    pub fn record(&self) -> &GradeRecord {
        match self {
            GradeChange::NewCourse { record } => record,
            GradeChange::NewAttempt { record } => record,
        }
    }
}

/// Composite identity of one sitting.
fn identity(record: &GradeRecord) -> String {
    format!(
        "{}|{}|{}|{}",
        record.course_key(),
        record.syllabus_year.map(|y| y.to_string()).unwrap_or_default(),
        record.exam_period_id.as_deref().unwrap_or_default(),
        record
            .grade
            .map(|g| format!("{g:.1}"))
            .unwrap_or_default(),
    )
}

/// Records that appeared since the previous fetch, in current-fetch order.
///
/// Classifies each new record as a brand-new course or a new attempt on a
/// known course, for notification purposes. Purely additive: removals and
/// in-place edits are not reported.
pub fn diff(previous: &[GradeRecord], current: &[GradeRecord]) -> Vec<GradeChange> {
    let seen: HashSet<String> = previous.iter().map(identity).collect();
    let known_courses: HashSet<&str> = previous.iter().map(|r| r.course_key()).collect();

    current
        .iter()
        .filter(|record| !seen.contains(&identity(record)))
        .map(|record| {
            if known_courses.contains(record.course_key()) {
                GradeChange::NewAttempt {
                    record: record.clone(),
                }
            } else {
                GradeChange::NewCourse {
                    record: record.clone(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, grade: f64, period_id: &str) -> GradeRecord {
        GradeRecord {
            course_code: Some(code.to_string()),
            course_name: format!("Course {code}"),
            grade: Some(grade),
            ects: Some(5.0),
            status: "PASSED".to_string(),
            exam_period: String::new(),
            exam_period_id: Some(period_id.to_string()),
            course_syllabus_id: None,
            syllabus_year: Some(2023),
            semester: None,
            attempt_number: None,
            recorded_at: None,
        }
    }

    #[test]
    fn test_no_changes() {
        let grades = vec![record("ICE105", 6.0, "17")];
        assert!(diff(&grades, &grades).is_empty());
    }

    #[test]
    fn test_new_course() {
        let previous = vec![record("ICE105", 6.0, "17")];
        let current = vec![record("ICE105", 6.0, "17"), record("ICE203", 8.0, "17")];

        let changes = diff(&previous, &current);
        assert_eq!(changes.len(), 1);
        assert!(matches!(changes[0], GradeChange::NewCourse { .. }));
        assert_eq!(changes[0].record().course_key(), "ICE203");
    }

    #[test]
    fn test_new_attempt_on_known_course() {
        let previous = vec![record("ICE105", 4.0, "17")];
        let current = vec![record("ICE105", 4.0, "17"), record("ICE105", 6.0, "18")];

        let changes = diff(&previous, &current);
        assert_eq!(changes.len(), 1);
        assert!(matches!(changes[0], GradeChange::NewAttempt { .. }));
    }

    #[test]
    fn test_identity_collision_is_accepted() {
        // Same course, period, and grade: indistinguishable by design
        let previous = vec![record("ICE105", 6.0, "17")];
        let current = vec![record("ICE105", 6.0, "17"), record("ICE105", 6.0, "17")];

        assert!(diff(&previous, &current).is_empty());
    }

    #[test]
    fn test_empty_previous_reports_everything_as_new_courses() {
        let current = vec![record("ICE105", 6.0, "17"), record("ICE203", 8.0, "17")];
        let changes = diff(&[], &current);
        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .all(|c| matches!(c, GradeChange::NewCourse { .. })));
    }
}
