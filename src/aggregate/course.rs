//! Grouping of raw sittings into per-course histories.
//!
//! Attempt ordering is status-first: failing sittings sort before passing
//! ones, so a course that has ever been passed keeps its passing sitting as
//! the current result even when the portal republishes records out of order.
//! Within the same pass/fail class the order is chronological, best effort.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::aggregate::period::{course_code_semester, period_key};
use crate::aggregate::types::{AggregateOptions, CourseGroup, GradeRecord, SemesterSection};
use crate::aggregate::utility::{mean, round2};

/// Grades below this are failing regardless of status text.
pub const PASS_THRESHOLD: f64 = 5.0;

/// A sitting fails when its status text carries a failure keyword or its
/// grade is below [`PASS_THRESHOLD`].
pub fn is_failing(record: &GradeRecord, options: &AggregateOptions) -> bool {
    let status = record.status.to_uppercase();
    if options
        .failure_keywords
        .iter()
        .any(|keyword| status.contains(keyword.as_str()))
    {
        return true;
    }
    matches!(record.grade, Some(grade) if grade < PASS_THRESHOLD)
}

/// Best-effort chronological signal for one sitting.
///
/// Fallback chain: explicit attempt number → recorded date → exam-period
/// heuristic. `None` means the original input index alone decides.
fn chrono_key(record: &GradeRecord) -> Option<i64> {
    if let Some(n) = record.attempt_number {
        return Some(n as i64);
    }
    if let Some(date) = record.recorded_at {
        return Some(date.num_days_from_ce() as i64);
    }
    period_key(&record.exam_period)
}

/// Total order over a course's sittings: failing class first, then the
/// chronological key, then the original input index. Every sitting has a
/// defined position, so two runs over the same input always agree.
fn attempt_rank(record: &GradeRecord, index: usize, options: &AggregateOptions) -> (u8, i64, usize) {
    let class = if is_failing(record, options) { 0 } else { 1 };
    (class, chrono_key(record).unwrap_or(i64::MIN), index)
}

/// Curriculum semester of a course, read off its first ordered attempt:
/// explicit semester field, else the course-code digit, else 0 ("other").
fn course_semester(record: &GradeRecord) -> u32 {
    if let Some(semester) = record.semester {
        return semester;
    }
    record
        .course_code
        .as_deref()
        .and_then(course_code_semester)
        .unwrap_or(0)
}

/// Partitions sittings by course identity and orders each course's attempts.
///
/// Groups come back sorted by course key, so the result does not depend on
/// the input order (beyond the documented index tie-break).
pub fn group_courses(grades: &[GradeRecord], options: &AggregateOptions) -> Vec<CourseGroup> {
    let mut buckets: HashMap<String, Vec<(usize, GradeRecord)>> = HashMap::new();

    for (index, record) in grades.iter().enumerate() {
        buckets
            .entry(record.course_key().to_string())
            .or_default()
            .push((index, record.clone()));
    }

    let mut groups: Vec<CourseGroup> = buckets
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by_key(|(index, record)| attempt_rank(record, *index, options));
            let attempts: Vec<GradeRecord> = entries.into_iter().map(|(_, r)| r).collect();

            let first = &attempts[0];
            let semester = course_semester(first);
            let code = first.course_code.clone();
            let name = first.course_name.clone();
            let passed = !is_failing(&attempts[attempts.len() - 1], options);

            CourseGroup {
                key,
                code,
                name,
                semester,
                attempts,
                passed,
            }
        })
        .collect();

    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Buckets course groups into semester sections, ascending by semester
/// number (0, the unclassified bucket, comes first).
pub fn semester_sections(groups: Vec<CourseGroup>) -> Vec<SemesterSection> {
    let mut by_semester: BTreeMap<u32, Vec<CourseGroup>> = BTreeMap::new();
    for group in groups {
        by_semester.entry(group.semester).or_default().push(group);
    }

    by_semester
        .into_iter()
        .map(|(semester, courses)| {
            let passed_grades: Vec<f64> = courses
                .iter()
                .filter(|c| c.passed)
                .filter_map(|c| c.current().grade)
                .collect();
            let passed_count = courses.iter().filter(|c| c.passed).count();

            SemesterSection {
                semester,
                gpa: round2(mean(&passed_grades)),
                passed_count,
                courses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, grade: f64, status: &str) -> GradeRecord {
        GradeRecord {
            course_code: Some(code.to_string()),
            course_name: format!("Course {code}"),
            grade: Some(grade),
            ects: Some(5.0),
            status: status.to_string(),
            exam_period: String::new(),
            exam_period_id: None,
            course_syllabus_id: None,
            syllabus_year: None,
            semester: None,
            attempt_number: None,
            recorded_at: None,
        }
    }

    #[test]
    fn test_failing_detection() {
        let options = AggregateOptions::default();
        assert!(is_failing(&record("ICE105", 4.0, "FAILED"), &options));
        assert!(is_failing(&record("ICE105", 4.0, ""), &options));
        assert!(is_failing(&record("ICE105", 9.0, "ΑΠΟΤΥΧΙΑ"), &options));
        assert!(!is_failing(&record("ICE105", 6.0, "PASSED"), &options));
        // No grade and no failure keyword counts as passing
        let mut ungraded = record("ICE105", 0.0, "ΕΠΙΤΥΧΙΑ");
        ungraded.grade = None;
        assert!(!is_failing(&ungraded, &options));
    }

    #[test]
    fn test_grouping_by_code_wins_over_name() {
        let options = AggregateOptions::default();
        let mut renamed = record("ICE105", 7.0, "PASSED");
        renamed.course_name = "Renamed Course".to_string();
        let grades = vec![record("ICE105", 4.0, "FAILED"), renamed];

        let groups = group_courses(&grades, &options);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "ICE105");
        assert_eq!(groups[0].attempts.len(), 2);
    }

    #[test]
    fn test_no_record_dropped_or_duplicated() {
        let options = AggregateOptions::default();
        let grades = vec![
            record("ICE105", 4.0, "FAILED"),
            record("ICE105", 6.0, "PASSED"),
            record("ICE203", 8.0, "PASSED"),
            record("MISC", 5.0, ""),
        ];

        let groups = group_courses(&grades, &options);
        let total: usize = groups.iter().map(|g| g.attempts.len()).sum();
        assert_eq!(total, grades.len());
    }

    #[test]
    fn test_failing_attempt_sorts_before_passing() {
        let options = AggregateOptions::default();
        // Passing sitting arrives first in the input
        let grades = vec![record("ICE105", 6.0, "PASSED"), record("ICE105", 4.0, "FAILED")];

        let groups = group_courses(&grades, &options);
        let group = &groups[0];
        assert_eq!(group.attempts[0].grade, Some(4.0));
        assert_eq!(group.current().grade, Some(6.0));
        assert!(group.passed);
    }

    #[test]
    fn test_chronological_order_from_period_text() {
        let options = AggregateOptions::default();
        let mut early = record("ICE105", 3.0, "FAILED");
        early.exam_period = "ΧΕΙΜΕΡΙΝΗ 2022".to_string();
        let mut late = record("ICE105", 4.0, "FAILED");
        late.exam_period = "ΕΠΑΝΑΛΗΠΤΙΚΗ ΣΕΠΤΕΜΒΡΙΟΥ 2022".to_string();

        // Later sitting first in the input
        let groups = group_courses(&[late, early], &options);
        let group = &groups[0];
        assert_eq!(group.attempts[0].grade, Some(3.0));
        assert_eq!(group.current().grade, Some(4.0));
        assert!(!group.passed);
    }

    #[test]
    fn test_attempt_number_beats_input_order() {
        let options = AggregateOptions::default();
        let mut second = record("ICE105", 7.0, "PASSED");
        second.attempt_number = Some(2);
        let mut first = record("ICE105", 6.0, "PASSED");
        first.attempt_number = Some(1);

        let groups = group_courses(&[second, first], &options);
        assert_eq!(groups[0].current().grade, Some(7.0));
    }

    #[test]
    fn test_index_tiebreak_is_stable() {
        let options = AggregateOptions::default();
        let grades = vec![record("ICE105", 6.0, "PASSED"), record("ICE105", 7.0, "PASSED")];

        let a = group_courses(&grades, &options);
        let b = group_courses(&grades, &options);
        assert_eq!(a[0].attempts, b[0].attempts);
        // No chronological signal: input order is preserved
        assert_eq!(a[0].current().grade, Some(7.0));
    }

    #[test]
    fn test_semester_from_code_digit() {
        let options = AggregateOptions::default();
        let groups = group_courses(&[record("ICE511", 8.0, "PASSED")], &options);
        assert_eq!(groups[0].semester, 5);
    }

    #[test]
    fn test_semester_unknown_lands_in_zero() {
        let options = AggregateOptions::default();
        let groups = group_courses(&[record("MISC", 8.0, "PASSED")], &options);
        assert_eq!(groups[0].semester, 0);

        let sections = semester_sections(groups);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].semester, 0);
    }

    #[test]
    fn test_explicit_semester_wins_over_code() {
        let options = AggregateOptions::default();
        let mut rec = record("ICE511", 8.0, "PASSED");
        rec.semester = Some(3);
        let groups = group_courses(&[rec], &options);
        assert_eq!(groups[0].semester, 3);
    }

    #[test]
    fn test_sections_ascending_with_zero_first() {
        let options = AggregateOptions::default();
        let grades = vec![
            record("ICE511", 8.0, "PASSED"),
            record("MISC", 7.0, "PASSED"),
            record("ICE105", 6.0, "PASSED"),
        ];

        let sections = semester_sections(group_courses(&grades, &options));
        let numbers: Vec<u32> = sections.iter().map(|s| s.semester).collect();
        assert_eq!(numbers, vec![0, 1, 5]);
    }

    #[test]
    fn test_section_gpa_over_passed_only() {
        let options = AggregateOptions::default();
        let grades = vec![
            record("ICE105", 8.0, "PASSED"),
            record("ICE106", 4.0, "FAILED"),
            record("ICE107", 6.0, "PASSED"),
        ];

        let sections = semester_sections(group_courses(&grades, &options));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].gpa, 7.0);
        assert_eq!(sections[0].passed_count, 2);
    }

    #[test]
    fn test_grouping_shuffle_invariant() {
        let options = AggregateOptions::default();
        let mut winter = record("ICE105", 3.0, "FAILED");
        winter.exam_period = "Winter 2022".to_string();
        let mut spring = record("ICE105", 6.0, "PASSED");
        spring.exam_period = "June 2022".to_string();
        let other = record("ICE203", 9.0, "PASSED");

        let forward = group_courses(&[winter.clone(), spring.clone(), other.clone()], &options);
        let backward = group_courses(&[other, spring, winter], &options);

        let fw: Vec<&str> = forward.iter().map(|g| g.key.as_str()).collect();
        let bw: Vec<&str> = backward.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(fw, bw);
        assert_eq!(forward[0].attempts, backward[0].attempts);
    }
}
