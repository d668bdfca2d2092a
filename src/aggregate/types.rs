//! Data types used by the grade-aggregation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One exam sitting, already normalized from the raw portal payload.
///
/// All fields are best-effort: the portal schema varies by endpoint, so the
/// adapter in [`crate::normalize`] resolves each concept to a default rather
/// than failing. Grades are on the 0–10 scale with one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub course_code: Option<String>,
    pub course_name: String,
    pub grade: Option<f64>,
    pub ects: Option<f64>,
    pub status: String,
    pub exam_period: String,
    pub exam_period_id: Option<String>,
    pub course_syllabus_id: Option<String>,
    pub syllabus_year: Option<i32>,
    pub semester: Option<u32>,
    pub attempt_number: Option<u32>,
    pub recorded_at: Option<NaiveDate>,
}

impl GradeRecord {
    /// Stable course identity: code when present, otherwise the name.
    pub fn course_key(&self) -> &str {
        match self.course_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => &self.course_name,
        }
    }
}

/// All sittings for one course identity, oldest effort first.
#[derive(Debug, Clone, Serialize)]
pub struct CourseGroup {
    pub key: String,
    pub code: Option<String>,
    pub name: String,
    /// Curriculum semester the course is scheduled in; 0 means unclassified.
    pub semester: u32,
    pub attempts: Vec<GradeRecord>,
    pub passed: bool,
}

impl CourseGroup {
    /// The authoritative result for the course: the last ordered attempt.
    ///
    /// Groups are built from at least one record, so this never fails.
    pub fn current(&self) -> &GradeRecord {
        self.attempts.last().expect("course group has no attempts")
    }
}

/// Course groups sharing a curriculum semester, plus the semester's GPA
/// over its passed courses (0.0 when none passed).
#[derive(Debug, Clone, Serialize)]
pub struct SemesterSection {
    pub semester: u32,
    pub courses: Vec<CourseGroup>,
    pub gpa: f64,
    pub passed_count: usize,
}

/// The passed course with the highest current grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestCourse {
    pub key: String,
    pub name: String,
    pub grade: f64,
}

/// One point of the academic-progress series: a semester with at least one
/// passed course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub semester: u32,
    pub label: String,
    pub gpa: f64,
    pub passed_count: usize,
}

/// Degree-level numbers, computed over passed courses only.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub passed_count: usize,
    pub failed_count: usize,
    pub passed_ects: f64,
    /// Mean current grade over passed courses; `None` when nothing is passed.
    pub average: Option<f64>,
    pub best: Option<BestCourse>,
    /// Progress toward the 240-ECTS degree target, capped at 100.
    pub ects_percent: u32,
    pub trend: Vec<TrendPoint>,
}

/// Complete aggregation output: a read-only snapshot recomputed from scratch
/// on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    pub semesters: Vec<SemesterSection>,
    pub summary: Summary,
}

/// Knobs that vary by deployment locale.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Uppercase substrings of the status text that mark a failing sitting.
    pub failure_keywords: Vec<String>,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            failure_keywords: vec!["FAIL".to_string(), "ΑΠΟΤ".to_string()],
        }
    }
}
