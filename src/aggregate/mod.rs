//! Grade aggregation: the core of the crate.
//!
//! Turns a flat, order-irrelevant list of exam sittings into per-course
//! histories grouped by curriculum semester, plus degree-level summary
//! statistics. Pure and total: malformed fields degrade to defaults upstream
//! in [`crate::normalize`], and every input record ends up in exactly one
//! course group.

pub mod course;
pub mod period;
pub mod summary;
pub mod types;
pub mod utility;

pub use types::{
    AggregateOptions, AggregateResult, BestCourse, CourseGroup, GradeRecord, SemesterSection,
    Summary, TrendPoint,
};

use course::{group_courses, semester_sections};
use summary::summarize;

/// Recomputes the whole aggregate view from scratch.
///
/// Deterministic: two calls over the same input produce identical output,
/// and the result does not depend on the input order except through the
/// documented last-resort attempt tie-break.
pub fn aggregate(grades: &[GradeRecord], options: &AggregateOptions) -> AggregateResult {
    let groups = group_courses(grades, options);
    let semesters = semester_sections(groups);
    let summary = summarize(&semesters);

    AggregateResult { semesters, summary }
}
