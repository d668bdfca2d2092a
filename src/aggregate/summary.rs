//! Degree-level statistics over the semester sections.

use crate::aggregate::types::{BestCourse, SemesterSection, Summary, TrendPoint};
use crate::aggregate::utility::{mean, round2};

/// Total ECTS credits required for the degree.
pub const DEGREE_ECTS: f64 = 240.0;

/// Computes the summary block over passed courses only.
///
/// Sections arrive in ascending semester order and courses in key order, so
/// the first-wins tie-break for the best course is deterministic.
pub fn summarize(sections: &[SemesterSection]) -> Summary {
    let mut passed_count = 0;
    let mut failed_count = 0;
    let mut passed_ects = 0.0;
    let mut grades: Vec<f64> = Vec::new();
    let mut best: Option<BestCourse> = None;

    for section in sections {
        for course in &section.courses {
            if !course.passed {
                failed_count += 1;
                continue;
            }

            passed_count += 1;
            passed_ects += course.current().ects.unwrap_or(0.0);

            if let Some(grade) = course.current().grade {
                grades.push(grade);
                let improves = best.as_ref().is_none_or(|b| grade > b.grade);
                if improves {
                    best = Some(BestCourse {
                        key: course.key.clone(),
                        name: course.name.clone(),
                        grade,
                    });
                }
            }
        }
    }

    let average = if grades.is_empty() {
        None
    } else {
        Some(round2(mean(&grades)))
    };

    let ects_percent = ((passed_ects / DEGREE_ECTS * 100.0).round() as u32).min(100);

    let trend = sections
        .iter()
        .filter(|s| s.passed_count > 0)
        .map(|s| TrendPoint {
            semester: s.semester,
            label: semester_label(s.semester),
            gpa: round2(s.gpa),
            passed_count: s.passed_count,
        })
        .collect();

    Summary {
        passed_count,
        failed_count,
        passed_ects,
        average,
        best,
        ects_percent,
        trend,
    }
}

/// Human label for a semester number; 0 is the unclassified bucket.
pub fn semester_label(semester: u32) -> String {
    if semester == 0 {
        "Other".to_string()
    } else {
        format!("Semester {semester}")
    }
}
