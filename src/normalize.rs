//! Adapter from the raw portal payload to canonical [`GradeRecord`]s.
//!
//! The portal's grade schema varies by endpoint and deployment, so every
//! field is resolved through a fixed candidate-path list and degrades to a
//! default instead of failing. This is the only place that touches raw JSON;
//! the aggregator downstream operates on fully-typed records.

use chrono::NaiveDate;
use serde_json::Value;

use crate::aggregate::GradeRecord;

const COURSE_CODE: &[&str] = &["courseCode", "course_code", "code", "course.code"];
const COURSE_NAME: &[&str] = &[
    "courseName",
    "course_name",
    "title",
    "name",
    "course.name",
    "course.title",
];
const GRADE: &[&str] = &["grade", "finalGrade", "gradeValue", "value", "result.grade"];
const ECTS: &[&str] = &["ects", "ectsCredits", "credits", "course.ects"];
const STATUS: &[&str] = &["status", "result", "examResult", "gradeStatus"];
const EXAM_PERIOD: &[&str] = &[
    "examPeriod",
    "examPeriodTitle",
    "period",
    "examPeriod.title",
    "period.title",
];
const EXAM_PERIOD_ID: &[&str] = &["examPeriodId", "examPeriod.id", "period.id"];
const SYLLABUS_ID: &[&str] = &[
    "courseSyllabusId",
    "course.courseSyllabusId",
    "syllabus.id",
    "courseSyllabus.id",
];
const SYLLABUS_YEAR: &[&str] = &["syllabusYear", "academicYear", "year", "syllabus.year"];
const SEMESTER: &[&str] = &["semester", "courseSemester", "course.semester"];
const SEMESTER_OBJECT: &[&str] = &["semesterId", "semester", "course.semester"];
const ATTEMPT: &[&str] = &["attemptNumber", "attempt", "examAttempt"];
const DATES: &[&str] = &["gradeDate", "examDate", "insertedDate", "recordedAt", "date"];

/// Keys under which the grades endpoint may wrap its record array.
const LIST_WRAPPERS: &[&str] = &["grades", "data", "content", "items"];

/// Extracts canonical grade records from the `/grades/all` payload.
///
/// Accepts a bare array or an object wrapping one; non-object entries are
/// skipped. Never fails.
pub fn records_from_value(payload: &Value) -> Vec<GradeRecord> {
    record_array(payload)
        .iter()
        .filter(|v| v.is_object())
        .map(record_from_value)
        .collect()
}

fn record_array(payload: &Value) -> &[Value] {
    if let Some(list) = payload.as_array() {
        return list;
    }
    for key in LIST_WRAPPERS {
        if let Some(list) = payload.get(key).and_then(Value::as_array) {
            return list;
        }
    }
    &[]
}

fn record_from_value(raw: &Value) -> GradeRecord {
    GradeRecord {
        course_code: pick_string(raw, COURSE_CODE),
        course_name: pick_string(raw, COURSE_NAME).unwrap_or_default(),
        grade: pick_number(raw, GRADE).map(normalize_grade),
        ects: pick_number(raw, ECTS),
        status: pick_string(raw, STATUS).unwrap_or_default(),
        exam_period: pick_string(raw, EXAM_PERIOD).unwrap_or_default(),
        exam_period_id: pick_id(raw, EXAM_PERIOD_ID),
        course_syllabus_id: pick_id(raw, SYLLABUS_ID),
        syllabus_year: pick_number(raw, SYLLABUS_YEAR).map(|y| y as i32),
        semester: pick_semester(raw),
        attempt_number: pick_number(raw, ATTEMPT).and_then(|n| {
            if n >= 1.0 { Some(n as u32) } else { None }
        }),
        recorded_at: pick_date(raw, DATES),
    }
}

/// Rescales a raw grade onto the 0–10 scale with one decimal.
///
/// The portal reports some endpoints on a 0–1 scale; a value at or below 1
/// is taken as such and multiplied by 10 before rounding.
pub fn normalize_grade(raw: f64) -> f64 {
    let scaled = if raw <= 1.0 { raw * 10.0 } else { raw };
    (scaled * 10.0).round() / 10.0
}

/// Cohort grade samples for one course/period, normalized like individual
/// grades. Accepts a bare number array or an object wrapping one.
pub fn distribution_from_value(payload: &Value) -> Vec<f64> {
    let list = if let Some(list) = payload.as_array() {
        list
    } else {
        let mut found: &[Value] = &[];
        for key in ["grades", "values", "distribution", "data", "stats"] {
            if let Some(list) = payload.get(key).and_then(Value::as_array) {
                found = list;
                break;
            }
        }
        found
    };

    list.iter()
        .filter_map(number_value)
        .map(normalize_grade)
        .collect()
}

// ── Tolerant accessors ──────────────────────────────────────────────

/// Resolves a dotted candidate path ("course.code") inside a record.
fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cursor = raw;
    for segment in path.split('.') {
        cursor = cursor.get(segment)?;
    }
    Some(cursor)
}

/// A candidate of the wrong shape (the period as an object where a title
/// was expected, say) never blocks later candidates.
fn pick_string(raw: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| lookup(raw, path))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
}

/// Numbers arrive as JSON numbers or as strings, sometimes with a comma
/// decimal separator.
fn pick_number(raw: &Value, candidates: &[&str]) -> Option<f64> {
    candidates
        .iter()
        .filter_map(|path| lookup(raw, path))
        .find_map(number_value)
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Opaque identifiers may be strings or numbers; both become strings.
fn pick_id(raw: &Value, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| lookup(raw, path))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Semester resolution: a plain semester-like field, else a structured
/// semester object carrying a numeric sort order. The course-code fallback
/// happens later, in the aggregator.
fn pick_semester(raw: &Value) -> Option<u32> {
    if let Some(n) = pick_number(raw, SEMESTER) {
        if n >= 1.0 {
            return Some(n as u32);
        }
    }
    for path in SEMESTER_OBJECT {
        if let Some(object) = lookup(raw, path).filter(|v| v.is_object()) {
            if let Some(n) = pick_number(object, &["sortOrder", "number", "id"]) {
                if n >= 1.0 {
                    return Some(n as u32);
                }
            }
        }
    }
    None
}

/// First parseable date among the candidates: RFC 3339, `YYYY-MM-DD`, or
/// `DD/MM/YYYY`.
fn pick_date(raw: &Value, candidates: &[&str]) -> Option<NaiveDate> {
    candidates
        .iter()
        .filter_map(|path| lookup(raw, path))
        .filter_map(Value::as_str)
        .find_map(parse_date)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}
