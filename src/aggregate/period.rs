//! Heuristics for free-text exam-period strings and course codes.

/// Keywords placing an exam period in the winter term (January sittings).
static WINTER: &[&str] = &["WINTER", "ΧΕΙΜ", "JAN", "ΙΑΝ", "FEB", "ΦΕΒ"];
/// Keywords placing an exam period in the spring term (June sittings).
static SPRING: &[&str] = &["SPRING", "ΕΑΡ", "JUN", "ΙΟΥΝ", "SUMMER", "ΘΕΡ"];
/// Keywords placing an exam period in the autumn retake term (September).
static AUTUMN: &[&str] = &["AUTUMN", "FALL", "SEPT", "ΣΕΠΤ", "ΕΠΑΝ", "RESIT"];

/// Derives a sortable key from a free-text exam-period title.
///
/// Extracts the latest 4-digit year token (periods like "2023-2024" name the
/// academic year; the later year orders retakes correctly) and classifies the
/// text into one of three term buckets:
///
/// | Bucket  | Term |
/// |---------|------|
/// | winter  | 1    |
/// | spring  | 2    |
/// | autumn  | 3    |
///
/// The result is `year * 10 + term` (term 0 when no bucket matches), or
/// `None` when the text carries no year token at all.
pub fn period_key(text: &str) -> Option<i64> {
    let year = latest_year(text)?;
    let upper = text.to_uppercase();

    let term = if AUTUMN.iter().any(|k| upper.contains(k)) {
        3
    } else if SPRING.iter().any(|k| upper.contains(k)) {
        2
    } else if WINTER.iter().any(|k| upper.contains(k)) {
        1
    } else {
        0
    };

    Some(year * 10 + term)
}

/// The largest 4-digit number embedded in the text, if any.
fn latest_year(text: &str) -> Option<i64> {
    let mut best: Option<i64> = None;
    let mut digits = String::new();

    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.len() == 4 {
                let year: i64 = digits.parse().unwrap_or(0);
                if best.is_none_or(|b| year > b) {
                    best = Some(year);
                }
            }
            digits.clear();
        }
    }

    best
}

/// Curriculum semester implied by a course code: the first digit after the
/// alphabetic prefix ("ICE105" → 1). `None` when the code has no digit.
pub fn course_code_semester(code: &str) -> Option<u32> {
    code.chars().filter_map(|c| c.to_digit(10)).find(|&d| d != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_key_terms() {
        assert_eq!(period_key("Winter 2023"), Some(20231));
        assert_eq!(period_key("June 2023"), Some(20232));
        assert_eq!(period_key("September 2023"), Some(20233));
        assert_eq!(period_key("ΧΕΙΜΕΡΙΝΗ ΕΞΕΤΑΣΤΙΚΗ 2022"), Some(20221));
        assert_eq!(period_key("ΕΑΡΙΝΗ 2022"), Some(20222));
        assert_eq!(period_key("ΕΠΑΝΑΛΗΠΤΙΚΗ ΣΕΠΤΕΜΒΡΙΟΥ 2022"), Some(20223));
    }

    #[test]
    fn test_period_key_prefers_latest_year() {
        // Academic-year ranges carry two year tokens
        assert_eq!(period_key("ΧΕΙΜΕΡΙΝΗ 2023-2024"), Some(20241));
        assert_eq!(period_key("2019/2020 September"), Some(20203));
    }

    #[test]
    fn test_period_key_unknown_term_still_sorts() {
        assert_eq!(period_key("Περίοδος 2021"), Some(20210));
    }

    #[test]
    fn test_period_key_no_year() {
        assert_eq!(period_key("winter resit"), None);
        assert_eq!(period_key(""), None);
        // 2- and 5-digit tokens are not years
        assert_eq!(period_key("period 23"), None);
        assert_eq!(period_key("id 12345"), None);
    }

    #[test]
    fn test_course_code_semester() {
        assert_eq!(course_code_semester("ICE105"), Some(1));
        assert_eq!(course_code_semester("ICE511"), Some(5));
        assert_eq!(course_code_semester("MISC"), None);
        assert_eq!(course_code_semester(""), None);
        // A zero digit carries no semester information
        assert_eq!(course_code_semester("GEN012"), Some(1));
    }
}
