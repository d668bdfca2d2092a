//! Trait and types for the student-information portal API.

use anyhow::Result;
use serde_json::Value;

/// Abstraction over the portal endpoints the client consumes.
///
/// Payloads stay as raw [`Value`]s at this seam; shaping them into typed
/// records is the job of [`crate::normalize`] in the library.
#[async_trait::async_trait]
pub trait StudentApi {
    /// The logged-in student's profile data.
    async fn student_info(&self) -> Result<Value>;

    /// The complete grade history, one entry per exam sitting.
    async fn grades(&self) -> Result<Value>;

    /// Cohort grade samples for one course syllabus and exam period.
    async fn grade_distribution(
        &self,
        course_syllabus_id: &str,
        exam_period_id: &str,
    ) -> Result<Value>;
}
