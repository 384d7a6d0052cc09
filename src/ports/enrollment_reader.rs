//! EnrollmentReader port - which courses a user is enrolled in.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, UserId};

#[async_trait]
pub trait EnrollmentReader: Send + Sync {
    /// Courses the user is enrolled in; empty for unknown users.
    async fn enrolled_courses(&self, user_id: &UserId) -> Result<Vec<CourseId>, DomainError>;
}
