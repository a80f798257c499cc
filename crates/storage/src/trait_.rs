//! Storage trait abstraction.

use async_trait::async_trait;
use pathwise_core::{
    Certificate, Course, CourseId, Milestone, MilestoneId, ProgressRecord, UserId,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation, e.g. a second certificate for the same course
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for Pathwise data.
///
/// This trait allows different storage backends to be plugged in. Writes
/// between `commit` calls form one logical unit; `rollback` restores the
/// last committed state so a failed multi-record mutation leaves nothing
/// behind.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Course operations ===

    /// Save a course (create or update).
    async fn save_course(&mut self, course: &Course) -> Result<()>;

    /// Load a course by ID.
    async fn load_course(&self, id: CourseId) -> Result<Option<Course>>;

    /// List all courses owned by a user.
    async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>>;

    // === Milestone operations ===

    /// Save milestones in bulk at course creation.
    async fn save_milestones(&mut self, milestones: &[Milestone]) -> Result<()>;

    /// Load a milestone by ID.
    async fn load_milestone(&self, id: MilestoneId) -> Result<Option<Milestone>>;

    /// List a course's milestones in ascending `order_index`.
    async fn list_milestones(&self, course_id: CourseId) -> Result<Vec<Milestone>>;

    // === Progress operations ===

    /// Save a progress record (create or update), keyed by (user, milestone).
    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()>;

    /// Load the progress record for a (user, milestone) pair.
    async fn load_progress(
        &self,
        user_id: UserId,
        milestone_id: MilestoneId,
    ) -> Result<Option<ProgressRecord>>;

    /// List a user's progress records for a course.
    async fn list_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<ProgressRecord>>;

    // === Certificate operations ===

    /// Save a certificate. Fails with [`StorageError::Conflict`] if one
    /// already exists for the same (user, course).
    async fn save_certificate(&mut self, certificate: &Certificate) -> Result<()>;

    /// Load the certificate for a (user, course) pair.
    async fn load_certificate(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Certificate>>;

    /// List all certificates issued to a user.
    async fn list_certificates(&self, user_id: UserId) -> Result<Vec<Certificate>>;

    // === Transaction support ===

    /// Commit pending changes with a message.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Roll back pending changes to the last committed state.
    async fn rollback(&mut self) -> Result<()>;
}
