//! Per-user milestone progress.

use serde::{Deserialize, Serialize};

use crate::id::{CourseId, MilestoneId, UserId};
use crate::Time;

/// Status of one milestone for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    /// Not reachable yet; interacting with it is rejected
    Locked,
    /// The frontier milestone the user is currently working on
    Active,
    /// Quiz passed; open for read-only review
    Completed,
}

/// One progress row per (user, milestone). Created at course creation with
/// milestone 1 active and the rest locked; mutated only by the quiz
/// evaluator's unlock cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Owning user
    pub user_id: UserId,

    /// Course the milestone belongs to
    pub course_id: CourseId,

    /// The milestone this row tracks
    pub milestone_id: MilestoneId,

    /// Current status
    pub status: MilestoneStatus,

    /// Score of the passing quiz submission, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u8>,

    /// Last transition time
    pub updated_at: Time,
}

impl ProgressRecord {
    /// Create the initial record for a milestone at course creation.
    pub fn initial(
        user_id: UserId,
        course_id: CourseId,
        milestone_id: MilestoneId,
        status: MilestoneStatus,
        now: Time,
    ) -> Self {
        Self {
            user_id,
            course_id,
            milestone_id,
            status,
            quiz_score: None,
            updated_at: now,
        }
    }
}

/// Aggregate completion for a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Completed milestones
    pub completed: usize,

    /// Total milestones
    pub total: usize,
}

impl CourseProgress {
    /// Display percentage, rounded to the nearest integer. Empty courses
    /// read as 0%.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}
