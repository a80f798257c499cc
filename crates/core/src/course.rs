//! Course model - a generated learning path owned by one user.

use serde::{Deserialize, Serialize};

use crate::id::{CourseId, UserId};
use crate::milestone::{MilestoneResources, QuizQuestion};
use crate::Time;

/// A course is one generated learning path. Immutable once created except
/// for `status`, which flips to `Completed` when every milestone is done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: CourseId,

    /// Owning user
    pub user_id: UserId,

    /// Course name, taken from the generated roadmap
    pub name: String,

    /// Duration the roadmap was generated for
    pub duration: String,

    /// Course status
    pub status: CourseStatus,

    /// The validated roadmap document the course was created from
    pub roadmap: Roadmap,

    /// Whether the roadmap came from the model or the synthetic fallback
    pub source: RoadmapSource,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// Course status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    /// Course is in progress
    Active,
    /// Every milestone has been completed
    Completed,
}

/// Where a roadmap came from. Synthetic roadmaps are served when the model
/// response could not be recovered; the user flow is identical but operators
/// can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapSource {
    /// Parsed from a model response
    Model,
    /// Deterministic fallback document
    Synthetic,
}

/// A validated roadmap document: course name, duration echo, ordered
/// milestones. Only shapes that passed trust-boundary validation become a
/// `Roadmap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    /// Course title
    pub course_name: String,

    /// Duration echo from the request
    pub duration: String,

    /// Ordered milestones, `order` normalized to 1..=N
    pub milestones: Vec<RoadmapMilestone>,
}

/// One milestone inside a roadmap document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapMilestone {
    /// Milestone title
    pub title: String,

    /// 1-based position within the course
    pub order: u32,

    /// Learning resources
    pub resources: MilestoneResources,

    /// Gating quiz
    pub quiz: Vec<QuizQuestion>,
}
