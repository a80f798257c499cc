//! Milestone model - one quiz-gated unit of a course roadmap.

use serde::{Deserialize, Serialize};

use crate::id::{CourseId, MilestoneId};
use crate::Time;

/// A stored milestone. Created in bulk alongside its course and immutable
/// thereafter; per-user state lives in the progress records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier
    pub id: MilestoneId,

    /// Owning course
    pub course_id: CourseId,

    /// Milestone title
    pub title: String,

    /// 1-based position, unique per course
    pub order_index: u32,

    /// Learning resources
    pub resources: MilestoneResources,

    /// Gating quiz, in question order
    pub quiz: Vec<QuizQuestion>,

    /// When created
    pub created_at: Time,
}

/// Resources attached to a milestone. Every field is optional; the model is
/// free to return any mix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneResources {
    /// Primary website or documentation link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// YouTube videos
    #[serde(default)]
    pub youtube: Vec<YoutubeVideo>,

    /// Further reading
    #[serde(default)]
    pub additional: Vec<AdditionalResource>,
}

/// A YouTube video resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeVideo {
    /// Video title
    pub title: String,
    /// Channel name
    pub channel: String,
    /// Video URL
    pub url: String,
}

/// An additional resource (article, documentation, exercise, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalResource {
    /// Resource title
    pub title: String,
    /// Resource URL
    pub url: String,
    /// Free-form kind, e.g. "article" or "documentation"
    #[serde(rename = "type")]
    pub kind: String,
}

/// One multiple-choice quiz question. `correct` indexes into `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text
    pub question: String,

    /// Answer options, at least two
    pub options: Vec<String>,

    /// Index of the correct option
    pub correct: usize,
}
