//! Learner profile collected by the onboarding flow.

use serde::{Deserialize, Serialize};

/// What the learner wants to study and how, gathered step by step during
/// onboarding and handed to the roadmap generator in one piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// Topic to learn (free text, e.g. "Web Development")
    pub topic: String,

    /// Available duration (free text; "1 week", "2 weeks" and "4 weeks"
    /// drive the milestone-count policy, anything else gets the default)
    pub duration: String,

    /// Current skill level
    pub skill_level: SkillLevel,

    /// Preferred learning style
    pub preference: Preference,

    /// Main learning goal
    pub goal: Goal,
}

/// Self-reported skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    /// New to the topic
    Beginner,
    /// Some prior exposure
    Intermediate,
    /// Comfortable with the fundamentals
    Advanced,
}

impl SkillLevel {
    /// Label used in prompts and rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        }
    }
}

/// Preferred resource mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    /// Video-first resources
    Videos,
    /// Written documentation and articles
    Notes,
    /// Playgrounds, labs and interactive tutorials
    Interactive,
}

impl Preference {
    /// Label used in prompts and rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Videos => "Videos",
            Preference::Notes => "Notes",
            Preference::Interactive => "Interactive",
        }
    }
}

/// Why the learner is studying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// Preparing for an exam
    Exam,
    /// Building a project
    Project,
    /// Job placement preparation
    Placement,
    /// Anything else
    Other,
}

impl Goal {
    /// Label used in prompts and rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Exam => "Exam",
            Goal::Project => "Project",
            Goal::Placement => "Placement",
            Goal::Other => "Other",
        }
    }
}
