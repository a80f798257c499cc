//! Next-course suggestion document.

use serde::{Deserialize, Serialize};

/// Structured career and learning suggestions for a completed course.
/// Serialized in camelCase to match the model's response schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSuggestions {
    /// What the learner can do with the skills they already have
    pub current_opportunities: SuggestionSection,

    /// Recommended follow-up courses and skills
    pub next_steps: NextStepSection,

    /// Longer-term career trajectories
    pub career_paths: SuggestionSection,
}

/// A titled list of plain-text suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSection {
    /// Section heading
    pub title: String,
    /// Suggestion lines
    pub items: Vec<String>,
}

/// A titled list of structured next steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStepSection {
    /// Section heading
    pub title: String,
    /// Next steps
    pub items: Vec<NextStep>,
}

/// One recommended next step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStep {
    /// What to learn or obtain
    pub name: String,
    /// How it builds on the completed course
    pub description: String,
    /// Expected career impact
    pub impact: String,
}
