//! Trust-boundary validation of recovered roadmap documents.
//!
//! Converts [`RawRoadmap`] shapes into the fixed core data model. Nothing
//! unvalidated flows past this point: the quiz is checked strictly because
//! it gates progression, while resources degrade to empty rather than
//! rejecting an otherwise usable roadmap.

use pathwise_core::{MilestoneResources, QuizQuestion, Roadmap, RoadmapMilestone};

use crate::parser::{RawMilestone, RawQuestion, RawRoadmap};

/// Why a recovered document was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// No usable course name
    #[error("roadmap has no course name")]
    MissingCourseName,

    /// Empty milestone list
    #[error("roadmap has no milestones")]
    NoMilestones,

    /// A milestone failed a structural check
    #[error("milestone {index}: {reason}")]
    BadMilestone {
        /// 0-based position in the document
        index: usize,
        /// What was wrong
        reason: String,
    },
}

/// Validate a recovered document into a [`Roadmap`].
///
/// Milestone order is taken from the document only when it already is the
/// exact sequence 1..=N; anything absent or non-sequential falls back to
/// array position.
pub fn validate_roadmap(
    raw: RawRoadmap,
    requested_duration: &str,
) -> Result<Roadmap, ValidationError> {
    let course_name = raw
        .course_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingCourseName)?;

    if raw.milestones.is_empty() {
        return Err(ValidationError::NoMilestones);
    }

    let keep_claimed_order = is_sequential(&raw.milestones);

    let mut milestones = Vec::with_capacity(raw.milestones.len());
    for (index, raw_milestone) in raw.milestones.into_iter().enumerate() {
        let order = if keep_claimed_order {
            raw_milestone.order.unwrap_or(index as u32 + 1)
        } else {
            index as u32 + 1
        };
        milestones.push(validate_milestone(raw_milestone, index, order)?);
    }

    let duration = raw
        .duration
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| requested_duration.to_string());

    Ok(Roadmap {
        course_name,
        duration,
        milestones,
    })
}

fn is_sequential(milestones: &[RawMilestone]) -> bool {
    milestones
        .iter()
        .enumerate()
        .all(|(index, m)| m.order == Some(index as u32 + 1))
}

fn validate_milestone(
    raw: RawMilestone,
    index: usize,
    order: u32,
) -> Result<RoadmapMilestone, ValidationError> {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ValidationError::BadMilestone {
            index,
            reason: "missing title".to_string(),
        })?;

    if raw.quiz.is_empty() {
        return Err(ValidationError::BadMilestone {
            index,
            reason: "milestone has no quiz".to_string(),
        });
    }

    let mut quiz = Vec::with_capacity(raw.quiz.len());
    for (question_index, question) in raw.quiz.into_iter().enumerate() {
        quiz.push(validate_question(question, index, question_index)?);
    }

    // Resources are display-only; a malformed shape degrades to empty.
    let resources: MilestoneResources =
        serde_json::from_value(raw.resources).unwrap_or_default();

    Ok(RoadmapMilestone {
        title,
        order,
        resources,
        quiz,
    })
}

fn validate_question(
    raw: RawQuestion,
    milestone_index: usize,
    question_index: usize,
) -> Result<QuizQuestion, ValidationError> {
    let bad = |reason: String| ValidationError::BadMilestone {
        index: milestone_index,
        reason,
    };

    let question = raw
        .question
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| bad(format!("question {} has no text", question_index)))?;

    if raw.options.len() < 2 {
        return Err(bad(format!(
            "question {} has {} options, need at least 2",
            question_index,
            raw.options.len()
        )));
    }

    let correct = raw
        .correct
        .filter(|&c| c < raw.options.len())
        .ok_or_else(|| bad(format!("question {} has an invalid answer key", question_index)))?;

    Ok(QuizQuestion {
        question,
        options: raw.options,
        correct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_roadmap;

    fn valid_document() -> &'static str {
        r#"{
            "courseName": "Intro to Rust",
            "duration": "1 week",
            "milestones": [
                {
                    "title": "Ownership",
                    "order": 1,
                    "resources": {"website": "https://doc.rust-lang.org/book/"},
                    "quiz": [
                        {"question": "Who owns a value?", "options": ["One binding", "Everyone"], "correct": 0}
                    ]
                },
                {
                    "title": "Borrowing",
                    "order": 2,
                    "resources": {},
                    "quiz": [
                        {"question": "How many mutable borrows?", "options": ["One", "Many"], "correct": 0}
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn test_valid_document_passes() {
        let raw = parse_roadmap(valid_document()).unwrap();
        let roadmap = validate_roadmap(raw, "1 week").unwrap();

        assert_eq!(roadmap.course_name, "Intro to Rust");
        assert_eq!(roadmap.milestones.len(), 2);
        assert_eq!(roadmap.milestones[0].order, 1);
        assert_eq!(
            roadmap.milestones[0].resources.website.as_deref(),
            Some("https://doc.rust-lang.org/book/")
        );
    }

    #[test]
    fn test_missing_name_rejected() {
        let raw = parse_roadmap(r#"{"milestones": [{"title": "x"}]}"#).unwrap();
        assert!(matches!(
            validate_roadmap(raw, "1 week"),
            Err(ValidationError::MissingCourseName)
        ));
    }

    #[test]
    fn test_empty_milestones_rejected() {
        let raw = parse_roadmap(r#"{"courseName": "Rust", "milestones": []}"#).unwrap();
        assert!(matches!(
            validate_roadmap(raw, "1 week"),
            Err(ValidationError::NoMilestones)
        ));
    }

    #[test]
    fn test_non_sequential_order_falls_back_to_position() {
        let raw = parse_roadmap(
            r#"{
                "courseName": "Rust",
                "milestones": [
                    {"title": "A", "order": 7, "quiz": [{"question": "q", "options": ["a", "b"], "correct": 1}]},
                    {"title": "B", "quiz": [{"question": "q", "options": ["a", "b"], "correct": 0}]}
                ]
            }"#,
        )
        .unwrap();

        let roadmap = validate_roadmap(raw, "1 week").unwrap();
        let orders: Vec<u32> = roadmap.milestones.iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_answer_key_out_of_range_rejected() {
        let raw = parse_roadmap(
            r#"{
                "courseName": "Rust",
                "milestones": [
                    {"title": "A", "order": 1, "quiz": [{"question": "q", "options": ["a", "b"], "correct": 5}]}
                ]
            }"#,
        )
        .unwrap();

        assert!(matches!(
            validate_roadmap(raw, "1 week"),
            Err(ValidationError::BadMilestone { index: 0, .. })
        ));
    }

    #[test]
    fn test_malformed_resources_degrade_to_empty() {
        let raw = parse_roadmap(
            r#"{
                "courseName": "Rust",
                "milestones": [
                    {"title": "A", "order": 1, "resources": "see the book",
                     "quiz": [{"question": "q", "options": ["a", "b"], "correct": 0}]}
                ]
            }"#,
        )
        .unwrap();

        let roadmap = validate_roadmap(raw, "1 week").unwrap();
        assert!(roadmap.milestones[0].resources.website.is_none());
        assert!(roadmap.milestones[0].resources.youtube.is_empty());
    }
}
