//! Quiz evaluation for Pathwise.
//!
//! Scores submissions against a milestone's answer key and applies the
//! unlock cascade: a fully-correct submission completes the milestone,
//! activates the next one, and completes the course after the final
//! milestone.

#![warn(missing_docs)]

pub mod evaluator;

pub use evaluator::{score_submission, QuizError, QuizEvaluator, QuizOutcome, UNSET_ANSWER};
