//! Progression engine for Pathwise.
//!
//! Derives per-milestone lock/unlock/completion state from stored progress
//! records, gates milestone access, and handles course completion with
//! exactly-once certificate issuance.

#![warn(missing_docs)]

pub mod engine;
pub mod completion;

pub use engine::{
    check_frontier_invariant, course_progress, load_owned_course, status_of, CourseView,
    InvariantViolation, MilestoneView, ProgressionEngine, ProgressionError,
};
pub use completion::complete_course;
