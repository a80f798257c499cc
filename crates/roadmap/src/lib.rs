//! Roadmap generation for Pathwise.
//!
//! Turns a learner profile into a persisted course: prompt assembly, the
//! multi-strategy JSON recovery chain for model output, trust-boundary
//! validation, the deterministic synthetic fallback, and transactional
//! persistence of the course + milestones + progress bundle.

#![warn(missing_docs)]

pub mod prompt;
pub mod parser;
pub mod validate;
pub mod fallback;
pub mod service;

pub use prompt::{build_prompt, milestone_count};
pub use parser::{parse_roadmap, ParseFailure, RawMilestone, RawQuestion, RawRoadmap};
pub use validate::{validate_roadmap, ValidationError};
pub use fallback::synthetic_roadmap;
pub use service::{GeneratedCourse, GenerationError, RoadmapService};
