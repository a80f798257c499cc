//! Next-course suggestions for Pathwise.
//!
//! One model call per completed course; unparseable output degrades to a
//! static, schema-valid fallback document so callers always get usable
//! suggestions.

#![warn(missing_docs)]

pub mod service;

pub use service::{fallback_suggestions, SuggestionError, SuggestionService};
