//! Generative-model client for Pathwise.
//!
//! Provides the [`TextGenerator`] trait used by the roadmap and suggestion
//! services, with a Gemini `generateContent` implementation.

#![warn(missing_docs)]

pub mod client;

pub use client::{GeminiClient, GenerationConfig, TextGenerator};
