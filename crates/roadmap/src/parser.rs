//! Multi-strategy JSON recovery for model output.
//!
//! Models asked for "JSON only" still wrap their answer in markdown fences
//! or prose often enough that direct parsing is not sufficient. Recovery is
//! an ordered chain of pure extraction strategies; the first candidate that
//! deserializes wins.

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// A roadmap document as the model produced it, before trust-boundary
/// validation. Every field is optional so recovery is decided by the
/// validator, not the deserializer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoadmap {
    /// Course title
    #[serde(rename = "courseName", default)]
    pub course_name: Option<String>,

    /// Duration echo
    #[serde(default)]
    pub duration: Option<String>,

    /// Milestones as returned
    #[serde(default)]
    pub milestones: Vec<RawMilestone>,
}

/// One unvalidated milestone.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMilestone {
    /// Milestone title
    #[serde(default)]
    pub title: Option<String>,

    /// 1-based order as the model claims it
    #[serde(default)]
    pub order: Option<u32>,

    /// Resources in whatever shape came back; validated leniently later
    #[serde(default)]
    pub resources: serde_json::Value,

    /// Quiz questions
    #[serde(default)]
    pub quiz: Vec<RawQuestion>,
}

/// One unvalidated quiz question.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    /// Question text
    #[serde(default)]
    pub question: Option<String>,

    /// Answer options
    #[serde(default)]
    pub options: Vec<String>,

    /// Claimed correct option index
    #[serde(default)]
    pub correct: Option<usize>,
}

/// All recovery strategies failed.
#[derive(Debug, thiserror::Error)]
#[error("no strategy recovered a JSON document: {last_error}")]
pub struct ParseFailure {
    /// Error from the last strategy that produced a candidate
    pub last_error: String,
}

/// An extraction strategy: derive a candidate JSON string from raw model
/// output, or nothing if the strategy does not apply.
type Strategy = fn(&str) -> Option<String>;

/// Ordered recovery chain, most direct first.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", direct),
    ("strip-fences", strip_fences),
    ("remove-fenced-blocks", remove_fenced_blocks),
    ("extract-braced-span", extract_braced_span),
    ("slice-outer-braces", slice_outer_braces),
];

/// Parse model output into a [`RawRoadmap`], trying each strategy in order.
pub fn parse_roadmap(content: &str) -> Result<RawRoadmap, ParseFailure> {
    let mut last_error = "no candidate produced".to_string();

    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(content) else {
            continue;
        };
        match serde_json::from_str::<RawRoadmap>(&candidate) {
            Ok(roadmap) => {
                debug!(strategy = name, "recovered roadmap JSON");
                return Ok(roadmap);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(ParseFailure { last_error })
}

/// Strategy 1: the response already is the document.
fn direct(content: &str) -> Option<String> {
    Some(content.trim().to_string())
}

/// Strategy 2: drop ```json openers and trailing fences, keep the payload.
fn strip_fences(content: &str) -> Option<String> {
    let open = Regex::new(r"```json\s*").ok()?;
    let close = Regex::new(r"```\s*$").ok()?;
    let cleaned = open.replace_all(content, "");
    let cleaned = close.replace_all(&cleaned, "");
    Some(cleaned.trim().to_string())
}

/// Strategy 3: delete fenced blocks entirely; useful when the document sits
/// outside the fences and the fenced part is commentary.
fn remove_fenced_blocks(content: &str) -> Option<String> {
    let fenced = Regex::new(r"(?s)```.*?```").ok()?;
    let cleaned = fenced.replace_all(content, "");
    let cleaned = cleaned.replace("```", "");
    Some(cleaned.trim().to_string())
}

/// Strategy 4: regex out the first brace-to-last-brace span.
fn extract_braced_span(content: &str) -> Option<String> {
    let braced = Regex::new(r"(?s)\{.*\}").ok()?;
    braced.find(content).map(|m| m.as_str().to_string())
}

/// Strategy 5: slice between the first `{` and the last `}`.
fn slice_outer_braces(content: &str) -> Option<String> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end > start {
        Some(content[start..=end].to_string())
    } else {
        None
    }
}
