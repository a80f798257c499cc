//! Suggestion generation service.

use pathwise_core::{
    CourseSuggestions, NextStep, NextStepSection, SuggestionSection,
};
use pathwise_genai::{GenerationConfig, TextGenerator};
use tracing::warn;

/// Errors surfaced by suggestion generation.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    /// The external model call failed. Parse failures are not errors; they
    /// degrade to the fallback document.
    #[error("suggestion generation failed: {0}")]
    Model(#[source] anyhow::Error),
}

/// Suggestion generation service.
pub struct SuggestionService<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> SuggestionService<G> {
    /// Create a new service.
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Request suggestions for a completed course. A single parse attempt
    /// is made against the response; anything unparseable returns the
    /// static fallback. No retries against the model.
    pub async fn suggest(
        &self,
        completed_course: &str,
        user_preferences: &str,
    ) -> Result<CourseSuggestions, SuggestionError> {
        let prompt = build_prompt(completed_course, user_preferences);
        let config = GenerationConfig {
            temperature: 0.3,
            top_k: Some(20),
            top_p: Some(0.8),
            max_output_tokens: 2048,
        };

        let content = self
            .generator
            .generate(&prompt, &config)
            .await
            .map_err(SuggestionError::Model)?;

        match serde_json::from_str::<CourseSuggestions>(content.trim()) {
            Ok(suggestions) => Ok(suggestions),
            Err(e) => {
                warn!(course = completed_course, "unparseable suggestions, using fallback: {}", e);
                Ok(fallback_suggestions(completed_course))
            }
        }
    }
}

fn build_prompt(completed_course: &str, user_preferences: &str) -> String {
    format!(
        r#"You are a career development AI that analyzes completed courses and provides personalized learning recommendations.

COMPLETED COURSE: "{course}"
USER PREFERENCES: {preferences}

INSTRUCTIONS:
1. Analyze the specific skills and knowledge gained from "{course}"
2. Consider current industry trends and job market demands for this field
3. Research real career opportunities and salary ranges for someone with these skills
4. Suggest specific, actionable next steps that build upon "{course}"

RESPONSE FORMAT - Return ONLY this exact JSON structure with NO additional text:

{{
  "currentOpportunities": {{
    "title": "What You Can Do Now With {course}",
    "items": ["..."]
  }},
  "nextSteps": {{
    "title": "Strategic Next Learning Steps",
    "items": [
      {{"name": "...", "description": "...", "impact": "..."}}
    ]
  }},
  "careerPaths": {{
    "title": "Career Trajectories From {course}",
    "items": ["..."]
  }}
}}

REQUIREMENTS:
- All suggestions must be specific to "{course}" - no generic advice
- Include real salary ranges and timeframes where relevant
- Make career paths progressive (junior -> senior -> leadership)
- Ensure all JSON is valid and properly formatted
- Be concrete and actionable, not vague or theoretical"#,
        course = completed_course,
        preferences = user_preferences,
    )
}

/// Static fallback document, template-filled with the course name.
pub fn fallback_suggestions(completed_course: &str) -> CourseSuggestions {
    CourseSuggestions {
        current_opportunities: SuggestionSection {
            title: format!("What You Can Do Now With {}", completed_course),
            items: vec![
                format!("Apply {} skills in practical projects", completed_course),
                format!("Build a portfolio showcasing {} expertise", completed_course),
                format!(
                    "Connect with {} professionals and communities",
                    completed_course
                ),
            ],
        },
        next_steps: NextStepSection {
            title: "Recommended Next Steps".to_string(),
            items: vec![
                NextStep {
                    name: format!("Advanced {} Concepts", completed_course),
                    description: format!(
                        "Deepen your {} expertise with advanced techniques",
                        completed_course
                    ),
                    impact: format!("Become a recognized expert in {}", completed_course),
                },
                NextStep {
                    name: "Industry Certifications".to_string(),
                    description: format!(
                        "Obtain relevant certifications in {} domain",
                        completed_course
                    ),
                    impact: "Increase credibility and job market value".to_string(),
                },
            ],
        },
        career_paths: SuggestionSection {
            title: "Career Opportunities".to_string(),
            items: vec![
                format!("{} Specialist", completed_course),
                format!("{} Consultant", completed_course),
                format!("{} Team Lead", completed_course),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct ScriptedGenerator(String);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> anyhow::Result<String> {
            anyhow::bail!("model unavailable")
        }
    }

    fn valid_response() -> String {
        r#"{
            "currentOpportunities": {"title": "Now", "items": ["Freelance"]},
            "nextSteps": {"title": "Next", "items": [
                {"name": "Advanced SQL", "description": "Window functions", "impact": "Senior roles"}
            ]},
            "careerPaths": {"title": "Paths", "items": ["DBA"]}
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_valid_response_parses() {
        let service = SuggestionService::new(ScriptedGenerator(valid_response()));
        let suggestions = service.suggest("Databases", "advanced learning").await.unwrap();

        assert_eq!(suggestions.next_steps.items[0].name, "Advanced SQL");
        assert_eq!(suggestions.career_paths.items, vec!["DBA".to_string()]);
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let service = SuggestionService::new(ScriptedGenerator(
            "Here are some thoughts about your career...".to_string(),
        ));
        let suggestions = service.suggest("Databases", "advanced learning").await.unwrap();

        assert!(suggestions
            .current_opportunities
            .title
            .contains("Databases"));
        assert_eq!(suggestions.next_steps.items.len(), 2);
    }

    #[tokio::test]
    async fn test_model_error_surfaces() {
        let service = SuggestionService::new(FailingGenerator);
        let err = service.suggest("Databases", "").await.unwrap_err();
        assert!(matches!(err, SuggestionError::Model(_)));
    }

    #[test]
    fn test_prompt_names_the_course() {
        let prompt = build_prompt("Machine Learning", "videos");
        assert!(prompt.contains("\"Machine Learning\""));
        assert!(prompt.contains("videos"));
    }
}
