//! Roadmap generation service.
//!
//! One call: prompt the model, recover and validate the document (or fall
//! back to the synthetic roadmap), then persist the course, its milestones
//! and the initial progress records as a single committed unit.

use std::sync::Arc;

use chrono::Utc;
use pathwise_core::{
    Course, CourseId, CourseStatus, LearnerProfile, Milestone, MilestoneId, MilestoneStatus,
    ProgressRecord, Roadmap, RoadmapSource, UserContext,
};
use pathwise_genai::{GenerationConfig, TextGenerator};
use pathwise_storage::{Storage, StorageError};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::fallback::synthetic_roadmap;
use crate::parser::parse_roadmap;
use crate::prompt::{build_prompt, milestone_count};
use crate::validate::validate_roadmap;

/// Errors surfaced by roadmap generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The external model call failed; nothing was persisted.
    #[error("roadmap generation failed: {0}")]
    Model(#[source] anyhow::Error),

    /// The store rejected a write; the bundle was rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A freshly created course with its milestones, mirroring the
/// generate-roadmap response shape.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCourse {
    /// The created course
    pub course: Course,
    /// Its milestones in order
    pub milestones: Vec<Milestone>,
}

/// Roadmap generation service.
pub struct RoadmapService<S: Storage, G: TextGenerator> {
    storage: Arc<Mutex<S>>,
    generator: G,
}

impl<S: Storage, G: TextGenerator> RoadmapService<S, G> {
    /// Create a new service.
    pub fn new(storage: Arc<Mutex<S>>, generator: G) -> Self {
        Self { storage, generator }
    }

    /// Generate and persist a course for a learner profile.
    pub async fn generate(
        &self,
        ctx: &UserContext,
        profile: &LearnerProfile,
    ) -> Result<GeneratedCourse, GenerationError> {
        let count = milestone_count(&profile.duration);
        let prompt = build_prompt(profile, count);
        let config = GenerationConfig {
            temperature: 0.7,
            max_output_tokens: 2000,
            ..Default::default()
        };

        let content = self
            .generator
            .generate(&prompt, &config)
            .await
            .map_err(GenerationError::Model)?;

        let (roadmap, source) = recover_roadmap(&content, profile, count);
        if source == RoadmapSource::Synthetic {
            warn!(topic = %profile.topic, "serving synthetic roadmap");
        }

        self.persist(ctx, source, roadmap).await
    }

    /// Write the course + milestones + progress bundle as one unit.
    async fn persist(
        &self,
        ctx: &UserContext,
        source: RoadmapSource,
        roadmap: Roadmap,
    ) -> Result<GeneratedCourse, GenerationError> {
        let now = Utc::now();
        let course = Course {
            id: CourseId::new(),
            user_id: ctx.user_id,
            name: roadmap.course_name.clone(),
            duration: roadmap.duration.clone(),
            status: CourseStatus::Active,
            roadmap: roadmap.clone(),
            source,
            created_at: now,
            updated_at: now,
        };

        let milestones: Vec<Milestone> = roadmap
            .milestones
            .iter()
            .map(|m| Milestone {
                id: MilestoneId::new(),
                course_id: course.id,
                title: m.title.clone(),
                order_index: m.order,
                resources: m.resources.clone(),
                quiz: m.quiz.clone(),
                created_at: now,
            })
            .collect();

        // First milestone starts active, the rest locked.
        let records: Vec<ProgressRecord> = milestones
            .iter()
            .enumerate()
            .map(|(index, milestone)| {
                let status = if index == 0 {
                    MilestoneStatus::Active
                } else {
                    MilestoneStatus::Locked
                };
                ProgressRecord::initial(ctx.user_id, course.id, milestone.id, status, now)
            })
            .collect();

        let mut storage = self.storage.lock().await;
        let written = write_bundle(&mut *storage, &course, &milestones, &records).await;
        match written {
            Ok(()) => {
                storage.commit("create course").await?;
                info!(course = %course.id, milestones = milestones.len(), "course created");
                Ok(GeneratedCourse { course, milestones })
            }
            Err(e) => {
                // Leave nothing of a half-written course behind.
                let _ = storage.rollback().await;
                Err(e.into())
            }
        }
    }
}

/// Recover a roadmap document from model output, degrading to the synthetic
/// fallback on any parse or validation failure.
fn recover_roadmap(
    content: &str,
    profile: &LearnerProfile,
    count: usize,
) -> (Roadmap, RoadmapSource) {
    let validated = match parse_roadmap(content) {
        Ok(raw) => validate_roadmap(raw, &profile.duration).map_err(|e| {
            warn!("roadmap failed validation: {}", e);
        }),
        Err(e) => {
            warn!("roadmap recovery failed: {}", e);
            Err(())
        }
    };

    match validated {
        Ok(roadmap) => (roadmap, RoadmapSource::Model),
        Err(()) => (
            synthetic_roadmap(&profile.topic, &profile.duration, count),
            RoadmapSource::Synthetic,
        ),
    }
}

async fn write_bundle<S: Storage>(
    storage: &mut S,
    course: &Course,
    milestones: &[Milestone],
    records: &[ProgressRecord],
) -> Result<(), StorageError> {
    storage.save_course(course).await?;
    storage.save_milestones(milestones).await?;
    for record in records {
        storage.save_progress(record).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pathwise_core::{Goal, Preference, SkillLevel, UserId};
    use pathwise_storage::MemoryStorage;

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

    fn make_profile(duration: &str) -> LearnerProfile {
        LearnerProfile {
            topic: "Rust".to_string(),
            duration: duration.to_string(),
            skill_level: SkillLevel::Beginner,
            preference: Preference::Notes,
            goal: Goal::Project,
        }
    }

    fn model_document() -> String {
        r#"{
            "courseName": "Rust from Scratch",
            "duration": "1 week",
            "milestones": [
                {"title": "Syntax", "order": 1,
                 "resources": {"website": "https://doc.rust-lang.org"},
                 "quiz": [{"question": "q1", "options": ["a", "b"], "correct": 0}]},
                {"title": "Ownership", "order": 2,
                 "resources": {},
                 "quiz": [{"question": "q2", "options": ["a", "b"], "correct": 1}]},
                {"title": "Traits", "order": 3,
                 "resources": {},
                 "quiz": [{"question": "q3", "options": ["a", "b"], "correct": 0}]}
            ]
        }"#
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_persists_bundle_with_initial_states() {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let service =
            RoadmapService::new(storage.clone(), ScriptedGenerator(model_document()));
        let ctx = UserContext::new(UserId::new());

        let generated = service.generate(&ctx, &make_profile("1 week")).await.unwrap();

        assert_eq!(generated.course.name, "Rust from Scratch");
        assert_eq!(generated.course.source, RoadmapSource::Model);
        assert_eq!(generated.milestones.len(), 3);

        let storage = storage.lock().await;
        let records = storage
            .list_progress(ctx.user_id, generated.course.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let active: Vec<_> = records
            .iter()
            .filter(|r| r.status == MilestoneStatus::Active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].milestone_id, generated.milestones[0].id);
    }

    #[tokio::test]
    async fn test_fenced_model_output_still_parses() {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let fenced = format!("```json\n{}\n```", model_document());
        let service = RoadmapService::new(storage, ScriptedGenerator(fenced));
        let ctx = UserContext::new(UserId::new());

        let generated = service.generate(&ctx, &make_profile("1 week")).await.unwrap();
        assert_eq!(generated.course.source, RoadmapSource::Model);
    }

    #[tokio::test]
    async fn test_unusable_output_falls_back_to_synthetic() {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let service = RoadmapService::new(
            storage.clone(),
            ScriptedGenerator("Sorry, I can't help with that.".to_string()),
        );
        let ctx = UserContext::new(UserId::new());

        let generated = service.generate(&ctx, &make_profile("2 weeks")).await.unwrap();

        assert_eq!(generated.course.source, RoadmapSource::Synthetic);
        assert_eq!(generated.course.name, "Rust Learning Path");
        // "2 weeks" maps to 4 milestones.
        assert_eq!(generated.milestones.len(), 4);
    }

    #[tokio::test]
    async fn test_model_error_persists_nothing() {
        let storage = Arc::new(Mutex::new(MemoryStorage::new()));
        let service = RoadmapService::new(storage.clone(), FailingGenerator);
        let ctx = UserContext::new(UserId::new());

        let err = service.generate(&ctx, &make_profile("1 week")).await.unwrap_err();
        assert!(matches!(err, GenerationError::Model(_)));

        let storage = storage.lock().await;
        assert!(storage.list_courses(ctx.user_id).await.unwrap().is_empty());
    }
}
