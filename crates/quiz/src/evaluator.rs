//! Quiz submission evaluation and the unlock cascade.

use std::sync::Arc;

use chrono::Utc;
use pathwise_core::{
    CourseId, CourseStatus, MilestoneId, MilestoneStatus, QuizQuestion, UserContext,
};
use pathwise_progress::{complete_course, engine::load_owned_course, ProgressionError};
use pathwise_storage::{Storage, StorageError};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

/// Sentinel for an unanswered question slot.
pub const UNSET_ANSWER: i32 = -1;

/// Errors from quiz submission.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Course or milestone absent, or not owned by the caller
    #[error("not found: {0}")]
    NotFound(String),

    /// The milestone has not been unlocked yet
    #[error("milestone is locked: complete the previous milestone to unlock it")]
    Locked,

    /// The answer list does not match the quiz
    #[error("quiz has {expected} questions but {got} answers were submitted")]
    LengthMismatch {
        /// Question count
        expected: usize,
        /// Submitted answer count
        got: usize,
    },

    /// At least one answer slot is unset
    #[error("incomplete submission: answer all questions before submitting")]
    IncompleteSubmission,

    /// Store failure; any partial transition was rolled back
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ProgressionError> for QuizError {
    fn from(e: ProgressionError) -> Self {
        match e {
            ProgressionError::NotFound(what) => QuizError::NotFound(what),
            ProgressionError::Locked => QuizError::Locked,
            ProgressionError::Storage(e) => QuizError::Storage(e),
        }
    }
}

/// Result of a scored submission, mirroring the submit-quiz response shape.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    /// Whether every answer was correct
    pub passed: bool,

    /// Display score, 0-100
    pub score: u8,

    /// Whether this submission completed the whole course
    pub course_completed: bool,
}

/// Score an answer list against a quiz. Returns (correct count, display
/// score). Callers validate shape first; out-of-range selections simply
/// score as wrong.
pub fn score_submission(quiz: &[QuizQuestion], answers: &[i32]) -> (usize, u8) {
    let correct = quiz
        .iter()
        .zip(answers)
        .filter(|(question, &answer)| answer >= 0 && answer as usize == question.correct)
        .count();
    let score = if quiz.is_empty() {
        0
    } else {
        ((correct as f64 / quiz.len() as f64) * 100.0).round() as u8
    };
    (correct, score)
}

/// Quiz evaluator. Holds the storage lock across the whole
/// read-score-mutate sequence so readers never observe a half-applied
/// cascade.
pub struct QuizEvaluator<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> QuizEvaluator<S> {
    /// Create a new evaluator.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Evaluate a submission for a milestone.
    ///
    /// Pass requires 100%: any wrong answer fails the attempt and leaves
    /// every record untouched; the user may resubmit without penalty.
    pub async fn submit(
        &self,
        ctx: &UserContext,
        course_id: CourseId,
        milestone_id: MilestoneId,
        answers: &[i32],
    ) -> Result<QuizOutcome, QuizError> {
        let mut storage = self.storage.lock().await;

        let course = load_owned_course(&*storage, ctx, course_id).await?;
        let milestone = storage
            .load_milestone(milestone_id)
            .await?
            .filter(|m| m.course_id == course_id)
            .ok_or_else(|| QuizError::NotFound(format!("milestone {}", milestone_id)))?;

        if answers.len() != milestone.quiz.len() {
            return Err(QuizError::LengthMismatch {
                expected: milestone.quiz.len(),
                got: answers.len(),
            });
        }
        if answers.iter().any(|&a| a <= UNSET_ANSWER) {
            return Err(QuizError::IncompleteSubmission);
        }

        let record = storage
            .load_progress(ctx.user_id, milestone_id)
            .await?
            .ok_or_else(|| QuizError::NotFound(format!("progress for {}", milestone_id)))?;
        if record.status == MilestoneStatus::Locked {
            return Err(QuizError::Locked);
        }

        let (correct, score) = score_submission(&milestone.quiz, answers);
        let passed = correct == milestone.quiz.len();

        if !passed {
            // Failed attempts mutate nothing; retries are unlimited.
            return Ok(QuizOutcome {
                passed: false,
                score,
                course_completed: false,
            });
        }

        if record.status == MilestoneStatus::Completed {
            // Review resubmission (or a retried final submission): already
            // counted, nothing to mutate, no second certificate.
            return Ok(QuizOutcome {
                passed: true,
                score,
                course_completed: course.status == CourseStatus::Completed,
            });
        }

        let cascade = apply_pass(
            &mut *storage,
            ctx,
            &course,
            milestone.id,
            milestone.order_index,
            score,
        )
        .await;

        match cascade {
            Ok(course_completed) => {
                storage.commit("quiz passed").await?;
                info!(
                    milestone = %milestone_id,
                    course_completed,
                    "milestone completed"
                );
                Ok(QuizOutcome {
                    passed: true,
                    score,
                    course_completed,
                })
            }
            Err(e) => {
                let _ = storage.rollback().await;
                Err(e.into())
            }
        }
    }
}

/// Complete the milestone, activate the successor, and complete the course
/// when the final milestone falls. Returns whether the course completed.
async fn apply_pass<S: Storage>(
    storage: &mut S,
    ctx: &UserContext,
    course: &pathwise_core::Course,
    milestone_id: MilestoneId,
    order_index: u32,
    score: u8,
) -> Result<bool, StorageError> {
    let now = Utc::now();

    let mut record = storage
        .load_progress(ctx.user_id, milestone_id)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("progress for {}", milestone_id)))?;
    record.status = MilestoneStatus::Completed;
    record.quiz_score = Some(score);
    record.updated_at = now;
    storage.save_progress(&record).await?;

    let milestones = storage.list_milestones(course.id).await?;
    let next = milestones.iter().find(|m| m.order_index == order_index + 1);

    match next {
        Some(next_milestone) => {
            let mut next_record = storage
                .load_progress(ctx.user_id, next_milestone.id)
                .await?
                .ok_or_else(|| {
                    StorageError::NotFound(format!("progress for {}", next_milestone.id))
                })?;
            next_record.status = MilestoneStatus::Active;
            next_record.updated_at = now;
            storage.save_progress(&next_record).await?;
            Ok(false)
        }
        None => {
            complete_course(storage, ctx, course).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_core::{
        Course, Milestone, MilestoneResources, ProgressRecord, Roadmap, RoadmapSource, UserId,
    };
    use pathwise_progress::check_frontier_invariant;
    use pathwise_storage::MemoryStorage;

    fn three_question_quiz() -> Vec<QuizQuestion> {
        // Correct key: [0, 1, 2]
        (0..3)
            .map(|correct| QuizQuestion {
                question: format!("Question {}", correct + 1),
                options: vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                ],
                correct,
            })
            .collect()
    }

    async fn seeded(
        milestone_count: u32,
    ) -> (
        QuizEvaluator<MemoryStorage>,
        Arc<Mutex<MemoryStorage>>,
        UserContext,
        Course,
        Vec<Milestone>,
    ) {
        let now = Utc::now();
        let ctx = UserContext::new(UserId::new()).with_name("Learner");
        let course = Course {
            id: CourseId::new(),
            user_id: ctx.user_id,
            name: "Algorithms".to_string(),
            duration: "1 week".to_string(),
            status: CourseStatus::Active,
            roadmap: Roadmap {
                course_name: "Algorithms".to_string(),
                duration: "1 week".to_string(),
                milestones: Vec::new(),
            },
            source: RoadmapSource::Model,
            created_at: now,
            updated_at: now,
        };

        let milestones: Vec<Milestone> = (1..=milestone_count)
            .map(|order_index| Milestone {
                id: MilestoneId::new(),
                course_id: course.id,
                title: format!("Milestone {}", order_index),
                order_index,
                resources: MilestoneResources::default(),
                quiz: three_question_quiz(),
                created_at: now,
            })
            .collect();

        let mut storage = MemoryStorage::new();
        storage.save_course(&course).await.unwrap();
        storage.save_milestones(&milestones).await.unwrap();
        for (index, milestone) in milestones.iter().enumerate() {
            let status = if index == 0 {
                MilestoneStatus::Active
            } else {
                MilestoneStatus::Locked
            };
            storage
                .save_progress(&ProgressRecord::initial(
                    ctx.user_id,
                    course.id,
                    milestone.id,
                    status,
                    now,
                ))
                .await
                .unwrap();
        }
        storage.commit("seed").await.unwrap();

        let storage = Arc::new(Mutex::new(storage));
        let evaluator = QuizEvaluator::new(storage.clone());
        (evaluator, storage, ctx, course, milestones)
    }

    async fn assert_invariant(
        storage: &Arc<Mutex<MemoryStorage>>,
        ctx: &UserContext,
        course_id: CourseId,
    ) {
        let storage = storage.lock().await;
        let milestones = storage.list_milestones(course_id).await.unwrap();
        let records = storage.list_progress(ctx.user_id, course_id).await.unwrap();
        check_frontier_invariant(&milestones, &records).unwrap();
    }

    #[tokio::test]
    async fn test_wrong_answer_fails_without_mutation() {
        let (evaluator, storage, ctx, course, milestones) = seeded(3).await;

        let outcome = evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1, 1])
            .await
            .unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.score, 67);
        assert!(!outcome.course_completed);

        let guard = storage.lock().await;
        let record = guard
            .load_progress(ctx.user_id, milestones[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, MilestoneStatus::Active);
        assert_eq!(record.quiz_score, None);
        drop(guard);
        assert_invariant(&storage, &ctx, course.id).await;
    }

    #[tokio::test]
    async fn test_unset_slot_is_incomplete_submission() {
        let (evaluator, storage, ctx, course, milestones) = seeded(3).await;

        let err = evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, -1, 2])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::IncompleteSubmission));

        let guard = storage.lock().await;
        let record = guard
            .load_progress(ctx.user_id, milestones[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, MilestoneStatus::Active);
    }

    #[tokio::test]
    async fn test_length_mismatch_rejected() {
        let (evaluator, _storage, ctx, course, milestones) = seeded(3).await;

        let err = evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::LengthMismatch { expected: 3, got: 2 }
        ));
    }

    #[tokio::test]
    async fn test_locked_milestone_rejected() {
        let (evaluator, _storage, ctx, course, milestones) = seeded(3).await;

        let err = evaluator
            .submit(&ctx, course.id, milestones[1].id, &[0, 1, 2])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Locked));
    }

    #[tokio::test]
    async fn test_pass_unlocks_next_milestone() {
        let (evaluator, storage, ctx, course, milestones) = seeded(3).await;

        let outcome = evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1, 2])
            .await
            .unwrap();

        assert!(outcome.passed);
        assert_eq!(outcome.score, 100);
        assert!(!outcome.course_completed);

        let guard = storage.lock().await;
        let first = guard
            .load_progress(ctx.user_id, milestones[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, MilestoneStatus::Completed);
        assert_eq!(first.quiz_score, Some(100));

        let second = guard
            .load_progress(ctx.user_id, milestones[1].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.status, MilestoneStatus::Active);

        let third = guard
            .load_progress(ctx.user_id, milestones[2].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(third.status, MilestoneStatus::Locked);
        drop(guard);
        assert_invariant(&storage, &ctx, course.id).await;
    }

    #[tokio::test]
    async fn test_final_pass_completes_course_exactly_once() {
        let (evaluator, storage, ctx, course, milestones) = seeded(2).await;

        evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1, 2])
            .await
            .unwrap();
        let outcome = evaluator
            .submit(&ctx, course.id, milestones[1].id, &[0, 1, 2])
            .await
            .unwrap();

        assert!(outcome.passed);
        assert!(outcome.course_completed);

        // Idempotent retry of the final submission.
        let retried = evaluator
            .submit(&ctx, course.id, milestones[1].id, &[0, 1, 2])
            .await
            .unwrap();
        assert!(retried.passed);
        assert!(retried.course_completed);

        let guard = storage.lock().await;
        let stored = guard.load_course(course.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CourseStatus::Completed);

        let certificates = guard.list_certificates(ctx.user_id).await.unwrap();
        assert_eq!(certificates.len(), 1);
        drop(guard);
        assert_invariant(&storage, &ctx, course.id).await;
    }

    #[tokio::test]
    async fn test_completed_milestone_resubmission_mutates_nothing() {
        let (evaluator, storage, ctx, course, milestones) = seeded(3).await;

        evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1, 2])
            .await
            .unwrap();

        let review = evaluator
            .submit(&ctx, course.id, milestones[0].id, &[0, 1, 2])
            .await
            .unwrap();
        assert!(review.passed);
        assert!(!review.course_completed);

        let guard = storage.lock().await;
        let second = guard
            .load_progress(ctx.user_id, milestones[1].id)
            .await
            .unwrap()
            .unwrap();
        // Still exactly one frontier; the cascade did not run twice.
        assert_eq!(second.status, MilestoneStatus::Active);
        drop(guard);
        assert_invariant(&storage, &ctx, course.id).await;
    }
}
