//! Milestone progression state.
//!
//! The state machine itself is a set of pure functions over the ordered
//! milestone list and the user's progress records; [`ProgressionEngine`]
//! wraps them with storage access and ownership checks.

use std::sync::Arc;

use pathwise_core::{
    Course, CourseId, CourseProgress, Milestone, MilestoneId, MilestoneStatus, ProgressRecord,
    UserContext,
};
use pathwise_storage::{Storage, StorageError};
use tokio::sync::Mutex;

/// Errors from progression queries.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// Course or milestone absent, or not owned by the caller
    #[error("not found: {0}")]
    NotFound(String),

    /// Interaction attempted on a locked milestone
    #[error("milestone is locked: complete the previous milestone to unlock it")]
    Locked,

    /// Store failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The frontier invariant does not hold.
#[derive(Debug, thiserror::Error)]
#[error("progress invariant violated: {reason}")]
pub struct InvariantViolation {
    /// What was observed
    pub reason: String,
}

/// Status of one milestone for the records at hand. A milestone with no
/// record reads as locked.
pub fn status_of(milestone_id: MilestoneId, records: &[ProgressRecord]) -> MilestoneStatus {
    records
        .iter()
        .find(|r| r.milestone_id == milestone_id)
        .map(|r| r.status)
        .unwrap_or(MilestoneStatus::Locked)
}

/// Aggregate completion across a course's milestones.
pub fn course_progress(milestones: &[Milestone], records: &[ProgressRecord]) -> CourseProgress {
    let completed = milestones
        .iter()
        .filter(|m| status_of(m.id, records) == MilestoneStatus::Completed)
        .count();
    CourseProgress {
        completed,
        total: milestones.len(),
    }
}

/// Check the frontier invariant: statuses in `order_index` order must read
/// as zero or more `completed`, at most one `active`, then only `locked`.
///
/// `milestones` must already be sorted ascending by `order_index` (the
/// storage contract for milestone reads).
pub fn check_frontier_invariant(
    milestones: &[Milestone],
    records: &[ProgressRecord],
) -> Result<(), InvariantViolation> {
    let mut seen_active = false;
    let mut seen_non_completed = false;

    for milestone in milestones {
        let status = status_of(milestone.id, records);
        match status {
            MilestoneStatus::Completed => {
                if seen_non_completed {
                    return Err(InvariantViolation {
                        reason: format!(
                            "milestone {} is completed after an open milestone",
                            milestone.order_index
                        ),
                    });
                }
            }
            MilestoneStatus::Active => {
                if seen_active {
                    return Err(InvariantViolation {
                        reason: "two active milestones".to_string(),
                    });
                }
                seen_active = true;
                seen_non_completed = true;
            }
            MilestoneStatus::Locked => {
                seen_non_completed = true;
            }
        }
    }

    Ok(())
}

/// A milestone together with the caller's status for it.
#[derive(Debug, Clone)]
pub struct MilestoneView {
    /// The milestone
    pub milestone: Milestone,
    /// The caller's status
    pub status: MilestoneStatus,
}

/// A course as the caller sees it: milestones with statuses plus aggregate
/// completion.
#[derive(Debug, Clone)]
pub struct CourseView {
    /// The course
    pub course: Course,
    /// Milestones in `order_index` order with per-milestone status
    pub milestones: Vec<MilestoneView>,
    /// Aggregate completion
    pub progress: CourseProgress,
}

/// Read-side progression engine.
pub struct ProgressionEngine<S: Storage> {
    storage: Arc<Mutex<S>>,
}

impl<S: Storage> ProgressionEngine<S> {
    /// Create a new engine.
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    /// Load a course the caller owns, with per-milestone statuses and
    /// completion percentage.
    pub async fn course_view(
        &self,
        ctx: &UserContext,
        course_id: CourseId,
    ) -> Result<CourseView, ProgressionError> {
        let storage = self.storage.lock().await;
        let course = load_owned_course(&*storage, ctx, course_id).await?;

        let milestones = storage.list_milestones(course_id).await?;
        let records = storage.list_progress(ctx.user_id, course_id).await?;

        let progress = course_progress(&milestones, &records);
        let views = milestones
            .into_iter()
            .map(|milestone| {
                let status = status_of(milestone.id, &records);
                MilestoneView { milestone, status }
            })
            .collect();

        Ok(CourseView {
            course,
            milestones: views,
            progress,
        })
    }

    /// Open a milestone for studying or review. Locked milestones are
    /// rejected without any state change.
    pub async fn open_milestone(
        &self,
        ctx: &UserContext,
        course_id: CourseId,
        milestone_id: MilestoneId,
    ) -> Result<MilestoneView, ProgressionError> {
        let storage = self.storage.lock().await;
        let _course = load_owned_course(&*storage, ctx, course_id).await?;

        let milestone = storage
            .load_milestone(milestone_id)
            .await?
            .filter(|m| m.course_id == course_id)
            .ok_or_else(|| ProgressionError::NotFound(format!("milestone {}", milestone_id)))?;

        let status = storage
            .load_progress(ctx.user_id, milestone_id)
            .await?
            .map(|r| r.status)
            .unwrap_or(MilestoneStatus::Locked);

        if status == MilestoneStatus::Locked {
            return Err(ProgressionError::Locked);
        }

        Ok(MilestoneView { milestone, status })
    }
}

/// Load a course and enforce ownership; a course owned by someone else is
/// reported as absent.
pub async fn load_owned_course<S: Storage>(
    storage: &S,
    ctx: &UserContext,
    course_id: CourseId,
) -> Result<Course, ProgressionError> {
    storage
        .load_course(course_id)
        .await?
        .filter(|c| c.user_id == ctx.user_id)
        .ok_or_else(|| ProgressionError::NotFound(format!("course {}", course_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pathwise_core::{
        CourseStatus, MilestoneResources, Roadmap, RoadmapSource, UserId,
    };
    use pathwise_storage::MemoryStorage;

    fn make_course(user_id: UserId) -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            user_id,
            name: "Networking 101".to_string(),
            duration: "1 week".to_string(),
            status: CourseStatus::Active,
            roadmap: Roadmap {
                course_name: "Networking 101".to_string(),
                duration: "1 week".to_string(),
                milestones: Vec::new(),
            },
            source: RoadmapSource::Model,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_milestones(course_id: CourseId, count: u32) -> Vec<Milestone> {
        (1..=count)
            .map(|order_index| Milestone {
                id: MilestoneId::new(),
                course_id,
                title: format!("Milestone {}", order_index),
                order_index,
                resources: MilestoneResources::default(),
                quiz: Vec::new(),
                created_at: Utc::now(),
            })
            .collect()
    }

    fn make_records(
        user_id: UserId,
        course_id: CourseId,
        milestones: &[Milestone],
        statuses: &[MilestoneStatus],
    ) -> Vec<ProgressRecord> {
        milestones
            .iter()
            .zip(statuses)
            .map(|(m, &status)| {
                ProgressRecord::initial(user_id, course_id, m.id, status, Utc::now())
            })
            .collect()
    }

    async fn seeded_engine(
        statuses: &[MilestoneStatus],
    ) -> (ProgressionEngine<MemoryStorage>, UserContext, Course, Vec<Milestone>) {
        let user_id = UserId::new();
        let course = make_course(user_id);
        let milestones = make_milestones(course.id, statuses.len() as u32);
        let records = make_records(user_id, course.id, &milestones, statuses);

        let mut storage = MemoryStorage::new();
        storage.save_course(&course).await.unwrap();
        storage.save_milestones(&milestones).await.unwrap();
        for record in &records {
            storage.save_progress(record).await.unwrap();
        }
        storage.commit("seed").await.unwrap();

        let engine = ProgressionEngine::new(Arc::new(Mutex::new(storage)));
        (engine, UserContext::new(user_id), course, milestones)
    }

    #[test]
    fn test_missing_record_reads_locked() {
        let milestones = make_milestones(CourseId::new(), 1);
        assert_eq!(status_of(milestones[0].id, &[]), MilestoneStatus::Locked);
    }

    #[test]
    fn test_invariant_accepts_frontier_shapes() {
        use MilestoneStatus::{Active, Completed, Locked};

        let course_id = CourseId::new();
        let user_id = UserId::new();
        let milestones = make_milestones(course_id, 3);

        for statuses in [
            [Active, Locked, Locked],
            [Completed, Active, Locked],
            [Completed, Completed, Completed],
        ] {
            let records = make_records(user_id, course_id, &milestones, &statuses);
            assert!(check_frontier_invariant(&milestones, &records).is_ok());
        }
    }

    #[test]
    fn test_invariant_rejects_two_active() {
        use MilestoneStatus::{Active, Locked};

        let course_id = CourseId::new();
        let user_id = UserId::new();
        let milestones = make_milestones(course_id, 3);
        let records =
            make_records(user_id, course_id, &milestones, &[Active, Active, Locked]);

        assert!(check_frontier_invariant(&milestones, &records).is_err());
    }

    #[test]
    fn test_invariant_rejects_completed_after_gap() {
        use MilestoneStatus::{Completed, Locked};

        let course_id = CourseId::new();
        let user_id = UserId::new();
        let milestones = make_milestones(course_id, 3);
        let records =
            make_records(user_id, course_id, &milestones, &[Locked, Completed, Locked]);

        assert!(check_frontier_invariant(&milestones, &records).is_err());
    }

    #[tokio::test]
    async fn test_course_view_reports_percentage() {
        use MilestoneStatus::{Active, Completed, Locked};

        let (engine, ctx, course, _milestones) =
            seeded_engine(&[Completed, Completed, Active, Locked, Locked]).await;

        let view = engine.course_view(&ctx, course.id).await.unwrap();
        assert_eq!(view.progress.percentage(), 40);
        assert_eq!(view.milestones[0].status, Completed);
        assert_eq!(view.milestones[2].status, Active);
    }

    #[tokio::test]
    async fn test_open_locked_milestone_rejected() {
        use MilestoneStatus::{Active, Locked};

        let (engine, ctx, course, milestones) = seeded_engine(&[Active, Locked]).await;

        let err = engine
            .open_milestone(&ctx, course.id, milestones[1].id)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressionError::Locked));
    }

    #[tokio::test]
    async fn test_open_completed_milestone_allows_review() {
        use MilestoneStatus::{Active, Completed};

        let (engine, ctx, course, milestones) = seeded_engine(&[Completed, Active]).await;

        let view = engine
            .open_milestone(&ctx, course.id, milestones[0].id)
            .await
            .unwrap();
        assert_eq!(view.status, Completed);
    }

    #[tokio::test]
    async fn test_foreign_course_reads_as_not_found() {
        let (engine, _ctx, course, _milestones) =
            seeded_engine(&[MilestoneStatus::Active]).await;

        let stranger = UserContext::new(UserId::new());
        let err = engine.course_view(&stranger, course.id).await.unwrap_err();
        assert!(matches!(err, ProgressionError::NotFound(_)));
    }
}
