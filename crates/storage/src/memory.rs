//! In-memory storage implementation.
//!
//! Backs the test suites and ephemeral runs. Keeps a snapshot of the last
//! committed state so `rollback` behaves like the file backend.

use std::collections::HashMap;

use pathwise_core::{
    Certificate, Course, CourseId, Milestone, MilestoneId, ProgressRecord, UserId,
};

use super::{Result, Storage, StorageError};

#[derive(Clone, Default)]
struct State {
    courses: HashMap<CourseId, Course>,
    milestones: HashMap<MilestoneId, Milestone>,
    progress: HashMap<(UserId, MilestoneId), ProgressRecord>,
    certificates: HashMap<(UserId, CourseId), Certificate>,
}

/// HashMap-backed storage backend.
#[derive(Default)]
pub struct MemoryStorage {
    state: State,
    // Last committed state; Some while uncommitted writes exist.
    snapshot: Option<State>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn stage(&mut self) {
        if self.snapshot.is_none() {
            self.snapshot = Some(self.state.clone());
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn save_course(&mut self, course: &Course) -> Result<()> {
        self.stage();
        self.state.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        Ok(self.state.courses.get(&id).cloned())
    }

    async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .state
            .courses
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }

    async fn save_milestones(&mut self, milestones: &[Milestone]) -> Result<()> {
        self.stage();
        for milestone in milestones {
            self.state.milestones.insert(milestone.id, milestone.clone());
        }
        Ok(())
    }

    async fn load_milestone(&self, id: MilestoneId) -> Result<Option<Milestone>> {
        Ok(self.state.milestones.get(&id).cloned())
    }

    async fn list_milestones(&self, course_id: CourseId) -> Result<Vec<Milestone>> {
        let mut milestones: Vec<Milestone> = self
            .state
            .milestones
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| m.order_index);
        Ok(milestones)
    }

    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()> {
        self.stage();
        self.state
            .progress
            .insert((record.user_id, record.milestone_id), record.clone());
        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: UserId,
        milestone_id: MilestoneId,
    ) -> Result<Option<ProgressRecord>> {
        Ok(self.state.progress.get(&(user_id, milestone_id)).cloned())
    }

    async fn list_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<ProgressRecord>> {
        Ok(self
            .state
            .progress
            .values()
            .filter(|r| r.user_id == user_id && r.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn save_certificate(&mut self, certificate: &Certificate) -> Result<()> {
        let key = (certificate.user_id, certificate.course_id);
        if self.state.certificates.contains_key(&key) {
            return Err(StorageError::Conflict(format!(
                "certificate already issued for course {}",
                certificate.course_id
            )));
        }
        self.stage();
        self.state.certificates.insert(key, certificate.clone());
        Ok(())
    }

    async fn load_certificate(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Certificate>> {
        Ok(self.state.certificates.get(&(user_id, course_id)).cloned())
    }

    async fn list_certificates(&self, user_id: UserId) -> Result<Vec<Certificate>> {
        Ok(self
            .state
            .certificates
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn commit(&mut self, _message: &str) -> Result<()> {
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        if let Some(snapshot) = self.snapshot.take() {
            self.state = snapshot;
        }
        Ok(())
    }
}
