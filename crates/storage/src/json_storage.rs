//! JSON file storage implementation.
//!
//! Stores data as JSON files in a `.pathwise` directory and keeps small
//! per-object meta markers (version + updated_at). Writes between commits are
//! journaled in memory so `rollback` can restore the last committed state of
//! every touched file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pathwise_core::{
    Certificate, Course, CourseId, Milestone, MilestoneId, ProgressRecord, UserId,
};
use tokio::fs;
use tracing::debug;

use super::{Result, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    // Previous contents of every file touched since the last commit;
    // None marks a file that did not exist.
    journal: HashMap<PathBuf, Option<String>>,
}

impl JsonStorage {
    /// Create storage. This will create the subdirectories needed for data
    /// and meta markers.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        // Ensure primary directories
        fs::create_dir_all(root.join("courses")).await?;
        fs::create_dir_all(root.join("milestones")).await?;
        fs::create_dir_all(root.join("progress")).await?;
        fs::create_dir_all(root.join("certificates")).await?;

        // Directories for meta/versioning (only meta markers are stored)
        fs::create_dir_all(root.join("meta").join("courses")).await?;
        fs::create_dir_all(root.join("meta").join("progress")).await?;

        Ok(Self {
            root,
            journal: HashMap::new(),
        })
    }

    fn course_path(&self, id: CourseId) -> PathBuf {
        self.root.join("courses").join(format!("{}.json", id))
    }
    fn milestone_path(&self, id: MilestoneId) -> PathBuf {
        self.root.join("milestones").join(format!("{}.json", id))
    }
    fn progress_path(&self, user_id: UserId, milestone_id: MilestoneId) -> PathBuf {
        self.root
            .join("progress")
            .join(format!("{}_{}.json", user_id, milestone_id))
    }
    // Keyed by (user, course) so the filesystem itself enforces the
    // one-certificate-per-course constraint.
    fn certificate_path(&self, user_id: UserId, course_id: CourseId) -> PathBuf {
        self.root
            .join("certificates")
            .join(format!("{}_{}.json", user_id, course_id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Journal a file's pre-write contents, then write the new contents.
    async fn write_journaled(&mut self, path: PathBuf, json: String) -> Result<()> {
        if !self.journal.contains_key(&path) {
            let previous = match fs::read_to_string(&path).await {
                Ok(s) => Some(s),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };
            self.journal.insert(path.clone(), previous);
        }
        fs::write(&path, json.as_bytes()).await?;
        Ok(())
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&mut self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        self.write_journaled(path, serde_json::to_string_pretty(&meta)?).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_course(&mut self, course: &Course) -> Result<()> {
        let path = self.course_path(course.id);
        let json = serde_json::to_string_pretty(course)?;
        self.write_journaled(path, json).await?;

        // Versioning (meta only)
        let id_str = format!("{}", course.id);
        let _ver = self.bump_version("courses", &id_str).await?;
        Ok(())
    }

    async fn load_course(&self, id: CourseId) -> Result<Option<Course>> {
        read_json(&self.course_path(id)).await
    }

    async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>> {
        let all: Vec<Course> = list_dir(&self.root.join("courses")).await?;
        let mut courses: Vec<Course> =
            all.into_iter().filter(|c| c.user_id == user_id).collect();
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }

    async fn save_milestones(&mut self, milestones: &[Milestone]) -> Result<()> {
        for milestone in milestones {
            let path = self.milestone_path(milestone.id);
            let json = serde_json::to_string_pretty(milestone)?;
            self.write_journaled(path, json).await?;
        }
        Ok(())
    }

    async fn load_milestone(&self, id: MilestoneId) -> Result<Option<Milestone>> {
        read_json(&self.milestone_path(id)).await
    }

    async fn list_milestones(&self, course_id: CourseId) -> Result<Vec<Milestone>> {
        let all: Vec<Milestone> = list_dir(&self.root.join("milestones")).await?;
        let mut milestones: Vec<Milestone> =
            all.into_iter().filter(|m| m.course_id == course_id).collect();
        milestones.sort_by_key(|m| m.order_index);
        Ok(milestones)
    }

    async fn save_progress(&mut self, record: &ProgressRecord) -> Result<()> {
        let path = self.progress_path(record.user_id, record.milestone_id);
        let json = serde_json::to_string_pretty(record)?;
        self.write_journaled(path, json).await?;

        let id_str = format!("{}_{}", record.user_id, record.milestone_id);
        let _ver = self.bump_version("progress", &id_str).await?;
        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: UserId,
        milestone_id: MilestoneId,
    ) -> Result<Option<ProgressRecord>> {
        read_json(&self.progress_path(user_id, milestone_id)).await
    }

    async fn list_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<ProgressRecord>> {
        let all: Vec<ProgressRecord> = list_dir(&self.root.join("progress")).await?;
        Ok(all
            .into_iter()
            .filter(|r| r.user_id == user_id && r.course_id == course_id)
            .collect())
    }

    async fn save_certificate(&mut self, certificate: &Certificate) -> Result<()> {
        let path = self.certificate_path(certificate.user_id, certificate.course_id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::Conflict(format!(
                "certificate already issued for course {}",
                certificate.course_id
            )));
        }
        let json = serde_json::to_string_pretty(certificate)?;
        self.write_journaled(path, json).await?;
        Ok(())
    }

    async fn load_certificate(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Certificate>> {
        read_json(&self.certificate_path(user_id, course_id)).await
    }

    async fn list_certificates(&self, user_id: UserId) -> Result<Vec<Certificate>> {
        let all: Vec<Certificate> = list_dir(&self.root.join("certificates")).await?;
        Ok(all.into_iter().filter(|c| c.user_id == user_id).collect())
    }

    async fn commit(&mut self, message: &str) -> Result<()> {
        debug!(files = self.journal.len(), "commit: {}", message);
        self.journal.clear();
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        let journal = std::mem::take(&mut self.journal);
        for (path, previous) in journal {
            match previous {
                Some(contents) => fs::write(&path, contents.as_bytes()).await?,
                None => fs::remove_file(&path).await.or_else(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Ok(())
                    } else {
                        Err(e)
                    }
                })?,
            }
        }
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if let Ok(Some(item)) = read_json(&entry.path()).await {
            items.push(item);
        }
    }
    Ok(items)
}
