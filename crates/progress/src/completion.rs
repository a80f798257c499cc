//! Course completion and certificate issuance.

use chrono::Utc;
use pathwise_core::{
    Certificate, CertificateData, CertificateId, Course, CourseStatus, UserContext, ISSUER,
};
use pathwise_storage::{Storage, StorageError};
use tracing::info;

/// Mark a course completed and issue its certificate.
///
/// Idempotent: if a certificate already exists for (user, course) it is
/// returned unchanged and nothing is written. Callers are expected to hold
/// the storage lock for the whole transition this is part of.
pub async fn complete_course<S: Storage>(
    storage: &mut S,
    ctx: &UserContext,
    course: &Course,
) -> Result<Certificate, StorageError> {
    if let Some(existing) = storage.load_certificate(ctx.user_id, course.id).await? {
        return Ok(existing);
    }

    let now = Utc::now();

    let mut completed = course.clone();
    completed.status = CourseStatus::Completed;
    completed.updated_at = now;
    storage.save_course(&completed).await?;

    let id = CertificateId::new();
    let certificate = Certificate {
        id,
        user_id: ctx.user_id,
        course_id: course.id,
        data: CertificateData {
            recipient_name: ctx.recipient_name(),
            course_name: course.name.clone(),
            duration: course.duration.clone(),
            completion_date: now,
            issuer: ISSUER.to_string(),
            certificate_id: id.to_string(),
        },
        created_at: now,
    };
    storage.save_certificate(&certificate).await?;

    info!(course = %course.id, certificate = %certificate.id, "course completed");
    Ok(certificate)
}
