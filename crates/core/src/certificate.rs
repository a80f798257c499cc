//! Completion certificates.

use serde::{Deserialize, Serialize};

use crate::id::{CertificateId, CourseId, UserId};
use crate::Time;

/// Issuer printed on every certificate.
pub const ISSUER: &str = "Pathwise Learning";

/// A completion certificate, created exactly once per (user, course) when
/// the final milestone's quiz is passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    /// Unique identifier
    pub id: CertificateId,

    /// Recipient
    pub user_id: UserId,

    /// Completed course
    pub course_id: CourseId,

    /// Fields rendered onto the exported document
    pub data: CertificateData,

    /// When issued
    pub created_at: Time,
}

/// The printable fields of a certificate. Serialized in camelCase to match
/// the stored `certificate_data` document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    /// Who completed the course
    pub recipient_name: String,

    /// Course name
    pub course_name: String,

    /// Course duration
    pub duration: String,

    /// When the final milestone was passed
    pub completion_date: Time,

    /// Issuing organization
    pub issuer: String,

    /// Printable certificate id
    pub certificate_id: String,
}

impl CertificateData {
    /// Render the downloadable certificate document by filling the static
    /// HTML template.
    pub fn render_html(&self) -> String {
        CERTIFICATE_TEMPLATE
            .replace("{{recipient_name}}", &self.recipient_name)
            .replace("{{course_name}}", &self.course_name)
            .replace("{{duration}}", &self.duration)
            .replace(
                "{{completion_date}}",
                &self.completion_date.format("%B %e, %Y").to_string(),
            )
            .replace("{{issuer}}", &self.issuer)
            .replace("{{certificate_id}}", &self.certificate_id)
    }

    /// Suggested file name for the exported document.
    pub fn file_name(&self) -> String {
        let safe: String = self
            .course_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_Certificate.html", safe)
    }
}

const CERTIFICATE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Certificate - {{course_name}}</title>
    <style>
        body { margin: 0; padding: 40px; font-family: 'Georgia', serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
        .certificate { background: white; max-width: 800px; margin: 0 auto; padding: 60px; box-shadow: 0 0 30px rgba(0,0,0,0.3); border-radius: 10px; }
        .header { text-align: center; border-bottom: 3px solid #667eea; padding-bottom: 30px; margin-bottom: 40px; }
        .title { font-size: 48px; color: #2c3e50; margin: 0; font-weight: bold; }
        .subtitle { font-size: 20px; color: #7f8c8d; margin: 10px 0 0 0; }
        .content { text-align: center; }
        .recipient { font-size: 32px; color: #2980b9; margin: 30px 0; font-weight: bold; }
        .course { font-size: 24px; color: #27ae60; margin: 20px 0; font-style: italic; }
        .details { font-size: 16px; color: #34495e; margin: 30px 0; }
        .footer { margin-top: 50px; text-align: center; border-top: 2px solid #ecf0f1; padding-top: 30px; }
        .cert-id { font-size: 12px; color: #95a5a6; margin-top: 20px; }
    </style>
</head>
<body>
    <div class="certificate">
        <div class="header">
            <h1 class="title">CERTIFICATE</h1>
            <p class="subtitle">of Completion</p>
        </div>
        <div class="content">
            <p>This is to certify that</p>
            <div class="recipient">{{recipient_name}}</div>
            <p>has successfully completed the course</p>
            <div class="course">{{course_name}}</div>
            <div class="details">
                <p>Duration: {{duration}}</p>
                <p>Completion Date: {{completion_date}}</p>
            </div>
        </div>
        <div class="footer">
            <p><strong>{{issuer}}</strong></p>
            <p class="cert-id">Certificate ID: {{certificate_id}}</p>
        </div>
    </div>
</body>
</html>
"#;
