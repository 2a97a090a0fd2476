use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Settings for [`super::Annotator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Author written on every generated comment.
    pub author: String,

    pub initials: String,

    /// `w:date` of generated comments. Fixed by default so repeated runs
    /// produce identical packages.
    pub timestamp: DateTime<Utc>,

    /// Appended to the file stem when no explicit destination is given.
    pub output_suffix: String,

    /// Compare every passed-through part against the source by SHA-256
    /// after rewriting.
    pub verify_passthrough: bool,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            author: "Styleguard".to_string(),
            initials: "SG".to_string(),
            timestamp: DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
            output_suffix: "_annotated".to_string(),
            verify_passthrough: true,
        }
    }
}

impl AnnotationSettings {
    /// `2024-01-01T00:00:00Z`
    pub fn comment_date(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
