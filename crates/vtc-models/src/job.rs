//! Job definitions for transcode processing.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a transcode job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transcode job status.
///
/// Once a job reaches `Transcoding` its status only moves forward to
/// `Complete` or `Error`, never backward; the supervisor enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting for a supervisor to pick it up
    #[default]
    Queued,
    /// Job is actively being transcoded
    Transcoding,
    /// Job completed successfully
    Complete,
    /// Job failed with an error
    Error,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Transcoding => "transcoding",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target output resolution for a transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetScale {
    /// 1080p output (default)
    #[default]
    P1080,
    /// 720p output
    P720,
    /// 480p output
    P480,
}

impl TargetScale {
    /// Vertical size token used in the scale filter.
    pub fn size_token(&self) -> &'static str {
        match self {
            TargetScale::P1080 => "1080",
            TargetScale::P720 => "720",
            TargetScale::P480 => "480",
        }
    }

    /// Parse a user-supplied scale label such as `720p`.
    ///
    /// Unrecognized or absent labels fall back to 1080p rather than erroring;
    /// the scale is a preference, not a contract.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "720p" => TargetScale::P720,
            "480p" => TargetScale::P480,
            _ => TargetScale::P1080,
        }
    }
}

impl fmt::Display for TargetScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.size_token())
    }
}

/// A request to transcode one source video.
///
/// Immutable for the life of a single supervisor run; consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeRequest {
    /// Source media URL or path handed to the transcode engine
    pub source_url: String,
    /// Job this transcode belongs to
    pub job_id: JobId,
    /// Target output resolution
    #[serde(default)]
    pub scale: TargetScale,
}

impl TranscodeRequest {
    /// Create a new request with the default 1080p scale.
    pub fn new(source_url: impl Into<String>, job_id: JobId) -> Self {
        Self {
            source_url: source_url.into(),
            job_id,
            scale: TargetScale::default(),
        }
    }

    /// Set the target scale.
    pub fn with_scale(mut self, scale: TargetScale) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_roundtrip() {
        let id = JobId::from_string("job-42");
        assert_eq!(id.as_str(), "job-42");
        assert_eq!(id.to_string(), "job-42");

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"job-42\"");
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Transcoding.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_target_scale_labels() {
        assert_eq!(TargetScale::from_label("720p"), TargetScale::P720);
        assert_eq!(TargetScale::from_label("480p"), TargetScale::P480);
        assert_eq!(TargetScale::from_label("1080p"), TargetScale::P1080);
        // Unknown labels fall back to the default
        assert_eq!(TargetScale::from_label("4k"), TargetScale::P1080);
        assert_eq!(TargetScale::from_label(""), TargetScale::P1080);
    }

    #[test]
    fn test_target_scale_size_token() {
        assert_eq!(TargetScale::P1080.size_token(), "1080");
        assert_eq!(TargetScale::P720.size_token(), "720");
        assert_eq!(TargetScale::P480.size_token(), "480");
    }

    #[test]
    fn test_request_builder() {
        let req = TranscodeRequest::new("https://example.com/in.mov", JobId::from_string("j1"))
            .with_scale(TargetScale::P480);
        assert_eq!(req.scale, TargetScale::P480);
        assert_eq!(req.job_id.as_str(), "j1");
    }
}
