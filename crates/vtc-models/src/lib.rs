//! Shared data models for the VTC transcode backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job identity and lifecycle status
//! - Transcode requests and target scales
//! - Timecode parsing for media-tool output

pub mod job;
pub mod timecode;

// Re-export common types
pub use job::{JobId, JobStatus, TargetScale, TranscodeRequest};
pub use timecode::{parse_time_to_minutes, parse_time_to_seconds, TimecodeError};
