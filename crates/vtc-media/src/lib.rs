#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and transcode supervisor.
//!
//! This crate provides:
//! - Duration probing via the engine's diagnostic output
//! - Type-safe transcode command building
//! - Progress parsing from the engine's live stderr stream
//! - A supervisor that serializes transcodes and drives job status updates

pub mod command;
pub mod config;
pub mod error;
pub mod probe;
pub mod sink;
pub mod supervisor;

pub use command::TranscodeCommand;
pub use config::SupervisorConfig;
pub use error::{MediaError, MediaResult};
pub use probe::DurationProbe;
pub use sink::JobStatusSink;
pub use supervisor::TranscodeSupervisor;
