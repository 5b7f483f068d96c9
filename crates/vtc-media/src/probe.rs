//! Duration probing via the transcode engine's diagnostic output.
//!
//! Tools of the ffmpeg/avconv family refuse to run without an output target,
//! so probing `-i <url>` is EXPECTED to exit non-zero while printing container
//! metadata (including `Duration: HH:MM:SS.ms,`) to stderr. That inverted
//! exit-code contract is confined to this module; callers only ever see a
//! duration in seconds/minutes, or 0 when none could be determined.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use vtc_models::{parse_time_to_minutes, parse_time_to_seconds};

use crate::error::{MediaError, MediaResult};

/// Probes a source URL for its media duration.
#[derive(Debug, Clone)]
pub struct DurationProbe {
    /// Transcode engine binary (name or path)
    binary: PathBuf,
}

impl Default for DurationProbe {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl DurationProbe {
    /// Create a probe around the given engine binary.
    pub fn new(binary: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
        }
    }

    /// Get the video duration in whole seconds.
    ///
    /// Returns 0 when the engine produced no usable diagnostic (degraded
    /// result, not an error); a matched but malformed timecode is an error.
    pub async fn duration_seconds(&self, source_url: &str) -> MediaResult<u64> {
        match self.probe_timecode(source_url).await? {
            Some(timecode) => {
                let secs = parse_time_to_seconds(&timecode)?;
                info!(source_url, secs, "Calculated video duration");
                Ok(secs)
            }
            None => Ok(0),
        }
    }

    /// Get the video duration in whole minutes, rounding partial minutes up.
    pub async fn duration_minutes(&self, source_url: &str) -> MediaResult<u64> {
        match self.probe_timecode(source_url).await? {
            Some(timecode) => {
                let mins = parse_time_to_minutes(&timecode)?;
                info!(source_url, mins, "Calculated video duration");
                Ok(mins)
            }
            None => Ok(0),
        }
    }

    /// Run the engine in probe mode and extract the raw duration timecode.
    async fn probe_timecode(&self, source_url: &str) -> MediaResult<Option<String>> {
        which::which(&self.binary)
            .map_err(|_| MediaError::EngineNotFound(self.binary.display().to_string()))?;

        debug!(source_url, "Checking for video duration");

        let output = Command::new(&self.binary)
            .arg("-i")
            .arg(source_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            // The engine only succeeds when it produced no diagnostic, so
            // there is nothing to parse a duration from.
            warn!(source_url, "Probe exited cleanly, no duration determinable");
            return Ok(None);
        }

        let diagnostic = String::from_utf8_lossy(&output.stderr);
        match extract_duration_token(&diagnostic) {
            Some(token) => {
                debug!(source_url, token, "Found duration in probe diagnostic");
                Ok(Some(token.to_string()))
            }
            None => {
                // A miss usually means the probe tool's output format changed.
                warn!(source_url, "No duration found in probe diagnostic");
                Ok(None)
            }
        }
    }
}

/// Extract the timecode from a `Duration: <timecode>,` diagnostic line.
fn extract_duration_token(diagnostic: &str) -> Option<&str> {
    let rest = diagnostic.split("Duration: ").nth(1)?;
    let token = rest.split(',').next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_duration_token() {
        let diagnostic = "Input #0, mov,mp4, from 'in.mp4':\n  Duration: 00:10:00.00, start: 0.000000, bitrate: 1205 kb/s\n";
        assert_eq!(extract_duration_token(diagnostic), Some("00:10:00.00"));
    }

    #[test]
    fn test_extract_duration_token_missing() {
        assert_eq!(extract_duration_token("no metadata here"), None);
        assert_eq!(extract_duration_token("Duration: ,"), None);
        assert_eq!(extract_duration_token(""), None);
    }

    #[test]
    fn test_extract_first_duration() {
        let diagnostic = "Duration: 00:01:30.50, x\nDuration: 00:09:00.00, y";
        assert_eq!(extract_duration_token(diagnostic), Some("00:01:30.50"));
    }
}
