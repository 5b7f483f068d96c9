//! Supervisor configuration.

use std::path::PathBuf;

/// Throttle default: act on every 10th progress marker.
const DEFAULT_PROGRESS_UPDATE_EVERY: u32 = 10;

/// Supervisor configuration.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Directory where transcoded output files are written
    pub data_dir: PathBuf,
    /// Transcode engine binary (name or path)
    pub transcoder_bin: PathBuf,
    /// Push sink updates on every Nth progress marker.
    /// Bounds write volume to the status sink without hurting perceived
    /// responsiveness.
    pub progress_update_every: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/tmp/vtc"),
            transcoder_bin: PathBuf::from("ffmpeg"),
            progress_update_every: DEFAULT_PROGRESS_UPDATE_EVERY,
        }
    }
}

impl SupervisorConfig {
    /// Create a config writing output into the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("VTC_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/vtc")),
            transcoder_bin: std::env::var("VTC_TRANSCODER_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("ffmpeg")),
            progress_update_every: std::env::var("VTC_PROGRESS_UPDATE_EVERY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PROGRESS_UPDATE_EVERY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SupervisorConfig::default();
        assert_eq!(config.transcoder_bin, PathBuf::from("ffmpeg"));
        assert_eq!(config.progress_update_every, 10);
    }

    #[test]
    fn test_new_sets_data_dir() {
        let config = SupervisorConfig::new("/var/lib/vtc");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/vtc"));
        assert_eq!(config.progress_update_every, 10);
    }
}
