//! Transcode command builder.

use std::path::{Path, PathBuf};

use vtc_models::TargetScale;

/// Builder for the engine's transcode invocation.
///
/// Produces an H.264 baseline-profile encode with a scale filter that forces
/// an even output width (`trunc(iw/2)*2`), which libx264 requires.
#[derive(Debug, Clone)]
pub struct TranscodeCommand {
    /// Source media URL or path
    input: String,
    /// Output file path
    output: PathBuf,
    /// Target output resolution
    scale: TargetScale,
    /// Whether to overwrite the output file
    overwrite: bool,
}

impl TranscodeCommand {
    /// Create a new transcode command.
    pub fn new(input: impl Into<String>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.into(),
            output: output.as_ref().to_path_buf(),
            scale: TargetScale::default(),
            overwrite: true,
        }
    }

    /// Set the target output resolution.
    pub fn scale(mut self, scale: TargetScale) -> Self {
        self.scale = scale;
        self
    }

    /// Get the output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-i".to_string());
        args.push(self.input.clone());

        args.push("-c:v".to_string());
        args.push("libx264".to_string());

        args.push("-vf".to_string());
        args.push(format!("scale=trunc(iw/2)*2:{}", self.scale.size_token()));

        args.push("-strict".to_string());
        args.push("-2".to_string());

        args.push("-profile:v".to_string());
        args.push("baseline".to_string());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = TranscodeCommand::new("https://example.com/in.mov", "/data/job-1.mp4")
            .scale(TargetScale::P720);

        let args = cmd.build_args();
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"scale=trunc(iw/2)*2:720".to_string()));
        assert!(args.contains(&"baseline".to_string()));
        assert_eq!(args.last().unwrap(), "/data/job-1.mp4");
    }

    #[test]
    fn test_default_scale_is_1080() {
        let cmd = TranscodeCommand::new("in.mp4", "out.mp4");
        let args = cmd.build_args();
        assert!(args.contains(&"scale=trunc(iw/2)*2:1080".to_string()));
    }

    #[test]
    fn test_input_precedes_output_args() {
        let cmd = TranscodeCommand::new("in.mp4", "out.mp4");
        let args = cmd.build_args();
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let codec_pos = args.iter().position(|a| a == "-c:v").unwrap();
        assert!(i_pos < codec_pos);
    }
}
