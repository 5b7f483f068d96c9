//! Transcode supervision and progress tracking.
//!
//! The supervisor owns the system-wide serialization lock: transcoding is
//! CPU/IO heavy, so at most one transcode runs at a time and further jobs
//! queue on the lock. Duration probing happens before acquisition and may
//! interleave freely across jobs.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use vtc_models::{parse_time_to_seconds, JobId, JobStatus, TranscodeRequest};

use crate::command::TranscodeCommand;
use crate::config::SupervisorConfig;
use crate::error::{MediaError, MediaResult};
use crate::probe::DurationProbe;
use crate::sink::JobStatusSink;

/// Drives transcode jobs and reports their lifecycle to a status sink.
///
/// Cloning is cheap; clones share the serialization lock, so a fleet of
/// callers holding clones still runs one transcode at a time.
#[derive(Clone)]
pub struct TranscodeSupervisor {
    config: SupervisorConfig,
    probe: DurationProbe,
    transcode_lock: Arc<tokio::sync::Semaphore>,
}

impl TranscodeSupervisor {
    /// Create a supervisor with its own serialization lock.
    pub fn new(config: SupervisorConfig) -> Self {
        let probe = DurationProbe::new(&config.transcoder_bin);
        Self {
            config,
            probe,
            transcode_lock: Arc::new(tokio::sync::Semaphore::new(1)),
        }
    }

    /// Run one transcode job to completion.
    ///
    /// Fire-and-forget semantics: this never fails toward the caller. Every
    /// failure mode terminates the job through the sink with an `Error`
    /// status instead.
    pub async fn run<S>(&self, request: TranscodeRequest, sink: &S)
    where
        S: JobStatusSink + ?Sized,
    {
        let job_id = request.job_id.clone();
        info!(
            job_id = %job_id,
            source_url = %request.source_url,
            scale = %request.scale,
            "Transcode job started"
        );

        let output_path = self.config.data_dir.join(format!("{}.mp4", job_id));

        // Probe before taking the lock; failure degrades to an unknown
        // duration rather than aborting the job.
        let total_secs = match self.probe.duration_seconds(&request.source_url).await {
            Ok(secs) => secs,
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "Duration probe failed, proceeding without duration");
                0
            }
        };

        let permit = match self.transcode_lock.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                self.report_failure(&job_id, sink, "transcode lock closed").await;
                return;
            }
        };

        let result = self
            .transcode(&request, &output_path, total_secs, sink)
            .await;
        drop(permit);

        if let Err(err) = result {
            error!(job_id = %job_id, error = %err, "Failed to transcode video");
            self.report_failure(&job_id, sink, &err.to_string()).await;
        }
    }

    /// Spawn the engine, follow its stderr, and drive sink updates.
    ///
    /// Caller must hold the serialization lock.
    async fn transcode<S>(
        &self,
        request: &TranscodeRequest,
        output_path: &std::path::Path,
        total_secs: u64,
        sink: &S,
    ) -> MediaResult<()>
    where
        S: JobStatusSink + ?Sized,
    {
        which::which(&self.config.transcoder_bin).map_err(|_| {
            MediaError::EngineNotFound(self.config.transcoder_bin.display().to_string())
        })?;

        let job_id = &request.job_id;
        let cmd = TranscodeCommand::new(&request.source_url, output_path).scale(request.scale);
        let args = cmd.build_args();
        debug!(
            job_id = %job_id,
            "Running transcode: {} {}",
            self.config.transcoder_bin.display(),
            args.join(" ")
        );

        let start = Instant::now();
        let mut child = Command::new(&self.config.transcoder_bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().ok_or_else(|| {
            MediaError::transcode_failed("stderr not captured", None, None)
        })?;

        sink.update_status(job_id, JobStatus::Transcoding).await;
        sink.update_message(job_id, "Started Transcoding file.").await;

        let mut tracker = ProgressTracker::new(total_secs, self.config.progress_update_every);
        let mut lines = BufReader::new(stderr).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let Some(timecode) = extract_time_marker(&line) else {
                continue;
            };
            let Some(update) = tracker.observe(timecode) else {
                continue;
            };

            if let Some(percent) = update.percent {
                debug!(
                    job_id = %job_id,
                    percent,
                    media_secs = update.current_secs,
                    "Current percent complete"
                );
                sink.update_percent_complete(job_id, percent).await;
                sink.update_message(
                    job_id,
                    &format!("Transcoding job is running and has completed {}%", percent),
                )
                .await;
            } else {
                // Unknown total duration: progress is reported without a
                // percentage rather than as a misleading 0%.
                debug!(
                    job_id = %job_id,
                    media_secs = update.current_secs,
                    "Progress without known duration"
                );
                sink.update_message(job_id, "Transcoding job is running.").await;
            }
            sink.update_elapsed_time(job_id, start.elapsed().as_secs()).await;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(MediaError::transcode_failed(
                "Transcode engine exited with non-zero status",
                None,
                status.code(),
            ));
        }

        info!(job_id = %job_id, output = %output_path.display(), "Transcoding job finished");
        sink.update_status(job_id, JobStatus::Complete).await;
        sink.update_percent_complete(job_id, 100).await;
        sink.update_message(job_id, "Transcoding job finished.").await;

        Ok(())
    }

    async fn report_failure<S>(&self, job_id: &JobId, sink: &S, detail: &str)
    where
        S: JobStatusSink + ?Sized,
    {
        sink.update_status(job_id, JobStatus::Error).await;
        sink.update_message(job_id, &format!("Failed to transcode video: {}", detail))
            .await;
    }
}

/// One throttled progress observation ready to be pushed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProgressUpdate {
    /// Percent complete, absent when the total duration is unknown
    percent: Option<u8>,
    /// Seconds of media processed so far
    current_secs: u64,
}

/// Folds raw progress markers into throttled, monotonic percent updates.
struct ProgressTracker {
    total_secs: u64,
    update_every: u32,
    counter: u32,
    last_percent: u8,
}

impl ProgressTracker {
    fn new(total_secs: u64, update_every: u32) -> Self {
        Self {
            total_secs,
            update_every: update_every.max(1),
            counter: 0,
            last_percent: 0,
        }
    }

    /// Observe one progress marker.
    ///
    /// Returns an update on every `update_every`-th marker; an unparseable
    /// timecode is logged and skipped rather than aborting the job.
    fn observe(&mut self, timecode: &str) -> Option<ProgressUpdate> {
        self.counter += 1;
        if self.counter < self.update_every {
            return None;
        }
        self.counter = 0;

        let current_secs = match parse_time_to_seconds(timecode) {
            Ok(secs) => secs,
            Err(err) => {
                warn!(timecode, error = %err, "Skipping unparseable progress marker");
                return None;
            }
        };

        let percent = if self.total_secs == 0 {
            None
        } else {
            let raw = (current_secs.saturating_mul(100) / self.total_secs).min(100) as u8;
            // Clamp jittery engine timestamps to keep reported percent
            // non-decreasing.
            let pct = raw.max(self.last_percent);
            self.last_percent = pct;
            Some(pct)
        };

        Some(ProgressUpdate {
            percent,
            current_secs,
        })
    }
}

/// Extract the timecode from a `time=<timecode> ` progress marker.
fn extract_time_marker(line: &str) -> Option<&str> {
    line.split("time=").nth(1)?.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_time_marker() {
        let line = "frame=  100 fps= 25 q=28.0 size=    512kB time=00:01:00.00 bitrate= 900.0kbits/s";
        assert_eq!(extract_time_marker(line), Some("00:01:00.00"));
        assert_eq!(extract_time_marker("no marker here"), None);
        assert_eq!(extract_time_marker("time= "), None);
    }

    #[test]
    fn test_tracker_throttles_to_every_nth_marker() {
        let mut tracker = ProgressTracker::new(600, 10);
        for _ in 0..9 {
            assert_eq!(tracker.observe("00:01:00.00"), None);
        }
        let update = tracker.observe("00:01:00.00").unwrap();
        assert_eq!(update.percent, Some(10));
        assert_eq!(update.current_secs, 60);

        // Counter resets after an update
        assert_eq!(tracker.observe("00:02:00.00"), None);
    }

    #[test]
    fn test_tracker_percent_is_monotonic_and_bounded() {
        let mut tracker = ProgressTracker::new(100, 1);
        assert_eq!(tracker.observe("00:00:50.00").unwrap().percent, Some(50));
        // Engine timestamps can jitter backwards; the report must not
        assert_eq!(tracker.observe("00:00:40.00").unwrap().percent, Some(50));
        assert_eq!(tracker.observe("00:01:30.00").unwrap().percent, Some(90));
        // Past the known total clamps at 100
        assert_eq!(tracker.observe("00:03:00.00").unwrap().percent, Some(100));
    }

    #[test]
    fn test_tracker_unknown_duration_suppresses_percent() {
        let mut tracker = ProgressTracker::new(0, 1);
        let update = tracker.observe("00:01:00.00").unwrap();
        assert_eq!(update.percent, None);
        assert_eq!(update.current_secs, 60);
    }

    #[test]
    fn test_tracker_skips_unparseable_marker() {
        let mut tracker = ProgressTracker::new(600, 2);
        assert_eq!(tracker.observe("00:01:00.00"), None);
        assert_eq!(tracker.observe("garbage"), None);
        // The bad sample consumed the throttle slot; the next marker starts
        // a fresh window
        assert_eq!(tracker.observe("00:01:00.00"), None);
        assert!(tracker.observe("00:02:00.00").is_some());
    }
}
