//! Submission lifecycle state machine.

use std::time::Duration;

use super::{Calibration, SolveError, SolverApi, SubmissionId};

/// Polling behavior for a solver session.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Number of status checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    /// 20 attempts at 3 second intervals, roughly a one minute budget.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 20,
        }
    }
}

type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Drives one submission through the plate-solving service.
///
/// A session moves strictly forward: unauthenticated, session open,
/// submitted, polling, then either calibrated (a job produced a plate
/// solution) or timed out (the attempt budget ran out). Session keys are
/// scoped to a single [`solve`](Self::solve) call and never reused.
pub struct SolverSession<A: SolverApi> {
    api: A,
    api_key: String,
    config: PollConfig,
    sleep: SleepFn,
}

impl<A: SolverApi + std::fmt::Debug> std::fmt::Debug for SolverSession<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverSession")
            .field("api", &self.api)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<A: SolverApi> SolverSession<A> {
    pub fn new(api: A, api_key: impl Into<String>) -> Self {
        Self::with_config(api, api_key, PollConfig::default())
    }

    pub fn with_config(api: A, api_key: impl Into<String>, config: PollConfig) -> Self {
        Self {
            api,
            api_key: api_key.into(),
            config,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the inter-attempt sleep. Tests use this to poll without
    /// wall-clock delays.
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Run one full submission lifecycle and return the calibration.
    pub fn solve(&self, image: &[u8]) -> Result<Calibration, SolveError> {
        let session = self.api.login(&self.api_key)?;
        tracing::info!("Solver session open");

        let submission = self.api.upload(&session, image)?;
        tracing::info!("Image submitted as {}", submission.0);

        self.poll_for_calibration(submission)
    }

    /// Poll the submission at a fixed interval until a job reports a
    /// calibration.
    ///
    /// The first attempt that reports a completed job wins; no further
    /// status checks are made. When `max_attempts` checks come back without
    /// a calibrated job the session fails with [`SolveError::Timeout`].
    fn poll_for_calibration(&self, submission: SubmissionId) -> Result<Calibration, SolveError> {
        for attempt in 1..=self.config.max_attempts {
            tracing::debug!(
                "Checking submission {} (attempt {}/{})",
                submission.0,
                attempt,
                self.config.max_attempts
            );

            let status = self.api.submission_status(submission)?;
            if let Some(job) = status.first_calibrated() {
                let calibration = self.api.job_calibration(job)?;
                tracing::info!(
                    "Job {} calibrated: RA={:.4} Dec={:.4}",
                    job.0,
                    calibration.ra,
                    calibration.dec
                );
                return Ok(calibration);
            }

            (self.sleep)(self.config.interval);
        }

        tracing::warn!(
            "Submission {} did not solve within {} attempts",
            submission.0,
            self.config.max_attempts
        );
        Err(SolveError::Timeout {
            attempts: self.config.max_attempts,
        })
    }
}
