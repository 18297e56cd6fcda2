//! Plate-solver session client.
//!
//! Drives a nova.astrometry.net style service through one submission
//! lifecycle: authenticate with an API key, upload the image, then poll the
//! submission at a fixed interval until a job reports a calibration or the
//! attempt budget runs out.
//!
//! The HTTP protocol lives behind the [`SolverApi`] trait so the polling
//! state machine can be exercised without a network or a wall clock.

mod error;
mod nova;
mod session;

#[cfg(test)]
mod tests;

pub use error::SolveError;
pub use nova::NovaApi;
pub use session::{PollConfig, SolverSession};

/// Session token returned by the solver's login endpoint.
///
/// Scoped to a single pipeline run; never reused across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey(pub String);

/// Identifier the solver assigns to an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub u64);

/// Identifier of a single solving job spawned from a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub u64);

/// Astrometric plate solution for one solved job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Job that produced this solution.
    pub job: JobId,
    /// Right ascension of the field center, degrees.
    pub ra: f64,
    /// Declination of the field center, degrees.
    pub dec: f64,
}

/// Snapshot of a submission's solving progress.
#[derive(Debug, Clone, Default)]
pub struct SubmissionStatus {
    /// All jobs spawned for the submission.
    pub jobs: Vec<JobId>,
    /// Jobs that already have a calibration available.
    pub calibrated_jobs: Vec<JobId>,
}

impl SubmissionStatus {
    /// First job with a completed calibration, if any.
    pub fn first_calibrated(&self) -> Option<JobId> {
        self.calibrated_jobs.first().copied()
    }
}

/// Transport seam for the plate-solving service.
///
/// [`NovaApi`] implements the real HTTP protocol; tests substitute scripted
/// implementations.
pub trait SolverApi {
    /// Authenticate and open a session.
    fn login(&self, api_key: &str) -> Result<SessionKey, SolveError>;

    /// Upload an image bound to the session; the image stays private.
    fn upload(&self, session: &SessionKey, image: &[u8]) -> Result<SubmissionId, SolveError>;

    /// Current solving progress of a submission.
    fn submission_status(&self, submission: SubmissionId) -> Result<SubmissionStatus, SolveError>;

    /// Calibration data of a completed job.
    fn job_calibration(&self, job: JobId) -> Result<Calibration, SolveError>;
}
