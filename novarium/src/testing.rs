//! Test fixtures: scripted solver transports and synthetic images.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use common::Buffer2;

use crate::normalize::{NormalizedImage, NORMALIZED_SIZE};
use crate::solver::{
    Calibration, JobId, SessionKey, SolveError, SolverApi, SubmissionId, SubmissionStatus,
};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Encode a grayscale PNG with per-pixel values from `f`.
pub fn gray_png<F: Fn(u32, u32) -> u8>(width: u32, height: u32, f: F) -> Vec<u8> {
    let img = image::GrayImage::from_fn(width, height, |x, y| image::Luma([f(x, y)]));
    encode_png(image::DynamicImage::ImageLuma8(img))
}

/// Encode an RGB PNG with per-pixel values from `f`.
pub fn rgb_png<F: Fn(u32, u32) -> [u8; 3]>(width: u32, height: u32, f: F) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| image::Rgb(f(x, y)));
    encode_png(image::DynamicImage::ImageRgb8(img))
}

fn encode_png(img: image::DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Png,
    )
    .expect("Failed to encode test image");
    bytes
}

/// Uniform 500x500 frame.
pub fn uniform_frame(value: u8) -> NormalizedImage {
    NormalizedImage::from_buffer(Buffer2::filled(NORMALIZED_SIZE, NORMALIZED_SIZE, value))
}

/// Uniform 500x500 frame with the first `count` positions (row-major) set to
/// `changed_value`.
pub fn frame_with_leading(value: u8, changed_value: u8, count: usize) -> NormalizedImage {
    let mut buffer = Buffer2::filled(NORMALIZED_SIZE, NORMALIZED_SIZE, value);
    for pixel in buffer.as_mut_slice().iter_mut().take(count) {
        *pixel = changed_value;
    }
    NormalizedImage::from_buffer(buffer)
}

/// Scripted [`SolverApi`] that reports a calibrated job after a fixed number
/// of status checks (never, when `solve_on_attempt` is `None`).
///
/// Clones share the status-check counter, so a test can hand a clone to a
/// session and inspect the original afterwards.
#[derive(Debug, Clone)]
pub struct ScriptedSolver {
    pub ra: f64,
    pub dec: f64,
    pub solve_on_attempt: Option<u32>,
    pub reject_login: bool,
    pub reject_upload: bool,
    status_calls: Arc<AtomicU32>,
}

impl ScriptedSolver {
    pub fn solving_on_attempt(attempt: u32, ra: f64, dec: f64) -> Self {
        Self {
            ra,
            dec,
            solve_on_attempt: Some(attempt),
            reject_login: false,
            reject_upload: false,
            status_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn never_solving() -> Self {
        Self {
            ra: 0.0,
            dec: 0.0,
            solve_on_attempt: None,
            reject_login: false,
            reject_upload: false,
            status_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn rejecting_login() -> Self {
        Self {
            reject_login: true,
            ..Self::never_solving()
        }
    }

    pub fn rejecting_upload() -> Self {
        Self {
            reject_upload: true,
            ..Self::never_solving()
        }
    }

    /// Number of submission status checks made so far.
    pub fn status_call_count(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl SolverApi for ScriptedSolver {
    fn login(&self, _api_key: &str) -> Result<SessionKey, SolveError> {
        if self.reject_login {
            return Err(SolveError::Auth {
                message: "bad apikey".to_string(),
            });
        }
        Ok(SessionKey("scripted-session".to_string()))
    }

    fn upload(&self, _session: &SessionKey, _image: &[u8]) -> Result<SubmissionId, SolveError> {
        if self.reject_upload {
            return Err(SolveError::Upload {
                message: "upload refused".to_string(),
            });
        }
        Ok(SubmissionId(42))
    }

    fn submission_status(&self, _submission: SubmissionId) -> Result<SubmissionStatus, SolveError> {
        let attempt = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.solve_on_attempt {
            Some(target) if attempt >= target => Ok(SubmissionStatus {
                jobs: vec![JobId(7)],
                calibrated_jobs: vec![JobId(7)],
            }),
            _ => Ok(SubmissionStatus::default()),
        }
    }

    fn job_calibration(&self, job: JobId) -> Result<Calibration, SolveError> {
        Ok(Calibration {
            job,
            ra: self.ra,
            dec: self.dec,
        })
    }
}
