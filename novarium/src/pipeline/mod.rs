//! Discovery pipeline orchestration.
//!
//! One [`DiscoveryPipeline::analyze`] call drives one end-to-end run:
//! plate-solve the submitted photo, fetch the archival reference for the
//! solved coordinates, normalize both images, score their pixel difference,
//! and classify the region.
//!
//! Failure policy is asymmetric and deliberate: solving and reference
//! retrieval are hard failures (an unsolved image is useless), while decode
//! and scoring failures degrade to a zero score ("no detectable anomaly")
//! rather than failing the run. The report's `scoring_degraded` flag records
//! when that fallback engaged.

mod report;


pub use report::{
    Classification, DiscoveryReport, FormattedCoordinates, SkyCoordinates, ANOMALY_THRESHOLD,
};

use thiserror::Error;

use crate::diff::{self, DiffError, DEFAULT_TOLERANCE};
use crate::normalize::{normalize, DecodeError};
use crate::solver::{SolveError, SolverApi, SolverSession};
use crate::survey::{ReferenceError, ReferenceLocator};

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Internal scoring failures; mapped to a zero score, never propagated.
#[derive(Debug, Error)]
enum ScoreError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Scoring and classification knobs.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Perceptual tolerance for pixel comparison, fraction of full range.
    pub tolerance: f32,
    /// Differing-pixel count above which the region is flagged anomalous.
    pub anomaly_threshold: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            anomaly_threshold: ANOMALY_THRESHOLD,
        }
    }
}

/// One-shot discovery analysis over a solver and a reference locator.
///
/// Each run is self-contained: no state is shared between invocations and
/// no session or image survives past the returned report.
#[derive(Debug)]
pub struct DiscoveryPipeline<A: SolverApi, L: ReferenceLocator> {
    solver: SolverSession<A>,
    locator: L,
    config: PipelineConfig,
}

impl<A: SolverApi, L: ReferenceLocator> DiscoveryPipeline<A, L> {
    pub fn new(solver: SolverSession<A>, locator: L) -> Self {
        Self::with_config(solver, locator, PipelineConfig::default())
    }

    pub fn with_config(solver: SolverSession<A>, locator: L, config: PipelineConfig) -> Self {
        Self {
            solver,
            locator,
            config,
        }
    }

    /// Analyze one submitted photo end to end.
    pub fn analyze(&self, image: &[u8]) -> Result<DiscoveryReport, PipelineError> {
        // Step 1: plate-solve the submitted photo.
        let calibration = self.solver.solve(image)?;
        let coordinates = SkyCoordinates {
            ra: calibration.ra,
            dec: calibration.dec,
        };

        // Step 2: fetch the archival reference for the solved field.
        let reference = self.locator.locate(coordinates.ra, coordinates.dec)?;

        // Step 3: normalize both images and score. Failures here degrade to
        // a zero score instead of aborting the run.
        let (raw_score, scoring_degraded) = match self.score_pair(image, &reference.data) {
            Ok(score) => (score, false),
            Err(err) => {
                tracing::warn!("Scoring failed, reporting no anomaly: {}", err);
                (0, true)
            }
        };

        // Step 4: classify and report.
        let (category, message) = report::classify(raw_score, self.config.anomaly_threshold);
        tracing::info!(
            "Region at RA={:.4} Dec={:.4} classified {} ({} differing pixels)",
            coordinates.ra,
            coordinates.dec,
            category,
            raw_score
        );

        Ok(DiscoveryReport {
            coordinates: coordinates.formatted(),
            reference_image_ref: reference.url,
            message,
            category,
            raw_score,
            scoring_degraded,
        })
    }

    /// Normalize the photo and the reference concurrently, then count
    /// differing pixels. Both normalizations complete before scoring.
    fn score_pair(&self, photo: &[u8], reference: &[u8]) -> Result<u32, ScoreError> {
        let (photo, reference) = rayon::join(|| normalize(photo), || normalize(reference));
        let (photo, reference) = (photo?, reference?);

        Ok(diff::count_differing_pixels(
            &photo,
            &reference,
            self.config.tolerance,
        )?)
    }
}
