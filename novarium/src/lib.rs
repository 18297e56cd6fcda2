//! Novarium - Transient-candidate discovery pipeline.
//!
//! Compares a freshly captured sky photograph against a historical survey
//! image of the same region and flags large pixel-level differences as
//! candidate transient events (e.g. a possible supernova).
//!
//! One analysis run:
//! 1. Plate-solve the photo through a nova.astrometry.net compatible service
//! 2. Fetch an archival cutout of the solved region from a sky survey
//! 3. Normalize both images to a fixed 500x500 luminance grid
//! 4. Count pixel positions differing beyond a perceptual tolerance
//! 5. Classify the region as stable or anomalous
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use novarium::{DiscoveryPipeline, NovaApi, SkySurveyClient, SolverSession};
//!
//! let solver = SolverSession::new(NovaApi::new(), std::env::var("NOVA_API_KEY")?);
//! let pipeline = DiscoveryPipeline::new(solver, SkySurveyClient::new());
//!
//! let photo = std::fs::read("ngc2403.jpg")?;
//! let report = pipeline.analyze(&photo)?;
//! println!("{}: {}", report.category, report.message);
//! ```

pub mod diff;
pub mod normalize;
pub mod pipeline;
pub mod solver;
pub mod survey;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Image normalization
// ============================================================================

pub use normalize::{normalize, DecodeError, NormalizedImage, NORMALIZED_SIZE};

// ============================================================================
// Difference scoring
// ============================================================================

pub use diff::{count_differing_pixels, DiffError, DEFAULT_TOLERANCE};

// ============================================================================
// Plate solving
// ============================================================================

pub use solver::{
    Calibration, JobId, NovaApi, PollConfig, SessionKey, SolveError, SolverApi, SolverSession,
    SubmissionId, SubmissionStatus,
};

// ============================================================================
// Survey reference images
// ============================================================================

pub use survey::{ReferenceError, ReferenceImage, ReferenceLocator, SkySurveyClient, SurveyConfig};

// ============================================================================
// Discovery pipeline
// ============================================================================

pub use pipeline::{
    Classification, DiscoveryPipeline, DiscoveryReport, FormattedCoordinates, PipelineConfig,
    PipelineError, SkyCoordinates, ANOMALY_THRESHOLD,
};
