//! Caller-facing result types.

use serde::Serialize;

/// Number of differing pixels above which a region is flagged anomalous.
///
/// 1500 of the 250,000 compared positions, i.e. 0.6% of the grid.
pub const ANOMALY_THRESHOLD: u32 = 1500;

/// A solved field center on the celestial sphere, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoordinates {
    pub ra: f64,
    pub dec: f64,
}

impl SkyCoordinates {
    /// Format both axes to 4 decimal places for the caller boundary.
    pub fn formatted(&self) -> FormattedCoordinates {
        FormattedCoordinates {
            ra: format!("{:.4}", self.ra),
            dec: format!("{:.4}", self.dec),
        }
    }
}

/// Coordinates as reported to the caller, 4 decimal places per axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedCoordinates {
    pub ra: String,
    pub dec: String,
}

/// Classification of a scored sky region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Difference count above the anomaly threshold.
    Supernova,
    /// Region stable relative to the archival reference.
    Galaxy,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Supernova => write!(f, "SUPERNOVA"),
            Classification::Galaxy => write!(f, "GALAXY"),
        }
    }
}

/// Terminal output of one pipeline run; ownership passes to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    /// Solved field center.
    pub coordinates: FormattedCoordinates,
    /// Archival cutout the photo was compared against.
    #[serde(rename = "referenceImageRef")]
    pub reference_image_ref: String,
    /// Human-readable classification summary.
    pub message: String,
    /// Region classification.
    pub category: Classification,
    /// Count of pixel positions differing beyond tolerance.
    #[serde(rename = "rawScore")]
    pub raw_score: u32,
    /// True when scoring failed and the score fell back to zero.
    #[serde(rename = "scoringDegraded")]
    pub scoring_degraded: bool,
}

/// Classify a difference count against `threshold`.
pub(crate) fn classify(score: u32, threshold: u32) -> (Classification, String) {
    if score > threshold {
        (
            Classification::Supernova,
            format!("Anomaly detected: {score} pixels differ from the archival reference"),
        )
    } else {
        (
            Classification::Galaxy,
            "Region stable: no significant change against the archival reference".to_string(),
        )
    }
}
