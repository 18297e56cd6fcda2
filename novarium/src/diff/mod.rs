//! Pixel-difference scoring between normalized images.
//!
//! Counts the positions at which two equal-dimension luminance grids differ
//! by more than a perceptual tolerance. The count is the pipeline's anomaly
//! signal: a handful of differing pixels is noise, a large patch is a
//! candidate transient.

use rayon::prelude::*;
use thiserror::Error;

use crate::normalize::NormalizedImage;

/// Default perceptual tolerance, as a fraction of the full channel range.
pub const DEFAULT_TOLERANCE: f32 = 0.15;

/// Errors from difference scoring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

/// Count pixel positions whose luminance differs by more than `tolerance`.
///
/// A pair of pixels counts as different when `|a - b| / 255 > tolerance`.
/// Counting is parallelized over rows and fully deterministic; scoring is
/// symmetric in its two image arguments.
pub fn count_differing_pixels(
    left: &NormalizedImage,
    right: &NormalizedImage,
    tolerance: f32,
) -> Result<u32, DiffError> {
    if left.dimensions() != right.dimensions() {
        return Err(DiffError::DimensionMismatch {
            expected: left.dimensions(),
            actual: right.dimensions(),
        });
    }

    let threshold = (tolerance * 255.0) as i16;
    let width = left.width().max(1);

    let count = left
        .pixels()
        .par_chunks(width)
        .zip(right.pixels().par_chunks(width))
        .map(|(left_row, right_row)| {
            left_row
                .iter()
                .zip(right_row)
                .filter(|(&a, &b)| (a as i16 - b as i16).abs() > threshold)
                .count() as u32
        })
        .sum::<u32>();

    Ok(count)
}
