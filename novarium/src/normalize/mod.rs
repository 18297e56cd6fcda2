//! Image normalization for pixel comparison.
//!
//! Decodes an arbitrary-format image and reduces it to a fixed 500x500
//! single-channel luminance grid, so two independently sourced images can be
//! compared position by position.

use common::Buffer2;
use image::imageops::FilterType;
use thiserror::Error;

/// Side length of a normalized image in pixels.
pub const NORMALIZED_SIZE: usize = 500;

/// The input bytes could not be decoded as an image.
#[derive(Debug, Error)]
#[error("Failed to decode image: {0}")]
pub struct DecodeError(#[from] image::ImageError);

/// A fixed-dimension single-channel image ready for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    luma: Buffer2<u8>,
}

impl NormalizedImage {
    /// Wrap an existing luminance buffer.
    ///
    /// [`normalize`] only ever produces 500x500 buffers; this constructor
    /// accepts arbitrary dimensions so the scorer's dimension check stays
    /// reachable from tests.
    pub fn from_buffer(luma: Buffer2<u8>) -> Self {
        Self { luma }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.luma.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.luma.height()
    }

    /// (width, height) pair.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.luma.dimensions()
    }

    /// Luminance values, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.luma.as_slice()
    }
}

/// Decode `bytes`, stretch to exactly 500x500, and convert to luminance.
///
/// Stretching rather than cropping guarantees fixed output dimensions
/// regardless of the input aspect ratio. Input already at the target size is
/// passed through without resampling.
pub fn normalize(bytes: &[u8]) -> Result<NormalizedImage, DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    let (src_width, src_height) = (decoded.width(), decoded.height());

    let target = NORMALIZED_SIZE as u32;
    let resized = if (src_width, src_height) == (target, target) {
        decoded
    } else {
        decoded.resize_exact(target, target, FilterType::Triangle)
    };

    let luma = resized.into_luma8();
    tracing::debug!(
        "Normalized {}x{} input to {}x{} luminance grid",
        src_width,
        src_height,
        target,
        target
    );

    Ok(NormalizedImage {
        luma: Buffer2::new(NORMALIZED_SIZE, NORMALIZED_SIZE, luma.into_raw()),
    })
}
