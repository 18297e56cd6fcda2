//! Historical reference images from sky surveys.
//!
//! Fetches an archival cutout of a solved sky region through the CDS
//! hips2fits service. Cutouts are requested at the comparison resolution so
//! no further resampling bias is introduced downstream.

use std::time::Duration;

use thiserror::Error;

use crate::normalize::NORMALIZED_SIZE;

const HIPS2FITS_BASE_URL: &str = "https://alasky.cds.unistra.fr/hips-image-services/hips2fits";

/// Digitized Sky Survey color mosaic, the archival baseline.
const SURVEY_HIPS: &str = "CDS%2FP%2FDSS2%2Fcolor";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from reference image retrieval.
///
/// A failed fetch is terminal for the run; without an archival image there
/// is nothing to compare against.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Survey request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Survey returned HTTP {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// An archival survey image of one sky region.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    /// The cutout request that produced the image.
    pub url: String,
    /// Raw encoded image bytes.
    pub data: Vec<u8>,
}

/// Cutout geometry for reference requests.
#[derive(Debug, Clone, Copy)]
pub struct SurveyConfig {
    /// Angular field size of the cutout, degrees.
    pub field_deg: f64,
    /// Cutout width and height, pixels.
    pub pixels: u32,
}

impl Default for SurveyConfig {
    /// A quarter-degree field at the comparison resolution.
    fn default() -> Self {
        Self {
            field_deg: 0.25,
            pixels: NORMALIZED_SIZE as u32,
        }
    }
}

/// Source of archival reference images.
///
/// [`SkySurveyClient`] implements the real cutout service; tests substitute
/// fixed image data.
pub trait ReferenceLocator {
    /// Fetch the archival image covering the given field center (degrees).
    fn locate(&self, ra: f64, dec: f64) -> Result<ReferenceImage, ReferenceError>;
}

/// Client for the hips2fits cutout service.
#[derive(Debug)]
pub struct SkySurveyClient {
    base_url: String,
    config: SurveyConfig,
    client: reqwest::blocking::Client,
}

impl SkySurveyClient {
    pub fn new() -> Self {
        Self::with_config(SurveyConfig::default())
    }

    pub fn with_config(config: SurveyConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: HIPS2FITS_BASE_URL.to_string(),
            config,
            client,
        }
    }

    /// Cutout request URL for a field center.
    pub fn cutout_url(&self, ra: f64, dec: f64) -> String {
        format!(
            "{}?hips={}&ra={}&dec={}&fov={}&width={}&height={}&projection=TAN&format=jpg",
            self.base_url,
            SURVEY_HIPS,
            ra,
            dec,
            self.config.field_deg,
            self.config.pixels,
            self.config.pixels
        )
    }
}

impl Default for SkySurveyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceLocator for SkySurveyClient {
    fn locate(&self, ra: f64, dec: f64) -> Result<ReferenceImage, ReferenceError> {
        let url = self.cutout_url(ra, dec);
        tracing::info!("Fetching reference cutout from {}", url);

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(ReferenceError::Http {
                status: response.status(),
                url,
            });
        }

        let data = response.bytes()?.to_vec();
        tracing::info!("Fetched {} byte reference image", data.len());

        Ok(ReferenceImage { url, data })
    }
}
