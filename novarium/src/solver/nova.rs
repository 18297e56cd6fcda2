//! HTTP client for the nova.astrometry.net API.

use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;

use super::{Calibration, JobId, SessionKey, SolveError, SolverApi, SubmissionId, SubmissionStatus};

const NOVA_BASE_URL: &str = "https://nova.astrometry.net";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Blocking client for the nova.astrometry.net plate-solving service.
///
/// Get an API key from https://nova.astrometry.net/api_help after logging in.
#[derive(Debug)]
pub struct NovaApi {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    status: String,
    session: Option<String>,
    #[serde(default)]
    errormessage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    status: String,
    subid: Option<u64>,
    #[serde(default)]
    errormessage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatusResponse {
    jobs: Option<Vec<Option<u64>>>,
    job_calibrations: Option<Vec<Option<serde_json::Value>>>,
}

#[derive(Debug, Deserialize)]
struct CalibrationResponse {
    ra: f64,
    dec: f64,
}

impl NovaApi {
    pub fn new() -> Self {
        Self::with_base_url(NOVA_BASE_URL)
    }

    /// Point the client at a different service root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl Default for NovaApi {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverApi for NovaApi {
    fn login(&self, api_key: &str) -> Result<SessionKey, SolveError> {
        let url = format!("{}/api/login", self.base_url);
        let request_json = serde_json::json!({ "apikey": api_key });

        let response: LoginResponse = self
            .client
            .post(&url)
            .form(&[("request-json", request_json.to_string())])
            .send()?
            .json()?;

        if response.status != "success" {
            return Err(SolveError::Auth {
                message: response
                    .errormessage
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let session = response.session.ok_or_else(|| {
            SolveError::Protocol("login response carried no session key".to_string())
        })?;

        tracing::info!("Logged in to plate solver at {}", self.base_url);
        Ok(SessionKey(session))
    }

    fn upload(&self, session: &SessionKey, image: &[u8]) -> Result<SubmissionId, SolveError> {
        let url = format!("{}/api/upload", self.base_url);

        let request_json = serde_json::json!({
            "session": session.0,
            "publicly_visible": "n",
            "allow_modifications": "d",
            "allow_commercial_use": "n",
        });

        let form = multipart::Form::new()
            .text("request-json", request_json.to_string())
            .part(
                "file",
                multipart::Part::bytes(image.to_vec())
                    .file_name("submission")
                    .mime_str("application/octet-stream")?,
            );

        let response: UploadResponse = self
            .client
            .post(&url)
            .multipart(form)
            .send()?
            .json()?;

        if response.status != "success" {
            return Err(SolveError::Upload {
                message: response
                    .errormessage
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let subid = response.subid.ok_or_else(|| {
            SolveError::Protocol("upload response carried no submission id".to_string())
        })?;

        tracing::info!("Uploaded {} byte image, submission id {}", image.len(), subid);
        Ok(SubmissionId(subid))
    }

    fn submission_status(&self, submission: SubmissionId) -> Result<SubmissionStatus, SolveError> {
        let url = format!("{}/api/submissions/{}", self.base_url, submission.0);

        let response: SubmissionStatusResponse = self.client.get(&url).send()?.json()?;

        let jobs: Vec<JobId> = response
            .jobs
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(JobId)
            .collect();

        // job_calibrations entries are [job_id, calibration_id] pairs; a job
        // is complete once it appears there.
        let calibrated_jobs: Vec<JobId> = response
            .job_calibrations
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.as_array()?.first()?.as_u64())
            .map(JobId)
            .collect();

        Ok(SubmissionStatus {
            jobs,
            calibrated_jobs,
        })
    }

    fn job_calibration(&self, job: JobId) -> Result<Calibration, SolveError> {
        let url = format!("{}/api/jobs/{}/calibration/", self.base_url, job.0);

        let response: CalibrationResponse = self.client.get(&url).send()?.json()?;

        Ok(Calibration {
            job,
            ra: response.ra,
            dec: response.dec,
        })
    }
}
