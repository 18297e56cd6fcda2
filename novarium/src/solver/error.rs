//! Error types for plate solving.

use thiserror::Error;

/// Errors that can occur while driving a solver session.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The service rejected the configured API key.
    #[error("Solver login rejected: {message}")]
    Auth { message: String },

    /// The service rejected the image upload.
    #[error("Image upload rejected: {message}")]
    Upload { message: String },

    /// No calibration appeared within the polling budget.
    #[error("Plate solving did not complete within {attempts} polling attempts")]
    Timeout { attempts: u32 },

    /// The HTTP request itself failed.
    #[error("Solver request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something the client cannot interpret.
    #[error("Unexpected solver response: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_carries_service_message() {
        let err = SolveError::Auth {
            message: "bad apikey".to_string(),
        };
        assert_eq!(err.to_string(), "Solver login rejected: bad apikey");
    }

    #[test]
    fn timeout_error_names_the_attempt_budget() {
        let err = SolveError::Timeout { attempts: 20 };
        assert!(err.to_string().contains("20 polling attempts"));
    }

    #[test]
    fn protocol_error_is_debug() {
        let err = SolveError::Protocol("no session key".to_string());
        assert!(format!("{:?}", err).contains("Protocol"));
    }
}
