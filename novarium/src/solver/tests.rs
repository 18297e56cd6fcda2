use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{NovaApi, PollConfig, SolveError, SolverApi, SolverSession};
use crate::testing::{init_tracing, ScriptedSolver};

/// Session with a sleep recorder instead of a real delay.
fn session_with_recorder(
    api: ScriptedSolver,
) -> (SolverSession<ScriptedSolver>, Arc<Mutex<Vec<Duration>>>) {
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&sleeps);
    let session = SolverSession::new(api, "test-key")
        .with_sleep(move |d| recorder.lock().unwrap().push(d));
    (session, sleeps)
}

#[test]
fn polling_stops_after_exactly_max_attempts() {
    init_tracing();

    let api = ScriptedSolver::never_solving();
    let (session, sleeps) = session_with_recorder(api.clone());

    let err = session.solve(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, SolveError::Timeout { attempts: 20 }));

    assert_eq!(api.status_call_count(), 20);

    // One fixed-interval sleep per failed attempt, about a minute in total.
    let sleeps = sleeps.lock().unwrap();
    assert_eq!(sleeps.len(), 20);
    assert!(sleeps.iter().all(|&d| d == Duration::from_secs(3)));
}

#[test]
fn polling_returns_on_first_completed_attempt() {
    init_tracing();

    let api = ScriptedSolver::solving_on_attempt(3, 180.1234, 45.6789);
    let (session, sleeps) = session_with_recorder(api.clone());

    let calibration = session.solve(&[1, 2, 3]).unwrap();
    assert_eq!(calibration.ra, 180.1234);
    assert_eq!(calibration.dec, 45.6789);

    // Three status checks, no further polling after the hit.
    assert_eq!(api.status_call_count(), 3);
    assert_eq!(sleeps.lock().unwrap().len(), 2);
}

#[test]
fn immediate_completion_needs_no_sleep() {
    let api = ScriptedSolver::solving_on_attempt(1, 10.0, -5.0);
    let (session, sleeps) = session_with_recorder(api.clone());

    session.solve(&[0]).unwrap();

    assert_eq!(api.status_call_count(), 1);
    assert!(sleeps.lock().unwrap().is_empty());
}

#[test]
fn login_rejection_aborts_before_upload() {
    let api = ScriptedSolver::rejecting_login();
    let (session, sleeps) = session_with_recorder(api.clone());

    let err = session.solve(&[0]).unwrap_err();
    assert!(matches!(err, SolveError::Auth { .. }));

    assert_eq!(api.status_call_count(), 0);
    assert!(sleeps.lock().unwrap().is_empty());
}

#[test]
fn upload_rejection_aborts_before_polling() {
    let api = ScriptedSolver::rejecting_upload();
    let (session, _sleeps) = session_with_recorder(api.clone());

    let err = session.solve(&[0]).unwrap_err();
    assert!(matches!(err, SolveError::Upload { .. }));
    assert_eq!(api.status_call_count(), 0);
}

#[test]
fn poll_config_defaults_match_the_minute_budget() {
    let config = PollConfig::default();
    assert_eq!(config.interval, Duration::from_secs(3));
    assert_eq!(config.max_attempts, 20);
}

#[test]
fn custom_poll_budget_is_honored() {
    let api = ScriptedSolver::never_solving();
    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&sleeps);
    let session = SolverSession::with_config(
        api.clone(),
        "test-key",
        PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        },
    )
    .with_sleep(move |d| recorder.lock().unwrap().push(d));

    let err = session.solve(&[0]).unwrap_err();
    assert!(matches!(err, SolveError::Timeout { attempts: 5 }));
    assert_eq!(api.status_call_count(), 5);
}

#[test]
fn nova_api_default_points_at_nova() {
    let api = NovaApi::new();
    assert!(format!("{:?}", api).contains("nova.astrometry.net"));
}

#[test]
#[ignore] // Requires NOVA_API_KEY and network access
fn live_login_round_trip() {
    init_tracing();

    let api_key = std::env::var("NOVA_API_KEY").expect("NOVA_API_KEY not set");
    let api = NovaApi::new();
    let session = api.login(&api_key).expect("Login failed");
    assert!(!session.0.is_empty());
}
