//! Example: Discovery Analysis
//!
//! Runs the full discovery pipeline against the live services:
//! 1. Plate-solve a sky photo through nova.astrometry.net
//! 2. Fetch the archival DSS2 cutout for the solved field
//! 3. Score the pixel difference and classify the region
//!
//! # Usage
//!
//! ```bash
//! NOVA_API_KEY=... cargo run --release --example analyze -- /path/to/photo.jpg
//! ```

use std::env;

use anyhow::{Context, Result};
use novarium::{DiscoveryPipeline, NovaApi, SkySurveyClient, SolverSession};

fn main() -> Result<()> {
    common::log_setup::setup_logging("info");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <photo_path>", args[0]);
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  NOVA_API_KEY   API key for nova.astrometry.net");
        std::process::exit(1);
    }

    let api_key = env::var("NOVA_API_KEY").context("NOVA_API_KEY not set")?;
    let photo =
        std::fs::read(&args[1]).with_context(|| format!("Failed to read {}", args[1]))?;

    let solver = SolverSession::new(NovaApi::new(), api_key);
    let pipeline = DiscoveryPipeline::new(solver, SkySurveyClient::new());

    println!("Analyzing {} ({} bytes)...", args[1], photo.len());
    let report = pipeline.analyze(&photo)?;

    println!();
    println!("--- Discovery Report ---");
    println!("Coordinates: RA={} Dec={}", report.coordinates.ra, report.coordinates.dec);
    println!("Reference:   {}", report.reference_image_ref);
    println!("Category:    {}", report.category);
    println!("Score:       {} differing pixels", report.raw_score);
    println!("{}", report.message);

    println!();
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
