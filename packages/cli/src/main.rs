#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line runner for the prediction overlay.
//!
//! Runs one overlay load against the configured ML endpoint (or purely
//! offline with `--fallback-only`) and prints the resulting markers the way
//! the map renderer would consume them.

use async_trait::async_trait;
use big_city_overlay::{Overlay, popup::MarkerPopup};
use big_city_prediction::client::PredictionClient;
use big_city_prediction::{PredictionError, PredictionSource};
use big_city_prediction_models::{EventCategory, RawPrediction};
use clap::Parser;

/// Load the Toronto crime-risk overlay and print its markers.
#[derive(Parser)]
struct Args {
    /// Base URL of the ML prediction endpoint.
    #[arg(long, default_value = "http://localhost:5006")]
    endpoint: String,

    /// Skip the network entirely and source every category from the
    /// bundled fallback dataset.
    #[arg(long)]
    fallback_only: bool,
}

/// Source that never reaches the network, forcing fallback substitution
/// for every category.
struct OfflineSource;

#[async_trait]
impl PredictionSource for OfflineSource {
    async fn top_locations(
        &self,
        _category: EventCategory,
    ) -> Result<Vec<RawPrediction>, PredictionError> {
        Err(PredictionError::Endpoint {
            message: "offline mode".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let args = Args::parse();

    if args.fallback_only {
        log::info!("Loading overlay from the bundled fallback dataset");
        run(Overlay::new(OfflineSource)).await;
    } else {
        log::info!("Loading overlay from {}", args.endpoint);
        let client = PredictionClient::new(&args.endpoint)?;
        run(Overlay::new(client)).await;
    }

    Ok(())
}

async fn run<S: PredictionSource>(overlay: Overlay<S>) {
    overlay.load().await;

    overlay.with_state(|state| {
        println!("{} markers loaded", state.markers().len());
        for marker in state.markers() {
            let popup = MarkerPopup::for_marker(marker);
            println!(
                "{:<24} {:>9.5}, {:>10.5}  {:<16} {:>6}  neighbourhood {}",
                marker.id,
                marker.latitude,
                marker.longitude,
                popup.title,
                popup.probability,
                popup.neighbourhood,
            );
        }
    });
}
