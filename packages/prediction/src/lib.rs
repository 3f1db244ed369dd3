#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prediction retrieval for the crime-risk overlay.
//!
//! Defines the [`PredictionSource`] trait that the overlay aggregates over,
//! the [`client::PredictionClient`] HTTP implementation talking to the
//! external ML endpoint, and the bundled [`fallback`] dataset substituted
//! when the live endpoint yields nothing.

pub mod client;
pub mod fallback;

use async_trait::async_trait;
use big_city_prediction_models::{EventCategory, RawPrediction};

/// Errors that can occur while fetching predictions.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON of the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint answered but did not produce a usable ranking.
    #[error("Endpoint error: {message}")]
    Endpoint {
        /// Description of what went wrong.
        message: String,
    },
}

/// A provider of ranked risk locations for one category.
///
/// The overlay is written against this trait so the live HTTP client and
/// in-memory test sources are interchangeable. Implementations make a single
/// attempt per call; retry policy (if any) is theirs to own.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Returns the top-ranked risk locations for `category`, ordered by
    /// descending probability.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if the predictions cannot be retrieved.
    /// Callers substitute the [`fallback`] dataset rather than surfacing
    /// the failure.
    async fn top_locations(
        &self,
        category: EventCategory,
    ) -> Result<Vec<RawPrediction>, PredictionError>;
}
