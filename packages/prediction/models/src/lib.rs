#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Event category taxonomy and wire types for the prediction overlay.
//!
//! This crate defines the closed set of predicted risk event categories and
//! the request/response shapes spoken by the external ML endpoint, plus the
//! display-ready [`GeoMarker`] the map renderer consumes.

use big_city_geo::model_to_geo;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A predicted risk event category.
///
/// Closed set, known at build time. The wire tags (`Crime-AutoTheft` etc.)
/// match the ML endpoint's `event_subtype` vocabulary; declaration order is
/// the fixed order categories are aggregated in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum EventCategory {
    /// Theft of a motor vehicle.
    #[serde(rename = "Crime-AutoTheft")]
    #[strum(serialize = "Crime-AutoTheft")]
    AutoTheft,
    /// Unlawful entry with intent to commit an offence.
    #[serde(rename = "Crime-BreakAndEnter")]
    #[strum(serialize = "Crime-BreakAndEnter")]
    BreakAndEnter,
}

impl EventCategory {
    /// Returns all categories in their fixed aggregation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::AutoTheft, Self::BreakAndEnter]
    }

    /// Human-readable label for marker popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AutoTheft => "Auto Theft",
            Self::BreakAndEnter => "Break and Enter",
        }
    }

    /// CSS color used for this category's map markers.
    #[must_use]
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::AutoTheft => "#ef4444",
            Self::BreakAndEnter => "#3b82f6",
        }
    }
}

/// One ranked location as returned by the ML endpoint or the bundled
/// fallback dataset.
///
/// Coordinates are model-space offsets, not geographic coordinates; see
/// [`big_city_geo::model_to_geo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Model-space latitude offset.
    pub latitude: f64,
    /// Model-space longitude offset.
    pub longitude: f64,
    /// City neighbourhood identifier.
    pub neighbourhood: i32,
    /// Predicted probability in `[0, 1]`.
    pub probability: f64,
}

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Current time as Unix seconds.
    pub datetime: i64,
    /// Category to rank locations for.
    pub event_subtype: EventCategory,
}

/// Response body from `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Whether the prediction succeeded upstream.
    pub success: bool,
    /// Ranked output, present on success.
    #[serde(default)]
    pub output: Option<PredictOutput>,
    /// Upstream error message, present on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Successful prediction payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictOutput {
    /// Locations ranked by descending probability.
    pub top_20_locations: Vec<RawPrediction>,
}

/// One entry of the bundled fallback dataset: a [`RawPrediction`] pre-tagged
/// with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    /// Model-space latitude offset.
    pub latitude: f64,
    /// Model-space longitude offset.
    pub longitude: f64,
    /// Category this entry substitutes for.
    pub event_type: EventCategory,
    /// Predicted probability in `[0, 1]`.
    pub probability: f64,
    /// City neighbourhood identifier.
    pub neighbourhood: i32,
}

impl FallbackEntry {
    /// Strips the category tag, leaving the raw prediction.
    #[must_use]
    pub const fn raw(&self) -> RawPrediction {
        RawPrediction {
            latitude: self.latitude,
            longitude: self.longitude,
            neighbourhood: self.neighbourhood,
            probability: self.probability,
        }
    }
}

/// A display-ready map marker.
///
/// Immutable once created; the overlay replaces its marker list wholesale on
/// each load, never mutating markers in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMarker {
    /// Stable identifier: `"{category}-{ordinal}"` within the category's
    /// ranked result list.
    pub id: String,
    /// Real-world latitude.
    pub latitude: f64,
    /// Real-world longitude.
    pub longitude: f64,
    /// Originating category.
    pub event_type: EventCategory,
    /// Predicted probability in `[0, 1]`.
    pub probability: f64,
    /// City neighbourhood identifier.
    pub neighbourhood: i32,
}

impl GeoMarker {
    /// Builds a marker from the prediction ranked at `ordinal` within
    /// `category`, applying the model-space coordinate transform.
    #[must_use]
    pub fn from_raw(category: EventCategory, ordinal: usize, raw: &RawPrediction) -> Self {
        let point = model_to_geo(raw.latitude, raw.longitude);
        Self {
            id: format!("{category}-{ordinal}"),
            latitude: point.latitude,
            longitude: point.longitude,
            event_type: category,
            probability: raw.probability,
            neighbourhood: raw.neighbourhood,
        }
    }

    /// Probability formatted as a percentage with one decimal place, for
    /// popup display.
    #[must_use]
    pub fn probability_percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_tags_round_trip() {
        for category in EventCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            let parsed: EventCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, *category);
        }
        assert_eq!(EventCategory::AutoTheft.to_string(), "Crime-AutoTheft");
        assert_eq!(
            EventCategory::BreakAndEnter.to_string(),
            "Crime-BreakAndEnter"
        );
    }

    #[test]
    fn category_parses_from_wire_tag() {
        let category: EventCategory = "Crime-AutoTheft".parse().unwrap();
        assert_eq!(category, EventCategory::AutoTheft);
        assert!("Crime-Unknown".parse::<EventCategory>().is_err());
    }

    #[test]
    fn predict_request_wire_shape() {
        let request = PredictRequest {
            datetime: 1_705_017_600,
            event_subtype: EventCategory::BreakAndEnter,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["datetime"], 1_705_017_600);
        assert_eq!(json["event_subtype"], "Crime-BreakAndEnter");
    }

    #[test]
    fn predict_response_tolerates_missing_output() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"success":false,"error":"model not loaded"}"#).unwrap();
        assert!(!response.success);
        assert!(response.output.is_none());
        assert_eq!(response.error.as_deref(), Some("model not loaded"));
    }

    #[test]
    fn marker_id_combines_category_and_ordinal() {
        let raw = RawPrediction {
            latitude: 0.0,
            longitude: 0.0,
            neighbourhood: 137,
            probability: 0.5,
        };
        let marker = GeoMarker::from_raw(EventCategory::AutoTheft, 3, &raw);
        assert_eq!(marker.id, "Crime-AutoTheft-3");
        assert_eq!(marker.latitude, 43.65107);
        assert_eq!(marker.longitude, -79.347015);
    }

    #[test]
    fn marker_serializes_event_type_camel_case() {
        let raw = RawPrediction {
            latitude: 0.0,
            longitude: 0.0,
            neighbourhood: 1,
            probability: 0.25,
        };
        let marker = GeoMarker::from_raw(EventCategory::BreakAndEnter, 0, &raw);
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json["eventType"], "Crime-BreakAndEnter");
        assert_eq!(json["id"], "Crime-BreakAndEnter-0");
    }

    #[test]
    fn probability_percent_has_one_decimal() {
        let raw = RawPrediction {
            latitude: 0.0,
            longitude: 0.0,
            neighbourhood: 1,
            probability: 0.25,
        };
        let marker = GeoMarker::from_raw(EventCategory::AutoTheft, 0, &raw);
        assert_eq!(marker.probability_percent(), "25.0%");
    }
}
