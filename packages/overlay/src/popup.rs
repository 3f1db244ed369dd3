//! Presentation contract for the marker detail popup.
//!
//! The map renderer owns layout and styling; this module only says *what*
//! a rendered marker and its popup need: coordinates and a color per
//! marker, and a label, formatted probability, and neighbourhood id for
//! the popup keyed to the selected marker.

use big_city_prediction_models::GeoMarker;

/// Display data for the popup of one selected marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPopup {
    /// Category label, e.g. "Auto Theft".
    pub title: &'static str,
    /// Probability as a percentage with one decimal place, e.g. "25.0%".
    pub probability: String,
    /// City neighbourhood identifier.
    pub neighbourhood: i32,
    /// Marker color, shared with the marker itself.
    pub color: &'static str,
}

impl MarkerPopup {
    /// Builds the popup content for `marker`.
    #[must_use]
    pub fn for_marker(marker: &GeoMarker) -> Self {
        Self {
            title: marker.event_type.label(),
            probability: marker.probability_percent(),
            neighbourhood: marker.neighbourhood,
            color: marker.event_type.marker_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use big_city_prediction_models::{EventCategory, RawPrediction};

    use super::*;

    #[test]
    fn popup_formats_selected_marker() {
        let raw = RawPrediction {
            latitude: 0.0,
            longitude: 0.0,
            neighbourhood: 137,
            probability: 0.875,
        };
        let marker = GeoMarker::from_raw(EventCategory::AutoTheft, 0, &raw);
        let popup = MarkerPopup::for_marker(&marker);
        assert_eq!(popup.title, "Auto Theft");
        assert_eq!(popup.probability, "87.5%");
        assert_eq!(popup.neighbourhood, 137);
        assert_eq!(popup.color, EventCategory::AutoTheft.marker_color());
    }
}
