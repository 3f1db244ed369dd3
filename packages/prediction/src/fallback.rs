//! Bundled fallback prediction dataset.
//!
//! A static snapshot of a previous model run, embedded at compile time via
//! [`include_str!`]. When the live endpoint fails or returns nothing for a
//! category, the overlay substitutes this dataset filtered to that category.
//! Entries are in model space like live predictions and flow through the
//! same coordinate transform.

use std::sync::LazyLock;

use big_city_prediction_models::{EventCategory, FallbackEntry, RawPrediction};

static FALLBACK: LazyLock<Vec<FallbackEntry>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/fallback.json"))
        .expect("bundled fallback dataset is valid JSON")
});

/// Returns the full fallback dataset in its bundled (probability-ranked)
/// order.
#[must_use]
pub fn entries() -> &'static [FallbackEntry] {
    &FALLBACK
}

/// Returns the fallback predictions for one category, preserving the
/// bundled rank order.
#[must_use]
pub fn for_category(category: EventCategory) -> Vec<RawPrediction> {
    FALLBACK
        .iter()
        .filter(|entry| entry.event_type == category)
        .map(FallbackEntry::raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use big_city_prediction_models::GeoMarker;

    use super::*;

    #[test]
    fn dataset_has_twenty_entries_per_category() {
        assert_eq!(entries().len(), 40);
        for category in EventCategory::all() {
            assert_eq!(for_category(*category).len(), 20);
        }
    }

    #[test]
    fn top_auto_theft_entry_has_expected_probability() {
        let ranked = for_category(EventCategory::AutoTheft);
        assert_eq!(ranked[0].probability, 0.9995);
        assert_eq!(ranked[0].neighbourhood, 137);
    }

    #[test]
    fn transformed_fallback_lands_on_real_coordinates() {
        // The bundled entries are the exact model-space inverse images of
        // geographic coordinates, so the transform round-trips bit-exactly.
        let ranked = for_category(EventCategory::AutoTheft);
        let marker = GeoMarker::from_raw(EventCategory::AutoTheft, 0, &ranked[0]);
        assert_eq!(marker.latitude, 43.648_145_395_241_514);
        assert_eq!(marker.longitude, -79.349_561_109_944_15);
    }

    #[test]
    fn every_entry_probability_is_in_unit_interval() {
        for entry in entries() {
            assert!((0.0..=1.0).contains(&entry.probability));
        }
    }
}
