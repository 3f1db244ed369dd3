//! HTTP client for the external ML prediction endpoint.

use std::time::Duration;

use async_trait::async_trait;
use big_city_prediction_models::{EventCategory, PredictRequest, PredictResponse, RawPrediction};

use crate::{PredictionError, PredictionSource};

/// Upper bound on a single prediction request, so a hung endpoint cannot
/// wedge the overlay in its loading state.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of the response body preview included in decode errors
/// and logs.
const BODY_PREVIEW_LEN: usize = 200;

/// [`PredictionSource`] implementation backed by the `POST /predict` HTTP
/// endpoint.
pub struct PredictionClient {
    client: reqwest::Client,
    predict_url: String,
}

impl PredictionClient {
    /// Creates a client for the endpoint at `base_url` (no trailing slash,
    /// e.g. `http://localhost:5006`).
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Http`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            predict_url: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl PredictionSource for PredictionClient {
    async fn top_locations(
        &self,
        category: EventCategory,
    ) -> Result<Vec<RawPrediction>, PredictionError> {
        let request = PredictRequest {
            datetime: chrono::Utc::now().timestamp(),
            event_subtype: category,
        };

        let response = self
            .client
            .post(&self.predict_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("prediction endpoint returned HTTP {status} for {category}");
            return Err(PredictionError::Endpoint {
                message: format!("HTTP {status}"),
            });
        }

        // Read the raw body as text first, then decode, so the actual
        // response content can be logged and reported on a shape mismatch.
        let text = response.text().await?;
        decode_top_locations(&text).inspect_err(|e| {
            log::warn!("prediction response for {category} unusable: {e}");
        })
    }
}

/// Decodes a 2xx `POST /predict` body into the ranked location list.
fn decode_top_locations(text: &str) -> Result<Vec<RawPrediction>, PredictionError> {
    let body: PredictResponse = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(e) => {
            return Err(PredictionError::Endpoint {
                message: format!("JSON parse failed: {e} (body preview: {})", preview(text)),
            });
        }
    };

    if !body.success {
        return Err(PredictionError::Endpoint {
            message: body
                .error
                .unwrap_or_else(|| "endpoint reported failure without detail".to_string()),
        });
    }

    body.output
        .map(|output| output.top_20_locations)
        .ok_or_else(|| PredictionError::Endpoint {
            message: "response missing top_20_locations".to_string(),
        })
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
