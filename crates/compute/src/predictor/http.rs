use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::source::ApiResponse;

use super::{PredictError, Prediction, PredictionContext, Predictor};

/// POSTs the prediction context to an inference endpoint.
///
/// The endpoint may answer with a bare [`Prediction`] or with one wrapped in
/// the standard `{success, data, error, timestamp}` envelope.
pub struct HttpPredictor {
    client: reqwest::Client,
    url: Url,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PredictionBody {
    Envelope(ApiResponse<Prediction>),
    Bare(Prediction),
}

impl HttpPredictor {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, PredictError> {
        let url = Url::parse(url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    fn name(&self) -> &str {
        "http"
    }

    async fn predict(&self, ctx: &PredictionContext<'_>) -> Result<Prediction, PredictError> {
        debug!(url = %self.url, device = %ctx.device_id, "requesting prediction");

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .json(ctx)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PredictError::Api(format!("status {}: {}", status.as_u16(), body)));
        }

        decode_prediction(&body)
    }
}

pub(crate) fn decode_prediction(body: &str) -> Result<Prediction, PredictError> {
    let parsed: PredictionBody =
        serde_json::from_str(body).map_err(|e| PredictError::Decode(e.to_string()))?;
    let prediction = match parsed {
        PredictionBody::Bare(p) => p,
        PredictionBody::Envelope(env) if env.success => env
            .data
            .ok_or_else(|| PredictError::Decode("envelope without data".to_string()))?,
        PredictionBody::Envelope(env) => {
            return Err(PredictError::Api(
                env.error.unwrap_or_else(|| "request unsuccessful".to_string()),
            ))
        }
    };

    if !prediction.confidence.is_finite() {
        return Err(PredictError::Decode("confidence is not a number".to_string()));
    }
    Ok(Prediction {
        confidence: prediction.confidence.clamp(0.0, 1.0),
        ..prediction
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_prediction() {
        let p = decode_prediction(
            r#"{"predictions": ["rising"], "recommendations": [], "confidence": 0.6}"#,
        )
        .unwrap();
        assert_eq!(p.predictions, vec!["rising"]);
        assert_eq!(p.confidence, 0.6);
    }

    #[test]
    fn enveloped_prediction() {
        let p = decode_prediction(
            r#"{"success": true, "timestamp": 1, "data": {"predictions": [], "confidence": 1.7}}"#,
        )
        .unwrap();
        assert_eq!(p.confidence, 1.0);
    }

    #[test]
    fn failed_envelope() {
        let err = decode_prediction(r#"{"success": false, "error": "model offline"}"#).unwrap_err();
        assert!(matches!(err, PredictError::Api(ref m) if m == "model offline"));
    }

    #[test]
    fn malformed_body() {
        assert!(matches!(
            decode_prediction(r#"{"predictions": "nope"}"#).unwrap_err(),
            PredictError::Decode(_)
        ));
    }

    #[test]
    fn bad_url_rejected() {
        assert!(matches!(
            HttpPredictor::new("not a url", Duration::from_secs(1)),
            Err(PredictError::InvalidUrl(_))
        ));
    }
}
