use crate::domain::model::{PredictionRequest, RawPrediction};
use crate::domain::ports::{Classifier, ConfigProvider};
use crate::utils::error::{Result, StellarError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const PREDICT_PATH: &str = "predict/";

/// Classifier reached over HTTP at `{endpoint}/predict/`.
pub struct HttpClassifier {
    client: Client,
    predict_url: Url,
}

impl HttpClassifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(endpoint).map_err(|e| StellarError::InvalidConfigValueError {
            field: "service.endpoint".to_string(),
            value: endpoint.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let predict_url = base
            .join(PREDICT_PATH)
            .map_err(|e| StellarError::ConfigError {
                message: format!("Cannot build prediction URL from '{}': {}", endpoint, e),
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StellarError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            predict_url,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.service_endpoint(), config.request_timeout())
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn predict(&self, request: &PredictionRequest) -> Result<RawPrediction> {
        tracing::debug!("Making prediction request to: {}", self.predict_url);
        let response = self
            .client
            .post(self.predict_url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Prediction response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StellarError::Transport {
                message: format!("service returned {}: {}", status, body.trim()),
                status: Some(status.as_u16()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<RawPrediction>(&body).map_err(|e| StellarError::Transport {
            message: format!("malformed response body: {}", e),
            status: Some(status.as_u16()),
        })
    }
}
