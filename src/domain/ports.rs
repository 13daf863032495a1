use crate::domain::model::{PredictionRequest, RawPrediction};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn service_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn logo_path(&self) -> Option<&str>;
}

/// The external prediction service. One call per submission, no retries.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<RawPrediction>;
}
