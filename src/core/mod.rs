pub mod diagram;
pub mod extinction;
pub mod merge;
pub mod photometry;
pub mod report;
pub mod request;
pub mod session;

pub use crate::domain::model::{
    ColorIndices, ExtinctionParameters, MagnitudeSet, PredictionRequest, PredictionResult,
    RawPrediction,
};
pub use crate::domain::ports::{Classifier, ConfigProvider, Storage};
pub use crate::utils::error::Result;
