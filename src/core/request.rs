use crate::domain::model::{ExtinctionParameters, MagnitudeSet, PredictionRequest};

/// Assembles the classifier payload. Inputs must already be validated and resolved.
pub fn build_prediction_request(
    magnitudes: &MagnitudeSet,
    extinction: &ExtinctionParameters,
) -> PredictionRequest {
    PredictionRequest {
        magnitudes: *magnitudes,
        apply_extinction: extinction.applied,
        ebv: if extinction.applied { extinction.ebv } else { 0.0 },
    }
}
