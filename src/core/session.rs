//! Session state for one user: current inputs, the in-flight flag and the latest result.
//!
//! All mutation goes through the setters below. Readers take a [`SessionSnapshot`].

use crate::core::diagram::{place_on_diagram, DiagramPoint, MagnitudeView};
use crate::core::extinction::ExtinctionSettings;
use crate::core::merge::merge_result;
use crate::core::photometry::{
    compute_color_indices, preview_color_indices, survey_range_warnings, validate_magnitudes,
};
use crate::core::request::build_prediction_request;
use crate::domain::model::{
    Band, ColorIndices, ExtinctionParameters, MagnitudeInput, MagnitudeSet, PredictionRequest,
    PredictionResult, RawPrediction, RawValue,
};
use crate::domain::ports::Classifier;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub inputs: MagnitudeInput,
    pub extinction: ExtinctionSettings,
    pub preview: Option<ColorIndices>,
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
    pub pending: bool,
    pub view: MagnitudeView,
}

/// A validated submission waiting for the classifier's answer.
#[derive(Debug, Clone)]
pub struct Submission {
    pub request: PredictionRequest,
    magnitudes: MagnitudeSet,
    colors: ColorIndices,
    extinction: ExtinctionParameters,
}

#[derive(Debug, Default)]
pub struct Session {
    inputs: MagnitudeInput,
    extinction: ExtinctionSettings,
    preview: Option<ColorIndices>,
    result: Option<PredictionResult>,
    error: Option<String>,
    pending: bool,
    view: MagnitudeView,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_band(&mut self, band: Band, value: impl Into<RawValue>) {
        self.inputs.set(band, value);
        self.preview = preview_color_indices(&self.inputs);
    }

    pub fn set_inputs(&mut self, inputs: MagnitudeInput) {
        self.inputs = inputs;
        self.preview = preview_color_indices(&self.inputs);
    }

    pub fn clear_band(&mut self, band: Band) {
        self.inputs.clear(band);
        self.preview = None;
    }

    pub fn set_extinction(&mut self, settings: ExtinctionSettings) {
        self.extinction = settings;
    }

    pub fn toggle_view(&mut self) -> MagnitudeView {
        self.view = self.view.toggled();
        self.view
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            inputs: self.inputs.clone(),
            extinction: self.extinction.clone(),
            preview: self.preview,
            result: self.result.clone(),
            error: self.error.clone(),
            pending: self.pending,
            view: self.view,
        }
    }

    pub fn diagram_point(&self) -> Option<Result<DiagramPoint>> {
        self.result
            .as_ref()
            .map(|result| place_on_diagram(result, self.view))
    }

    /// Validates the form and marks the session pending.
    ///
    /// Returns `Ok(None)` while another submission is in flight. Validation errors are
    /// recorded as the session's error message and returned; nothing is marked pending.
    pub fn begin_submission(&mut self) -> Result<Option<Submission>> {
        if self.pending {
            tracing::debug!("Submission ignored: a prediction request is already pending");
            return Ok(None);
        }

        let prepared = validate_magnitudes(&self.inputs).and_then(|magnitudes| {
            let extinction = self.extinction.resolve()?;
            Ok((magnitudes, extinction))
        });
        let (magnitudes, extinction) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!("Input validation failed: {}", e);
                self.error = Some(e.user_friendly_message());
                return Err(e);
            }
        };

        let colors = compute_color_indices(&magnitudes);
        for warning in survey_range_warnings(&colors) {
            tracing::warn!("{}", warning);
        }

        self.pending = true;
        self.error = None;
        self.result = None;

        Ok(Some(Submission {
            request: build_prediction_request(&magnitudes, &extinction),
            magnitudes,
            colors,
            extinction,
        }))
    }

    pub fn complete_submission(
        &mut self,
        submission: Submission,
        outcome: Result<RawPrediction>,
    ) -> Result<PredictionResult> {
        self.pending = false;
        match outcome {
            Ok(raw) => {
                let result = merge_result(
                    raw,
                    &submission.magnitudes,
                    &submission.colors,
                    &submission.extinction,
                );
                tracing::info!(
                    "Prediction received: spectral type {}, Teff {:.0} K, reliability {}",
                    result.spectral_type,
                    result.teff,
                    result.reliability
                );
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Prediction request failed: {}", e);
                self.error = Some(e.user_friendly_message());
                Err(e)
            }
        }
    }

    /// Validate, call the classifier once, merge. `Ok(None)` means the call was skipped
    /// because another one is pending.
    ///
    /// Dropping the future before it resolves abandons the request and clears the pending flag.
    pub async fn submit<C: Classifier + ?Sized>(
        &mut self,
        classifier: &C,
    ) -> Result<Option<PredictionResult>> {
        let Some(submission) = self.begin_submission()? else {
            return Ok(None);
        };
        let mut guard = PendingGuard { session: self };
        let outcome = classifier.predict(&submission.request).await;
        guard.session.complete_submission(submission, outcome).map(Some)
    }
}

/// Clears `pending` if a submission is abandoned mid-flight.
struct PendingGuard<'a> {
    session: &'a mut Session,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.session.pending {
            tracing::warn!("Prediction request abandoned before completion");
            self.session.pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ExtinctionMode;
    use crate::utils::error::{StellarError, TRANSPORT_FAILURE_MESSAGE};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        response: serde_json::Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn predict(&self, _request: &PredictionRequest) -> Result<RawPrediction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.response.clone())?)
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn predict(&self, _request: &PredictionRequest) -> Result<RawPrediction> {
            Err(StellarError::Transport {
                message: "connection refused".to_string(),
                status: None,
            })
        }
    }

    struct HangingClassifier;

    #[async_trait]
    impl Classifier for HangingClassifier {
        async fn predict(&self, _request: &PredictionRequest) -> Result<RawPrediction> {
            std::future::pending().await
        }
    }

    fn filled_session() -> Session {
        let mut session = Session::new();
        for (band, value) in Band::ALL.iter().zip(["18.5", "17.2", "16.8", "16.5", "16.3"]) {
            session.set_band(*band, value);
        }
        session
    }

    #[test]
    fn test_preview_tracks_input_changes() {
        let mut session = Session::new();
        session.set_band(Band::U, "18.5");
        assert!(session.snapshot().preview.is_none());

        let mut session = filled_session();
        let preview = session.snapshot().preview.unwrap();
        assert!((preview.u_g - 1.3).abs() < 1e-9);

        session.set_band(Band::U, "19.5");
        let preview = session.snapshot().preview.unwrap();
        assert!((preview.u_g - 2.3).abs() < 1e-9);

        session.clear_band(Band::Z);
        assert!(session.snapshot().preview.is_none());
    }

    #[test]
    fn test_second_begin_is_noop_while_pending() {
        let mut session = filled_session();
        let first = session.begin_submission().unwrap();
        assert!(first.is_some());
        assert!(session.is_pending());

        assert!(session.begin_submission().unwrap().is_none());

        session
            .complete_submission(first.unwrap(), Ok(RawPrediction::default()))
            .unwrap();
        assert!(!session.is_pending());
        assert!(session.begin_submission().unwrap().is_some());
    }

    #[test]
    fn test_validation_error_is_recorded() {
        let mut session = filled_session();
        session.set_band(Band::G, "30");

        let err = session.begin_submission().unwrap_err();
        assert!(matches!(err, StellarError::OutOfRange { .. }));

        let snapshot = session.snapshot();
        assert!(!snapshot.pending);
        assert!(snapshot
            .error
            .unwrap()
            .starts_with("All values must be between 12 and 24."));
    }

    #[tokio::test]
    async fn test_invalid_custom_ebv_sends_nothing() {
        let classifier = FixedClassifier {
            response: serde_json::json!({}),
            calls: AtomicUsize::new(0),
        };
        let mut session = filled_session();
        session.set_extinction(ExtinctionSettings {
            enabled: true,
            mode: ExtinctionMode::Custom,
            preset: "medium".to_string(),
            custom_value: "abc".to_string(),
        });

        let err = session.submit(&classifier).await.unwrap_err();
        assert!(matches!(err, StellarError::InvalidCustomValue { .. }));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_merges_and_replaces_result() {
        let classifier = FixedClassifier {
            response: serde_json::json!({"Spectral_Type": "G", "Teff": 5700.0}),
            calls: AtomicUsize::new(0),
        };
        let mut session = filled_session();

        let result = session.submit(&classifier).await.unwrap().unwrap();
        assert_eq!(result.spectral_type, "G");
        assert!((result.colors.g_r - 0.4).abs() < 1e-9);
        assert_eq!(session.result().unwrap().teff, 5700.0);

        let point = session.diagram_point().unwrap().unwrap();
        assert_eq!(point.view, MagnitudeView::PseudoAbsolute);
        session.toggle_view();
        assert_eq!(session.diagram_point().unwrap().unwrap().magnitude, 17.2);
    }

    #[tokio::test]
    async fn test_transport_failure_clears_pending_and_reports() {
        let mut session = filled_session();
        let err = session.submit(&FailingClassifier).await.unwrap_err();
        assert!(matches!(err, StellarError::Transport { .. }));

        let snapshot = session.snapshot();
        assert!(!snapshot.pending);
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.error.as_deref(), Some(TRANSPORT_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_cancelled_submit_clears_pending() {
        let mut session = filled_session();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            session.submit(&HangingClassifier),
        )
        .await;
        assert!(outcome.is_err());

        assert!(!session.is_pending());
        assert!(session.snapshot().result.is_none());
        assert!(session.begin_submission().unwrap().is_some());
    }
}
