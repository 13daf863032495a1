//! Classifier response merge.
//!
//! Every field the classifier omits gets an explicit default here so that display and
//! report code never deal with missing values.

use crate::core::photometry::within_survey_ranges;
use crate::domain::model::{
    ColorIndex, ColorIndices, ColorInfluence, ExtinctionParameters, MagnitudeSet,
    PredictionResult, RawPrediction, Reliability,
};
use std::collections::HashMap;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn merge_result(
    raw: RawPrediction,
    magnitudes: &MagnitudeSet,
    colors: &ColorIndices,
    extinction: &ExtinctionParameters,
) -> PredictionResult {
    let suitability_agreement = raw
        .life_supporting_agreement
        .or(raw.life_supporting_confidence);

    let reliability = match raw.prediction_reliability.as_deref() {
        Some(label) => {
            let parsed = Reliability::parse(label);
            if let Reliability::Other(other) = &parsed {
                tracing::warn!("Unrecognised prediction reliability label: {}", other);
            }
            parsed
        }
        None => Reliability::NotAvailable,
    };

    let valid_colors = raw.valid_colors.unwrap_or_else(|| {
        tracing::debug!("valid_colors missing from response, using local survey ranges");
        within_survey_ranges(colors)
    });

    PredictionResult {
        spectral_type: text_or_default(raw.spectral_type),
        teff: raw.teff.unwrap_or(0.0),
        teff_uncertainty: raw.teff_uncertainty.unwrap_or(0.0),
        metallicity_class: text_or_default(raw.metallicity_class),
        metallicity_confidence: raw.metallicity_confidence.unwrap_or(0.0),
        spectral_confidence: raw.spectral_confidence.unwrap_or(0.0),
        life_supporting: life_supporting_text(raw.life_supporting_star),
        suitability_agreement,
        reliability,
        valid_colors,
        warnings: raw.warnings.unwrap_or_default(),
        color_influence: ordered_influence(raw.color_influence.unwrap_or_default()),
        magnitudes: *magnitudes,
        colors: *colors,
        extinction: *extinction,
    }
}

fn text_or_default(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn life_supporting_text(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => text_or_default(Some(s)),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Null) | None => NOT_AVAILABLE.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Canonical indices first (zero when absent), then any extra keys by name.
fn ordered_influence(influence: HashMap<String, f64>) -> Vec<ColorInfluence> {
    let mut canonical = [0.0; 4];
    let mut extra = Vec::new();
    for (name, percent) in influence {
        match ColorIndex::from_name(&name)
            .and_then(|index| ColorIndex::ALL.iter().position(|c| *c == index))
        {
            Some(slot) => canonical[slot] = percent,
            None => extra.push(ColorInfluence { name, percent }),
        }
    }
    extra.sort_by(|a, b| a.name.cmp(&b.name));

    ColorIndex::ALL
        .iter()
        .zip(canonical)
        .map(|(index, percent)| ColorInfluence {
            name: index.label().to_string(),
            percent,
        })
        .chain(extra)
        .collect()
}
