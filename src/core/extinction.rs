use crate::domain::model::{ExtinctionMode, ExtinctionParameters, PresetLevel};
use crate::utils::error::{Result, StellarError};
use serde::{Deserialize, Serialize};

/// Extinction controls as entered by the user, before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtinctionSettings {
    pub enabled: bool,
    pub mode: ExtinctionMode,
    pub preset: String,
    pub custom_value: String,
}

impl Default for ExtinctionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: ExtinctionMode::Preset,
            preset: "medium".to_string(),
            custom_value: String::new(),
        }
    }
}

impl ExtinctionSettings {
    pub fn resolve(&self) -> Result<ExtinctionParameters> {
        resolve_extinction(self.enabled, self.mode, &self.preset, &self.custom_value)
    }
}

/// Resolves E(B-V). The correction itself is applied by the classifier.
pub fn resolve_extinction(
    enabled: bool,
    mode: ExtinctionMode,
    preset_level: &str,
    custom_value: &str,
) -> Result<ExtinctionParameters> {
    if !enabled {
        return Ok(ExtinctionParameters::none());
    }

    let ebv = match mode {
        ExtinctionMode::Preset => preset_level
            .parse::<PresetLevel>()
            .map_err(|level| StellarError::InvalidPreset { level })?
            .ebv(),
        ExtinctionMode::Custom => custom_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| StellarError::InvalidCustomValue {
                value: custom_value.to_string(),
            })?,
    };

    tracing::debug!("Resolved extinction: mode={:?}, E(B-V)={}", mode, ebv);
    Ok(ExtinctionParameters { applied: true, ebv })
}
