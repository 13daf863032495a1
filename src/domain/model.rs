use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// One of the five SDSS photometric bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    U,
    G,
    R,
    I,
    Z,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::U, Band::G, Band::R, Band::I, Band::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::U => "U",
            Band::G => "G",
            Band::R => "R",
            Band::I => "I",
            Band::Z => "Z",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "U" => Ok(Band::U),
            "G" => Ok(Band::G),
            "R" => Ok(Band::R),
            "I" => Ok(Band::I),
            "Z" => Ok(Band::Z),
            other => Err(format!("unknown band '{}'", other)),
        }
    }
}

/// A magnitude exactly as the user supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Finite numeric value, if the raw input has one.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Band -> raw value mapping as typed into the form. Bands may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeInput {
    values: BTreeMap<Band, RawValue>,
}

impl MagnitudeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, band: Band, value: impl Into<RawValue>) {
        self.values.insert(band, value.into());
    }

    pub fn clear(&mut self, band: Band) {
        self.values.remove(&band);
    }

    pub fn get(&self, band: Band) -> Option<&RawValue> {
        self.values.get(&band)
    }

    pub fn with(mut self, band: Band, value: impl Into<RawValue>) -> Self {
        self.set(band, value);
        self
    }
}

/// Five validated magnitudes. Only `core::photometry::validate_magnitudes` builds these
/// from user input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeSet {
    #[serde(rename = "U")]
    pub u: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl MagnitudeSet {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::U => self.u,
            Band::G => self.g,
            Band::R => self.r,
            Band::I => self.i,
            Band::Z => self.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeBound {
    BelowMinimum(f64),
    AboveMaximum(f64),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::BelowMinimum(min) => write!(f, "below minimum {}", min),
            RangeBound::AboveMaximum(max) => write!(f, "above maximum {}", max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeViolation {
    pub band: Band,
    pub value: f64,
    pub bound: RangeBound,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} {}", self.band, self.value, self.bound)
    }
}

/// Adjacent-band colour index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorIndex {
    UG,
    GR,
    RI,
    IZ,
}

impl ColorIndex {
    pub const ALL: [ColorIndex; 4] = [ColorIndex::UG, ColorIndex::GR, ColorIndex::RI, ColorIndex::IZ];

    /// Hyphenated label, as used by the classifier's `color_influence` map.
    pub fn label(&self) -> &'static str {
        match self {
            ColorIndex::UG => "u-g",
            ColorIndex::GR => "g-r",
            ColorIndex::RI => "r-i",
            ColorIndex::IZ => "i-z",
        }
    }

    /// Underscored field name.
    pub fn key(&self) -> &'static str {
        match self {
            ColorIndex::UG => "u_g",
            ColorIndex::GR => "g_r",
            ColorIndex::RI => "r_i",
            ColorIndex::IZ => "i_z",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|c| c.label() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorIndices {
    pub u_g: f64,
    pub g_r: f64,
    pub r_i: f64,
    pub i_z: f64,
}

impl ColorIndices {
    pub fn get(&self, index: ColorIndex) -> f64 {
        match index {
            ColorIndex::UG => self.u_g,
            ColorIndex::GR => self.g_r,
            ColorIndex::RI => self.r_i,
            ColorIndex::IZ => self.i_z,
        }
    }

    pub fn entries(&self) -> [(ColorIndex, f64); 4] {
        ColorIndex::ALL.map(|c| (c, self.get(c)))
    }
}

impl fmt::Display for ColorIndices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "u-g: {:.3}, g-r: {:.3}, r-i: {:.3}, i-z: {:.3}",
            self.u_g, self.g_r, self.r_i, self.i_z
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtinctionMode {
    #[default]
    Preset,
    Custom,
}

impl FromStr for ExtinctionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preset" => Ok(ExtinctionMode::Preset),
            "custom" => Ok(ExtinctionMode::Custom),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetLevel {
    Low,
    Medium,
    High,
}

impl PresetLevel {
    pub fn ebv(&self) -> f64 {
        match self {
            PresetLevel::Low => 0.03,
            PresetLevel::Medium => 0.10,
            PresetLevel::High => 0.30,
        }
    }
}

impl FromStr for PresetLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PresetLevel::Low),
            "medium" => Ok(PresetLevel::Medium),
            "high" => Ok(PresetLevel::High),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtinctionParameters {
    pub applied: bool,
    pub ebv: f64,
}

impl ExtinctionParameters {
    pub fn none() -> Self {
        Self {
            applied: false,
            ebv: 0.0,
        }
    }
}

/// Body of `POST /predict/`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub magnitudes: MagnitudeSet,
    pub apply_extinction: bool,
    pub ebv: f64,
}

/// Classifier response exactly as received. Every field is optional; defaults are applied
/// by `core::merge::merge_result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    #[serde(rename = "Spectral_Type", default)]
    pub spectral_type: Option<String>,
    #[serde(rename = "Teff", default)]
    pub teff: Option<f64>,
    #[serde(rename = "Teff_uncertainty", default)]
    pub teff_uncertainty: Option<f64>,
    #[serde(rename = "Metallicity_Class", default)]
    pub metallicity_class: Option<String>,
    #[serde(rename = "Metallicity_confidence", default)]
    pub metallicity_confidence: Option<f64>,
    #[serde(rename = "Spectral_confidence", default)]
    pub spectral_confidence: Option<f64>,
    #[serde(rename = "Life_Supporting_Star", default)]
    pub life_supporting_star: Option<serde_json::Value>,
    #[serde(rename = "Life_Supporting_agreement", default)]
    pub life_supporting_agreement: Option<f64>,
    #[serde(rename = "Life_Supporting_confidence", default)]
    pub life_supporting_confidence: Option<f64>,
    #[serde(rename = "Prediction_reliability", default)]
    pub prediction_reliability: Option<String>,
    #[serde(default)]
    pub valid_colors: Option<bool>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub color_influence: Option<HashMap<String, f64>>,
}

/// Reliability label from the classifier. Labels outside the known three are kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Reliability {
    High,
    Medium,
    Low,
    Other(String),
    NotAvailable,
}

impl Reliability {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "High" => Reliability::High,
            "Medium" => Reliability::Medium,
            "Low" => Reliability::Low,
            "" | "N/A" => Reliability::NotAvailable,
            other => Reliability::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Reliability::High => "High",
            Reliability::Medium => "Medium",
            Reliability::Low => "Low",
            Reliability::Other(label) => label.as_str(),
            Reliability::NotAvailable => "N/A",
        }
    }
}

impl From<String> for Reliability {
    fn from(label: String) -> Self {
        Reliability::parse(&label)
    }
}

impl From<Reliability> for String {
    fn from(reliability: Reliability) -> Self {
        reliability.as_str().to_string()
    }
}

impl fmt::Display for Reliability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInfluence {
    pub name: String,
    pub percent: f64,
}

/// Fully populated result: classifier fields with defaults applied, plus the inputs that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub spectral_type: String,
    pub teff: f64,
    pub teff_uncertainty: f64,
    pub metallicity_class: String,
    pub metallicity_confidence: f64,
    pub spectral_confidence: f64,
    pub life_supporting: String,
    pub suitability_agreement: Option<f64>,
    pub reliability: Reliability,
    pub valid_colors: bool,
    pub warnings: Vec<String>,
    pub color_influence: Vec<ColorInfluence>,
    pub magnitudes: MagnitudeSet,
    pub colors: ColorIndices,
    pub extinction: ExtinctionParameters,
}

impl PredictionResult {
    pub fn suitability_agreement_label(&self) -> String {
        match self.suitability_agreement {
            Some(value) => format!("{}%", value),
            None => crate::core::merge::NOT_AVAILABLE.to_string(),
        }
    }
}
