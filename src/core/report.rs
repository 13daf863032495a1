//! Prediction report: plain-text summary and the exported zip bundle.

use crate::core::diagram::{place_on_diagram, DiagramPoint, MagnitudeView};
use crate::domain::model::{Band, PredictionResult};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{Result, StellarError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpectralClassInfo {
    pub class: char,
    pub temperature: &'static str,
    pub examples: &'static str,
    pub hosting_outlook: &'static str,
}

const SPECTRAL_CLASSES: [SpectralClassInfo; 7] = [
    SpectralClassInfo {
        class: 'O',
        temperature: "30,000 - 50,000 K",
        examples: "Zeta Puppis, HD 93129A",
        hosting_outlook: "Extremely unlikely",
    },
    SpectralClassInfo {
        class: 'B',
        temperature: "10,000 - 30,000 K",
        examples: "Rigel, Spica",
        hosting_outlook: "Very unlikely",
    },
    SpectralClassInfo {
        class: 'A',
        temperature: "7,500 - 10,000 K",
        examples: "Sirius A, Vega",
        hosting_outlook: "Possible but uncommon",
    },
    SpectralClassInfo {
        class: 'F',
        temperature: "6,000 - 7,500 K",
        examples: "Procyon A, Upsilon Andromedae A",
        hosting_outlook: "Moderately suitable",
    },
    SpectralClassInfo {
        class: 'G',
        temperature: "5,200 - 6,000 K",
        examples: "Sun (Sol), Alpha Centauri A",
        hosting_outlook: "Highly suitable",
    },
    SpectralClassInfo {
        class: 'K',
        temperature: "3,900 - 5,200 K",
        examples: "Epsilon Eridani, HD 40307",
        hosting_outlook: "Very high suitability",
    },
    SpectralClassInfo {
        class: 'M',
        temperature: "2,400 - 3,900 K",
        examples: "Proxima Centauri, Barnard's Star",
        hosting_outlook: "Very high (with caveats)",
    },
];

/// Reference card for the leading letter of a spectral type such as `G2V`.
pub fn spectral_class_info(spectral_type: &str) -> Option<&'static SpectralClassInfo> {
    let class = spectral_type.trim().chars().next()?.to_ascii_uppercase();
    SPECTRAL_CLASSES.iter().find(|info| info.class == class)
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub generated_at: DateTime<Utc>,
    pub result: PredictionResult,
    pub diagram: Option<DiagramPoint>,
}

#[derive(Serialize)]
struct ColorIndexRow<'a> {
    index: &'a str,
    value: f64,
    influence_percent: f64,
}

impl PredictionReport {
    pub fn new(result: PredictionResult, generated_at: DateTime<Utc>, view: MagnitudeView) -> Self {
        let diagram = match place_on_diagram(&result, view) {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::warn!("Diagram placement omitted from report: {}", e);
                None
            }
        };
        Self {
            generated_at,
            result,
            diagram,
        }
    }

    /// `stellar_report_<spectral type>_<UTC timestamp>`.
    pub fn file_stem(&self) -> String {
        let spectral: String = self
            .result
            .spectral_type
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!(
            "stellar_report_{}_{}",
            spectral,
            self.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    pub fn render_text(&self) -> String {
        let r = &self.result;
        let mut out = String::new();

        let _ = writeln!(out, "STELLAR CLASSIFICATION REPORT");
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        if !r.valid_colors {
            let _ = writeln!(
                out,
                "\nWARNING: Input colors are outside model validity range. Predictions may be unreliable."
            );
            for warning in &r.warnings {
                let _ = writeln!(out, "  - {}", warning);
            }
        }

        let magnitudes: Vec<(String, String)> = Band::ALL
            .iter()
            .map(|band| (band.to_string(), format!("{:.3}", r.magnitudes.get(*band))))
            .collect();
        push_table(&mut out, "Input Magnitudes", &magnitudes);

        let extinction = vec![
            (
                "Applied".to_string(),
                if r.extinction.applied { "Yes" } else { "No" }.to_string(),
            ),
            ("E(B-V)".to_string(), format!("{:.2}", r.extinction.ebv)),
        ];
        push_table(&mut out, "Extinction Settings", &extinction);

        let colors: Vec<(String, String)> = r
            .colors
            .entries()
            .iter()
            .map(|(index, value)| (index.label().to_string(), format!("{:.3}", value)))
            .collect();
        push_table(&mut out, "Color Indices", &colors);

        let predictions = vec![
            ("Spectral Type".to_string(), r.spectral_type.clone()),
            ("Effective Temperature".to_string(), format!("{:.0} K", r.teff)),
            ("Metallicity Class".to_string(), r.metallicity_class.clone()),
            ("Suitability For Hosting".to_string(), r.life_supporting.clone()),
        ];
        push_table(&mut out, "Predictions", &predictions);

        let agreement = vec![
            (
                "Teff Uncertainty".to_string(),
                format!("± {:.0} K", r.teff_uncertainty),
            ),
            (
                "Spectral Agreement".to_string(),
                format!("{}%", r.spectral_confidence),
            ),
            (
                "Metallicity Agreement".to_string(),
                format!("{}%", r.metallicity_confidence),
            ),
            (
                "Suitability Agreement".to_string(),
                r.suitability_agreement_label(),
            ),
            (
                "Prediction Reliability".to_string(),
                r.reliability.to_string(),
            ),
        ];
        push_table(&mut out, "Prediction Uncertainty & Agreement", &agreement);

        let influence: Vec<(String, String)> = r
            .color_influence
            .iter()
            .map(|c| (c.name.clone(), format!("{}%", c.percent)))
            .collect();
        push_table(&mut out, "Color Feature Influence", &influence);

        if let Some(point) = &self.diagram {
            let placement = vec![
                ("g - r".to_string(), format!("{:.3}", point.g_r)),
                (
                    point.view.axis_label().to_string(),
                    format!("{:.3}", point.magnitude),
                ),
                (
                    "Marker".to_string(),
                    format!("{} ({})", point.hue, point.hue.hex()),
                ),
            ];
            push_table(&mut out, "HR Diagram Placement", &placement);
        }

        if let Some(info) = spectral_class_info(&r.spectral_type) {
            let card = vec![
                ("Temperature Range".to_string(), info.temperature.to_string()),
                ("Example Stars".to_string(), info.examples.to_string()),
                ("Exoplanet Hosting".to_string(), info.hosting_outlook.to_string()),
            ];
            push_table(&mut out, &format!("Spectral Type {}", info.class), &card);
        }

        out
    }

    pub fn color_indices_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for (index, value) in self.result.colors.entries() {
            let influence_percent = self
                .result
                .color_influence
                .iter()
                .find(|c| c.name == index.label())
                .map(|c| c.percent)
                .unwrap_or(0.0);
            writer.serialize(ColorIndexRow {
                index: index.label(),
                value,
                influence_percent,
            })?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StellarError::IoError(e.into_error()))?;
        utf8_output(bytes)
    }
}

fn utf8_output(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        StellarError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn push_table(out: &mut String, title: &str, rows: &[(String, String)]) {
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let _ = writeln!(out, "\n== {} ==", title);
    for (key, value) in rows {
        let _ = writeln!(out, "  {:<width$}  {}", key, value, width = width);
    }
}

/// Writes report bundles through a [`Storage`] backend.
///
/// `storage` is rooted at the output directory; the logo is read from `assets`, which is
/// normally rooted at the working directory.
pub struct ReportExporter<S: Storage, A: Storage = S> {
    storage: S,
    assets: A,
    output_path: String,
    logo_path: Option<String>,
}

impl<S: Storage, A: Storage> ReportExporter<S, A> {
    pub fn new<C: ConfigProvider>(storage: S, assets: A, config: &C) -> Self {
        Self {
            storage,
            assets,
            output_path: config.output_path().to_string(),
            logo_path: config.logo_path().map(str::to_string),
        }
    }

    /// Best effort: a missing or unreadable logo is logged and skipped.
    async fn load_logo(&self) -> Option<(String, Vec<u8>)> {
        let path = self.logo_path.as_deref()?;
        match self.assets.read_file(path).await {
            Ok(bytes) => {
                let extension = std::path::Path::new(path)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("png");
                Some((format!("logo.{}", extension), bytes))
            }
            Err(e) => {
                tracing::warn!("Report logo '{}' could not be loaded, omitting it: {}", path, e);
                None
            }
        }
    }

    /// Returns the path of the written archive.
    pub async fn export(&self, report: &PredictionReport) -> Result<String> {
        let file_name = format!("{}.zip", report.file_stem());
        let logo = self.load_logo().await;

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            zip.start_file("report.txt", SimpleFileOptions::default())?;
            zip.write_all(report.render_text().as_bytes())?;

            zip.start_file("prediction.json", SimpleFileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

            zip.start_file("color_indices.csv", SimpleFileOptions::default())?;
            zip.write_all(report.color_indices_csv()?.as_bytes())?;

            if let Some((name, bytes)) = &logo {
                zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(bytes)?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing report archive ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&file_name, &zip_data).await?;

        let output_path = format!("{}/{}", self.output_path, file_name);
        tracing::info!("Report exported to {}", output_path);
        Ok(output_path)
    }
}
