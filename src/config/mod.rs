pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::TomlConfig;
    use crate::core::extinction::ExtinctionSettings;
    use crate::domain::model::{Band, ExtinctionMode, MagnitudeInput};
    use crate::utils::error::Result;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "stellar-classify")]
    #[command(about = "Classify a star from its UGRIZ magnitudes using a remote prediction service")]
    pub struct CliConfig {
        #[arg(short = 'u', long = "u-mag", value_name = "MAG")]
        pub u: Option<String>,

        #[arg(short = 'g', long = "g-mag", value_name = "MAG")]
        pub g: Option<String>,

        #[arg(short = 'r', long = "r-mag", value_name = "MAG")]
        pub r: Option<String>,

        #[arg(short = 'i', long = "i-mag", value_name = "MAG")]
        pub i: Option<String>,

        #[arg(short = 'z', long = "z-mag", value_name = "MAG")]
        pub z: Option<String>,

        #[arg(long, help = "Ask the service to apply an interstellar extinction correction")]
        pub extinction: bool,

        #[arg(long, value_name = "preset|custom")]
        pub ebv_mode: Option<ExtinctionMode>,

        #[arg(long, value_name = "low|medium|high")]
        pub preset: Option<String>,

        #[arg(long, value_name = "E(B-V)", allow_hyphen_values = true)]
        pub custom_ebv: Option<String>,

        #[arg(long, help = "Place the star using apparent g instead of pseudo-absolute M_g")]
        pub apparent: bool,

        #[arg(long, help = "Export a report bundle after a successful prediction")]
        pub report: bool,

        #[arg(short, long, help = "Path to a TOML configuration file")]
        pub config: Option<String>,

        #[arg(long)]
        pub endpoint: Option<String>,

        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        #[arg(long)]
        pub output_path: Option<String>,

        #[arg(long, help = "Print the merged result as JSON")]
        pub json: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn magnitude_input(&self) -> MagnitudeInput {
            let mut input = MagnitudeInput::new();
            for (band, value) in Band::ALL.into_iter().zip([&self.u, &self.g, &self.r, &self.i, &self.z]) {
                if let Some(value) = value {
                    input.set(band, value.as_str());
                }
            }
            input
        }

        /// CLI flags win over the `[extinction]` section of the config file.
        pub fn extinction_settings(&self, config: &TomlConfig) -> ExtinctionSettings {
            let defaults = ExtinctionSettings::default();
            ExtinctionSettings {
                enabled: self.extinction,
                mode: self
                    .ebv_mode
                    .or(config.extinction.mode)
                    .unwrap_or(defaults.mode),
                preset: self
                    .preset
                    .clone()
                    .or_else(|| config.extinction.preset.clone())
                    .unwrap_or(defaults.preset),
                custom_value: self.custom_ebv.clone().unwrap_or_default(),
            }
        }

        /// Loads the config file (or defaults) and applies CLI overrides.
        pub fn load_config(&self) -> Result<TomlConfig> {
            let mut config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };
            if let Some(endpoint) = &self.endpoint {
                config.service.endpoint = endpoint.clone();
            }
            if let Some(timeout) = self.timeout_seconds {
                config.service.timeout_seconds = Some(timeout);
            }
            if let Some(output_path) = &self.output_path {
                config.report.output_path = output_path.clone();
            }
            Ok(config)
        }
    }

}

#[cfg(feature = "cli")]
pub use args::CliConfig;
