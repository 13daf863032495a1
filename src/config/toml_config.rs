use crate::core::ConfigProvider;
use crate::domain::model::ExtinctionMode;
use crate::utils::error::{Result, StellarError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub extinction: ExtinctionDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
    pub logo_path: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "./reports".to_string(),
            logo_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtinctionDefaults {
    pub mode: Option<ExtinctionMode>,
    pub preset: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StellarError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(dir) = path.as_ref().parent() {
            config.resolve_logo_path(dir);
        }
        Ok(config)
    }

    /// A relative `report.logo_path` is taken relative to `base` (the config file's folder).
    pub fn resolve_logo_path(&mut self, base: &Path) {
        if let Some(logo) = &self.report.logo_path {
            let logo_path = Path::new(logo);
            if logo_path.is_relative() && !base.as_os_str().is_empty() {
                self.report.logo_path = Some(base.join(logo_path).to_string_lossy().into_owned());
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StellarError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PREDICT_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StellarError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.service
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.endpoint", &self.service.endpoint)?;
        validation::validate_range(
            "service.timeout_seconds",
            self.timeout_seconds(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validation::validate_path("report.output_path", &self.report.output_path)?;
        if let Some(logo) = &self.report.logo_path {
            validation::validate_path("report.logo_path", logo)?;
        }
        if let Some(preset) = &self.extinction.preset {
            validation::validate_non_empty_string("extinction.preset", preset)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn service_endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn logo_path(&self) -> Option<&str> {
        self.report.logo_path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
