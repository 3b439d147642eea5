use super::schema::ScenarioConfig;
use super::validate::{format_report, validate};
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

impl ScenarioConfig {
    /// Read, parse and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if !is_toml {
            return Err(ConfigError::UnsupportedExtension(path.display().to_string()));
        }

        let contents = fs::read_to_string(path)?;
        let origin = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let config = Self::from_toml_str(&contents, &origin)?;
        tracing::debug!(
            path = %path.display(),
            hash = %config.content_hash(),
            "loaded scenario"
        );
        Ok(config)
    }

    /// Parse and validate scenario text. `origin` names the source in error
    /// messages.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        let issues = validate(&config);
        if !issues.is_empty() {
            return Err(ConfigError::Validation(format_report(origin, &issues)));
        }
        Ok(config)
    }
}
