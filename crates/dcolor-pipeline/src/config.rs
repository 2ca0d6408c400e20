//! Pipeline construction settings.
//!
//! Settings can come from code, the environment or a YAML file:
//!
//! ```yaml
//! tonemapping: true
//! max_added_headroom: 1.5
//! tonemap_threshold: 1.01
//! ```
//!
//! Missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable that turns tone mapping off when set to a true value.
pub const DISABLE_TONEMAPPING_ENV: &str = "DCOLOR_DISABLE_TONEMAPPING";

/// Settings for [`ColorPipeline::create_with_config`](crate::ColorPipeline::create_with_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Insert a tone mapper when the source is brighter than the target.
    pub tonemapping: bool,
    /// Upper limit of how much the reference luminance may be dimmed to
    /// make room for highlights.
    pub max_added_headroom: f32,
    /// Tone mapping kicks in when the source peak exceeds the target peak
    /// by more than this factor.
    pub tonemap_threshold: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tonemapping: true,
            max_added_headroom: 1.5,
            tonemap_threshold: 1.01,
        }
    }
}

impl PipelineConfig {
    /// Defaults, with [`DISABLE_TONEMAPPING_ENV`] applied.
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup(DISABLE_TONEMAPPING_ENV).is_some_and(|v| is_truthy(&v)) {
            self.tonemapping = false;
        }
        self
    }

    /// Parses settings from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("max_added_headroom", self.max_added_headroom),
            ("tonemap_threshold", self.tonemap_threshold),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = PipelineConfig::default();
        assert!(c.tonemapping);
        assert_eq!(c.max_added_headroom, 1.5);
        assert_eq!(c.tonemap_threshold, 1.01);
    }

    #[test]
    fn test_env_override() {
        let env = |value: &'static str| move |key: &str| (key == DISABLE_TONEMAPPING_ENV).then(|| value.to_string());
        assert!(!PipelineConfig::default().with_env(env("1")).tonemapping);
        assert!(!PipelineConfig::default().with_env(env("TRUE")).tonemapping);
        assert!(PipelineConfig::default().with_env(env("0")).tonemapping);
        assert!(PipelineConfig::default().with_env(|_| None).tonemapping);
    }

    #[test]
    fn test_yaml_partial() {
        let c = PipelineConfig::from_yaml_str("tonemapping: false\n").unwrap();
        assert!(!c.tonemapping);
        assert_eq!(c.max_added_headroom, 1.5);
    }

    #[test]
    fn test_yaml_invalid_value() {
        let err = PipelineConfig::from_yaml_str("max_added_headroom: 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "max_added_headroom", .. }));
        assert!(matches!(
            PipelineConfig::from_yaml_str("tonemapping: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_added_headroom: 2.0\ntonemap_threshold: 1.1").unwrap();
        let c = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(c.max_added_headroom, 2.0);
        assert_eq!(c.tonemap_threshold, 1.1);
        assert!(c.tonemapping);

        let yaml = c.to_yaml_string().unwrap();
        assert_eq!(PipelineConfig::from_yaml_str(&yaml).unwrap(), c);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
