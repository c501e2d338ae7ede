//! Layered configuration loading.
//!
//! Each layer replaces what came before it: built-in defaults, then a TOML or
//! JSON document, then `PREFIX__SECTION__KEY` environment variables.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use argus_telemetry::LogFormat;

use crate::{ArgusConfig, ConfigError};

/// Builds an [`ArgusConfig`] from defaults, a document and the environment.
///
/// ```no_run
/// use argus_config::ConfigLoader;
///
/// # fn main() -> Result<(), argus_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()?
///     .with_file("argus.toml")?
///     .with_env_prefix("ARGUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: ArgusConfig,
    env_prefix: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn named(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                format: name.to_string(),
            }),
        }
    }

    fn of(path: &Path) -> Result<Self, ConfigError> {
        Self::named(path.extension().and_then(|e| e.to_str()).unwrap_or(""))
    }

    fn parse(self, content: &str) -> Result<ArgusConfig, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        })
    }
}

impl ConfigLoader {
    /// A loader seeded with [`ArgusConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = ArgusConfig::default();
        self
    }

    /// Resets to the development preset.
    ///
    /// ```
    /// use argus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert!(config.pipeline.strict_validators);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ArgusConfig::development();
        self
    }

    /// Replaces the configuration with the contents of a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] for a missing file, [`ConfigError::Read`] for
    /// an unreadable one, [`ConfigError::UnsupportedFormat`] for any other
    /// extension, or a parse error.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.into() }
            } else {
                ConfigError::Read {
                    path: path.into(),
                    source,
                }
            }
        })?;
        self.config = format.parse(&content)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Any error of `with_file` other than [`ConfigError::NotFound`].
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with a document given inline.
    ///
    /// ```
    /// use argus_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[pipeline]\ndefault_separator = \";\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert_eq!(config.pipeline.default_separator, ";");
    /// ```
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnsupportedFormat`] unless `format` is `toml` or `json`,
    /// or a parse error.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = Format::named(format)?.parse(content)?;
        Ok(self)
    }

    /// Reads `PREFIX__SECTION__KEY` overrides during [`load`](Self::load).
    ///
    /// With prefix `ARGUS`, `ARGUS__PIPELINE__DEFAULT_SEPARATOR=;` changes the
    /// default separator.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_ascii_uppercase());
        self
    }

    /// Loads a `.env` file into the process environment when one exists.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Dotenv`] if the file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Err(e) if !e.not_found() => Err(e.into()),
            _ => Ok(self),
        }
    }

    /// Applies environment overrides, validates, and returns the result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Env`] for an unparsable override, or the error of
    /// [`ArgusConfig::validate`].
    pub fn load(mut self) -> Result<ArgusConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let mut vars: Vec<(String, String)> = env::vars()
                .filter(|(name, _)| name.starts_with(&prefix))
                .collect();
            vars.sort();
            for (name, value) in &vars {
                self.apply_env_var(name, value, &prefix)?;
            }
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration as layered so far, skipping the environment
    /// and validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ArgusConfig {
        self.config
    }

    fn apply_env_var(&mut self, name: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(path) = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix("__"))
        else {
            return Ok(());
        };

        let pipeline = &mut self.config.pipeline;
        let logging = &mut self.config.logging;
        match path.split_once("__") {
            Some(("PIPELINE", "DEFAULT_SEPARATOR")) => pipeline.default_separator = value.into(),
            Some(("PIPELINE", "STRICT_VALIDATORS")) => {
                pipeline.strict_validators = flag(name, value)?;
            }
            Some(("PIPELINE", "MAX_BODY_SIZE")) => {
                pipeline.max_body_size = value
                    .parse()
                    .map_err(|_| ConfigError::env(name, "expected a byte count"))?;
            }
            Some(("LOGGING", "ENABLED")) => logging.enabled = flag(name, value)?,
            Some(("LOGGING", "LEVEL")) => logging.level = value.into(),
            Some(("LOGGING", "FORMAT")) => {
                logging.format = if value.eq_ignore_ascii_case("json") {
                    LogFormat::Json
                } else if value.eq_ignore_ascii_case("pretty") {
                    LogFormat::Pretty
                } else {
                    return Err(ConfigError::env(name, "expected json or pretty"));
                };
            }
            Some(("LOGGING", "INCLUDE_LOCATION")) => logging.include_location = flag(name, value)?,
            _ => {}
        }
        Ok(())
    }
}

fn flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env(name, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overridden(vars: &[(&str, &str)]) -> Result<ArgusConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        for (name, value) in vars {
            loader.apply_env_var(name, value, "T")?;
        }
        Ok(loader.config)
    }

    #[test]
    fn test_defaults_load() {
        let config = ConfigLoader::new().with_defaults().load().unwrap();
        assert_eq!(config, ArgusConfig::default());
    }

    #[test]
    fn test_development_preset() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_inline_json() {
        let json = r#"{
            "pipeline": {"strict_validators": true},
            "endpoints": {"search": {"params": [{"name": "q", "validators": "required"}]}}
        }"#;
        let config = ConfigLoader::new()
            .with_string(json, "JSON")
            .unwrap()
            .load()
            .unwrap();

        assert!(config.pipeline.strict_validators);
        assert_eq!(config.endpoint("search").unwrap().params[0].name, "q");
    }

    #[test]
    fn test_unsupported_inline_format() {
        let err = ConfigLoader::new().with_string("a: 1", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { format } if format == "yaml"));
    }

    #[test]
    fn test_load_runs_validation() {
        let result = ConfigLoader::new()
            .with_string("[pipeline]\nmax_body_size = 0", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_files() {
        let result = ConfigLoader::new().with_file("/nonexistent/argus.toml");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));

        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/argus.toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.pipeline.default_separator, ",");
    }

    #[test]
    fn test_flag_spellings() {
        assert!(flag("X", "ON").unwrap());
        assert!(flag("X", "1").unwrap());
        assert!(!flag("X", "off").unwrap());
        assert!(!flag("X", "No").unwrap());
        assert!(matches!(flag("X", "maybe"), Err(ConfigError::Env { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let config = overridden(&[
            ("T__PIPELINE__DEFAULT_SEPARATOR", ";"),
            ("T__PIPELINE__STRICT_VALIDATORS", "yes"),
            ("T__PIPELINE__MAX_BODY_SIZE", "2048"),
            ("T__LOGGING__LEVEL", "trace"),
            ("T__LOGGING__FORMAT", "Pretty"),
            ("T__LOGGING__ENABLED", "false"),
            ("T__LOGGING__INCLUDE_LOCATION", "true"),
        ])
        .unwrap();

        assert_eq!(config.pipeline.default_separator, ";");
        assert!(config.pipeline.strict_validators);
        assert_eq!(config.pipeline.max_body_size, 2048);
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.logging.enabled);
        assert!(config.logging.include_location);
    }

    #[test]
    fn test_bad_env_values() {
        for (name, value) in [
            ("T__PIPELINE__MAX_BODY_SIZE", "lots"),
            ("T__LOGGING__FORMAT", "xml"),
            ("T__PIPELINE__STRICT_VALIDATORS", "maybe"),
        ] {
            assert!(matches!(
                overridden(&[(name, value)]),
                Err(ConfigError::Env { .. })
            ));
        }
    }

    #[test]
    fn test_unrelated_env_ignored() {
        let config = overridden(&[("TESTING", "1"), ("T__UNKNOWN__KEY", "1")]).unwrap();
        assert_eq!(config, ArgusConfig::default());
    }
}
