//! Main configuration type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::LOOKUP_NAMES;
use crate::{ConfigError, EndpointConfig, LoggingConfig, PipelineConfig};

/// Complete Argus configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use argus_config::ArgusConfig;
///
/// let config = ArgusConfig::default();
/// assert_eq!(config.pipeline.default_separator, ",");
/// assert!(config.endpoints.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ArgusConfig {
    /// Pipeline behavior.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Declarative parameters, by endpoint name.
    #[serde(default)]
    pub endpoints: IndexMap<String, EndpointConfig>,
}

impl ArgusConfig {
    /// Returns the declarations of the named endpoint.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(name)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default separator is empty
    /// - The body limit is zero
    /// - A parameter has an empty name, an empty separator or an unknown lookup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.default_separator.is_empty() {
            return Err(ConfigError::invalid(
                "pipeline.default_separator",
                "must not be empty",
            ));
        }

        if self.pipeline.max_body_size == 0 {
            return Err(ConfigError::invalid(
                "pipeline.max_body_size",
                "must be greater than zero",
            ));
        }

        for (endpoint, config) in &self.endpoints {
            for (index, param) in config.params.iter().enumerate() {
                let field = format!("endpoints.{endpoint}.params[{index}]");
                if param.name.trim().is_empty() {
                    return Err(ConfigError::invalid(
                        format!("{field}.name"),
                        "must not be empty",
                    ));
                }
                if !LOOKUP_NAMES.contains(&param.lookup.as_str()) {
                    return Err(ConfigError::invalid(
                        format!("{field}.lookup"),
                        format!(
                            "unknown lookup '{}', expected one of: {}",
                            param.lookup,
                            LOOKUP_NAMES.join(", ")
                        ),
                    ));
                }
                if param.separator.as_deref() == Some("") {
                    return Err(ConfigError::invalid(
                        format!("{field}.separator"),
                        "must not be empty",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Development preset: pretty debug logs, strict validator parsing.
    #[must_use]
    pub fn development() -> Self {
        Self {
            pipeline: PipelineConfig {
                strict_validators: true,
                ..PipelineConfig::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: argus_telemetry::LogFormat::Pretty,
                include_location: true,
                ..LoggingConfig::default()
            },
            endpoints: IndexMap::new(),
        }
    }

    /// Production preset: JSON info logs, lenient validator parsing.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamDecl;

    fn with_param(param: ParamDecl) -> ArgusConfig {
        let mut config = ArgusConfig::default();
        config
            .endpoints
            .entry("create_user".to_string())
            .or_default()
            .params
            .push(param);
        config
    }

    #[test]
    fn test_validate_default() {
        assert!(ArgusConfig::default().validate().is_ok());
        assert!(ArgusConfig::development().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_separator() {
        let mut config = ArgusConfig::default();
        config.pipeline.default_separator.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "pipeline.default_separator"
        ));
    }

    #[test]
    fn test_validate_zero_body_limit() {
        let mut config = ArgusConfig::default();
        config.pipeline.max_body_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_lookup() {
        let mut param = ParamDecl::new("age");
        param.lookup = "cookie".into();
        let err = with_param(param).validate().unwrap_err();
        assert!(err.to_string().contains("endpoints.create_user.params[0].lookup"));
        assert!(err.to_string().contains("cookie"));
    }

    #[test]
    fn test_validate_empty_name() {
        assert!(with_param(ParamDecl::new(" ")).validate().is_err());
    }

    #[test]
    fn test_toml_deserialization() {
        let config: ArgusConfig = toml::from_str(
            r#"
            [pipeline]
            default_separator = "|"

            [[endpoints.create_user.params]]
            name = "age"
            type = "int"
            lookup = "body"
            default = 0
            validators = "required|min: 0"

            [[endpoints.create_user.params]]
            name = "nickname"
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.default_separator, "|");
        let endpoint = config.endpoint("create_user").unwrap();
        assert_eq!(endpoint.params.len(), 2);
        assert_eq!(endpoint.params[0].default, Some(serde_json::json!(0)));
        assert_eq!(endpoint.params[1].lookup, "query");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ArgusConfig, _> = toml::from_str(
            r#"
            [pipeline]
            unknown_option = true
            "#,
        );
        assert!(result.is_err());
    }
}
