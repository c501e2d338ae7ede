//! Configuration section types.

use argus_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Lookup names accepted in parameter declarations.
pub const LOOKUP_NAMES: &[&str] = &["query", "body", "file", "header", "body_or_query", "route"];

/// Pipeline behavior shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Separator used to split `many` parameters that set none.
    #[serde(default = "default_separator")]
    pub default_separator: String,

    /// Reject unknown validator names instead of skipping them.
    #[serde(default)]
    pub strict_validators: bool,

    /// Largest raw body, in bytes, the body lookup will parse.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_separator: default_separator(),
            strict_validators: false,
            max_body_size: default_max_body_size(),
        }
    }
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's logging setup.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            include_location: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parameter declarations of one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// One declared parameter.
///
/// ```toml
/// [[endpoints.list_posts.params]]
/// name = "tags"
/// type = "str"
/// many = true
/// separator = "|"
/// validators = "in: rust, go"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    /// Source key.
    pub name: String,

    /// Output key; defaults to `name`.
    #[serde(default)]
    pub related_name: Option<String>,

    /// Name used in messages; defaults to `name`.
    #[serde(default)]
    pub verbose_name: Option<String>,

    /// Converter alias.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Lookup strategy name, one of [`LOOKUP_NAMES`].
    #[serde(default = "default_lookup")]
    pub lookup: String,

    /// Value used when the source has none.
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Whether the value is a list.
    #[serde(default)]
    pub many: bool,

    /// Separator for `many`; defaults to the pipeline's.
    #[serde(default)]
    pub separator: Option<String>,

    /// Validator clause string, e.g. `required|in: a, b`.
    #[serde(default)]
    pub validators: Option<String>,
}

impl ParamDecl {
    /// Creates a string query parameter declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            related_name: None,
            verbose_name: None,
            kind: default_kind(),
            lookup: default_lookup(),
            default: None,
            many: false,
            separator: None,
            validators: None,
        }
    }
}

fn default_kind() -> String {
    "string".to_string()
}

fn default_lookup() -> String {
    "query".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.default_separator, ",");
        assert!(!config.strict_validators);
        assert_eq!(config.max_body_size, 1_048_576);
    }

    #[test]
    fn test_logging_to_log_config() {
        let logging = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Pretty,
            include_location: true,
            ..LoggingConfig::default()
        };
        let log = logging.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(log.include_location);
    }

    #[test]
    fn test_param_decl_defaults() {
        let decl: ParamDecl = toml::from_str(r#"name = "page""#).unwrap();
        assert_eq!(decl, ParamDecl::new("page"));
        assert_eq!(decl.kind, "string");
        assert_eq!(decl.lookup, "query");
    }

    #[test]
    fn test_param_decl_full() {
        let decl: ParamDecl = toml::from_str(
            r#"
            name = "tags"
            related_name = "tag_list"
            verbose_name = "Tags"
            type = "int"
            lookup = "body"
            default = [1]
            many = true
            separator = "|"
            validators = "required"
            "#,
        )
        .unwrap();

        assert_eq!(decl.kind, "int");
        assert_eq!(decl.default, Some(serde_json::json!([1])));
        assert_eq!(decl.separator.as_deref(), Some("|"));
    }

    #[test]
    fn test_param_decl_rejects_unknown_field() {
        let result: Result<ParamDecl, _> = toml::from_str(
            r#"
            name = "a"
            source = "query"
            "#,
        );
        assert!(result.is_err());
    }
}
