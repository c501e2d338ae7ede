//! Loading configuration files from disk.

use argus_config::{ConfigError, ConfigLoader, LogFormat};
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_toml_file_with_endpoints() {
    let file = temp_file(
        ".toml",
        r#"
        [pipeline]
        default_separator = "|"

        [logging]
        level = "warn"
        format = "pretty"

        [[endpoints.list_posts.params]]
        name = "tags"
        many = true
        validators = "in: rust, go"

        [[endpoints.list_posts.params]]
        name = "page"
        type = "int"
        default = 1
        "#,
    );

    let config = ConfigLoader::new()
        .with_defaults()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.pipeline.default_separator, "|");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    let params = &config.endpoint("list_posts").unwrap().params;
    assert_eq!(params.len(), 2);
    assert!(params[0].many);
    assert_eq!(params[1].kind, "int");
}

#[test]
fn loads_json_file() {
    let file = temp_file(".json", r#"{"pipeline": {"max_body_size": 4096}}"#);

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.pipeline.max_body_size, 4096);
}

#[test]
fn rejects_unsupported_extension() {
    let file = temp_file(".yaml", "pipeline: {}");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
}

#[test]
fn rejects_invalid_toml() {
    let file = temp_file(".toml", "[pipeline\nmax_body_size = ");

    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn rejects_unknown_lookup_on_load() {
    let file = temp_file(
        ".toml",
        r#"
        [[endpoints.login.params]]
        name = "session"
        lookup = "cookie"
        "#,
    );

    let result = ConfigLoader::new().with_file(file.path()).unwrap().load();
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
