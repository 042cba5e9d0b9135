use docsum::load_config::load_config;
use docsum_core::config::{BASE_URL_ENV, DEFAULT_BASE_URL};
use docsum_core::contract::SummaryLength;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

#[test]
#[serial]
fn no_file_gives_defaults() {
    env::remove_var(BASE_URL_ENV);
    let config = load_config(None).expect("defaults load");

    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.output_dir, PathBuf::from("."));
    assert_eq!(config.length, SummaryLength::Medium);
}

#[test]
#[serial]
fn file_values_are_used() {
    env::remove_var(BASE_URL_ENV);
    let file = config_file(
        r#"
api:
  base_url: "https://summaries.example.com/"
output_dir: ./tmp/downloads
length: detailed
"#,
    );

    let config = load_config(Some(file.path())).expect("Config should load");
    assert_eq!(config.api.base_url, "https://summaries.example.com");
    assert_eq!(config.output_dir, PathBuf::from("./tmp/downloads"));
    assert_eq!(config.length, SummaryLength::Detailed);
}

#[test]
#[serial]
fn environment_overrides_file() {
    let file = config_file("api:\n  base_url: http://from-file:8000\n");
    env::set_var(BASE_URL_ENV, "http://from-env:9000");

    let config = load_config(Some(file.path()));
    env::remove_var(BASE_URL_ENV);

    assert_eq!(config.unwrap().api.base_url, "http://from-env:9000");
}

#[test]
#[serial]
fn invalid_length_is_an_error() {
    env::remove_var(BASE_URL_ENV);
    let file = config_file("length: tiny\n");

    let err = load_config(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"), "{err}");
}

#[test]
#[serial]
fn missing_file_is_an_error() {
    let err = load_config(Some(PathBuf::from("/nonexistent/docsum.yaml").as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"), "{err}");
}
