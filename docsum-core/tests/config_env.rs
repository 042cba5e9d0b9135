use docsum_core::config::{ApiConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn env_overrides_default_base_url() {
    env::set_var(BASE_URL_ENV, "https://summaries.example.com/");
    let config = ApiConfig::from_env();
    env::remove_var(BASE_URL_ENV);

    assert_eq!(config.base_url, "https://summaries.example.com");
    assert_eq!(config.endpoint("summarize"), "https://summaries.example.com/summarize");
}

#[test]
#[serial]
fn unset_or_blank_env_uses_default() {
    env::remove_var(BASE_URL_ENV);
    assert_eq!(ApiConfig::from_env().base_url, DEFAULT_BASE_URL);

    env::set_var(BASE_URL_ENV, "   ");
    assert_eq!(ApiConfig::from_env().base_url, DEFAULT_BASE_URL);
    env::remove_var(BASE_URL_ENV);
}

#[test]
#[serial]
fn env_override_keeps_configured_url_when_unset() {
    env::remove_var(BASE_URL_ENV);
    let configured = ApiConfig::new("http://files.internal:9000");
    assert_eq!(configured.clone().with_env_override(), configured);

    env::set_var(BASE_URL_ENV, "http://from-env:8000");
    let config = ApiConfig::new("http://files.internal:9000").with_env_override();
    env::remove_var(BASE_URL_ENV);
    assert_eq!(config.base_url, "http://from-env:8000");
}
