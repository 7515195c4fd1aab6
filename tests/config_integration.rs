use chatbot_widget::config::AppConfig;
use chatbot_widget::transport::CredentialProvider;
use chatbot_widget::widget::{DEFAULT_FALLBACK, DEFAULT_GREETING, OverlapPolicy};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::time::Duration;

const ARGV0: &str = "chatbot-widget";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("CONFIG_FILE");
        env::remove_var("CHATBOT_URL");
        env::remove_var("CSRF_TOKEN");
        env::remove_var("CHATBOT_COOKIE");
        env::remove_var("CHATBOT_ENDPOINT__TIMEOUT_SECS");
        env::remove_var("CHATBOT_ENDPOINT__BASE_URL");
        env::remove_var("CHATBOT_WIDGET__OVERLAP");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([ARGV0]).expect("Failed to load defaults");

    assert_eq!(config.endpoint.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.endpoint.path, "/api/chatbot/");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.credentials.token_header, "X-CSRFToken");
    assert_eq!(config.credentials.cookie_name, "csrftoken");
    assert!(config.credentials.token.is_none());
    assert_eq!(config.widget.greeting, DEFAULT_GREETING);
    assert_eq!(config.widget.fallback, DEFAULT_FALLBACK);
    assert_eq!(config.widget.overlap, OverlapPolicy::Reject);
    assert!(config.credential_provider().security_token().is_none());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("CHATBOT_ENDPOINT__TIMEOUT_SECS", "7");
        env::set_var("CHATBOT_WIDGET__OVERLAP", "allow");
    }

    let config = AppConfig::load_from_args([ARGV0]).expect("Failed to load config");
    assert_eq!(config.request_timeout(), Duration::from_secs(7));
    assert_eq!(config.widget.overlap, OverlapPolicy::Allow);
    assert_eq!(config.widget_settings().request_timeout, Duration::from_secs(7));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
endpoint:
  base_url: "http://chat.internal:9000"
  timeout_secs: 12
widget:
  greeting: "Welcome back"
"#
    )
    .expect("Failed to write temp config");

    let path = file.path().to_str().unwrap().to_string();
    let config =
        AppConfig::load_from_args([ARGV0, "--config", path.as_str()]).expect("Failed to load from file");

    assert_eq!(config.endpoint.base_url, "http://chat.internal:9000");
    assert_eq!(config.endpoint.timeout_secs, 12);
    assert_eq!(config.widget.greeting, "Welcome back");
    // Untouched keys keep their defaults.
    assert_eq!(config.endpoint.path, "/api/chatbot/");
}

#[test]
#[serial]
fn test_priority_cli_over_env_over_file() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
endpoint:
  base_url: "http://from-file:1"
  timeout_secs: 1
"#
    )
    .expect("Failed to write temp config");

    unsafe {
        env::set_var("CHATBOT_ENDPOINT__BASE_URL", "http://from-env:2");
        env::set_var("CHATBOT_ENDPOINT__TIMEOUT_SECS", "2");
    }

    let path = file.path().to_str().unwrap().to_string();
    let config = AppConfig::load_from_args([
        ARGV0,
        "--config",
        path.as_str(),
        "--base-url",
        "http://from-cli:3",
    ])
    .expect("Failed to load config");

    assert_eq!(config.endpoint.base_url, "http://from-cli:3");
    assert_eq!(config.endpoint.timeout_secs, 2);

    clear_env_vars();
}

#[test]
#[serial]
fn test_credentials_from_cookie() {
    clear_env_vars();

    let config = AppConfig::load_from_args([
        ARGV0,
        "--cookie",
        "sessionid=abc; csrftoken=cookie-token",
    ])
    .expect("Failed to load config");

    let token = config.credential_provider().security_token().unwrap();
    assert_eq!(token.expose(), "cookie-token");
}

#[test]
#[serial]
fn test_explicit_token_wins_over_cookie() {
    clear_env_vars();
    unsafe {
        env::set_var("CSRF_TOKEN", "from-env");
    }

    let config = AppConfig::load_from_args([ARGV0, "--cookie", "csrftoken=cookie-token"])
        .expect("Failed to load config");

    let token = config.credential_provider().security_token().unwrap();
    assert_eq!(token.expose(), "from-env");

    clear_env_vars();
}

#[test]
#[serial]
fn test_bad_base_url_rejected_by_transport() {
    clear_env_vars();

    let config = AppConfig::load_from_args([ARGV0, "--base-url", "not a url"])
        .expect("Failed to load config");
    assert!(config.transport().is_err());
}

#[test]
#[serial]
fn test_unknown_flag_is_an_error() {
    clear_env_vars();

    assert!(AppConfig::load_from_args([ARGV0, "--no-such-flag"]).is_err());
}

#[test]
#[serial]
fn test_zero_timeout_rejected() {
    clear_env_vars();

    assert!(AppConfig::load_from_args([ARGV0, "--timeout-secs", "0"]).is_err());

    unsafe {
        env::set_var("CHATBOT_ENDPOINT__TIMEOUT_SECS", "0");
    }
    let err = AppConfig::load_from_args([ARGV0]).unwrap_err();
    assert!(err.to_string().contains("timeout_secs"));

    clear_env_vars();
}
