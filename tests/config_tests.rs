//! Configuration loading tests

use taskboard::config::{LogFormat, VerifyMethod, load_config_from_str};

const MINIMAL_CONFIG: &str = r#"
[api]
url = "https://tasks.example.com"
"#;

const FULL_CONFIG: &str = r#"
[api]
url = "https://tasks.example.com/"
timeout_secs = 10
max_retries = 5
verify_ssl = false

[auth]
verify_path = "/auth/verify"
verify_method = "get"

[storage]
session_path = "/tmp/taskboard-test/session.json"
assignments_path = "/tmp/taskboard-test/assignments.json"

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.api.url, "https://tasks.example.com");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.api.max_retries, 3);
    assert!(config.api.verify_ssl);

    assert_eq!(config.auth.verify_path, "/user/auth/check_token");
    assert_eq!(config.auth.verify_method, VerifyMethod::Post);

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);

    assert!(config.storage.session_file().ends_with("taskboard/session.json"));
    assert!(
        config
            .storage
            .assignments_file()
            .ends_with("taskboard/assignments.json")
    );
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    // API
    assert_eq!(config.api.base_url(), "https://tasks.example.com");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.api.max_retries, 5);
    assert!(!config.api.verify_ssl);

    // Auth
    assert_eq!(config.auth.verify_path, "/auth/verify");
    assert_eq!(config.auth.verify_method, VerifyMethod::Get);

    // Storage
    assert_eq!(
        config.storage.session_file().to_str(),
        Some("/tmp/taskboard-test/session.json")
    );
    assert_eq!(
        config.storage.assignments_file().to_str(),
        Some("/tmp/taskboard-test/assignments.json")
    );

    // Logging
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.api.url, "http://localhost:3000");
}

#[test]
fn test_unknown_verify_method_rejected() {
    let config_str = r#"
[auth]
verify_method = "patch"
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
fn test_ftp_url_rejected() {
    let config_str = r#"
[api]
url = "ftp://tasks.example.com"
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    use taskboard::config::load_config;

    let result = load_config(Some("/nonexistent/taskboard.toml"));
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_env_var_priority_prefixed_over_api_url() {
    use std::env;
    use std::fs;
    use taskboard::config::load_config;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("test-config.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    // Set both TASKBOARD__API__URL and API_URL
    unsafe {
        env::set_var("TASKBOARD__API__URL", "https://prefixed.example.com");
        env::set_var("API_URL", "https://fallback.example.com");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    // TASKBOARD__API__URL should take precedence
    assert_eq!(config.api.url, "https://prefixed.example.com");

    // Cleanup
    unsafe {
        env::remove_var("TASKBOARD__API__URL");
        env::remove_var("API_URL");
    }
}

#[test]
#[serial_test::serial]
fn test_env_var_api_url_fallback() {
    use std::env;
    use std::fs;
    use taskboard::config::load_config;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("test-config.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    // Only API_URL
    unsafe {
        env::remove_var("TASKBOARD__API__URL");
        env::set_var("API_URL", "https://fallback.example.com");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    // API_URL overrides the file
    assert_eq!(config.api.url, "https://fallback.example.com");

    // Cleanup
    unsafe {
        env::remove_var("API_URL");
    }
}

#[test]
#[serial_test::serial]
fn test_env_var_nested_keys() {
    use std::env;
    use std::fs;
    use taskboard::config::load_config;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("test-config.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::remove_var("API_URL");
        env::set_var("TASKBOARD__AUTH__VERIFY_METHOD", "get");
        env::set_var("TASKBOARD__API__MAX_RETRIES", "0");
    }

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(config.api.url, "https://tasks.example.com");
    assert_eq!(config.auth.verify_method, VerifyMethod::Get);
    assert_eq!(config.api.max_retries, 0);

    // Cleanup
    unsafe {
        env::remove_var("TASKBOARD__AUTH__VERIFY_METHOD");
        env::remove_var("TASKBOARD__API__MAX_RETRIES");
    }
}
