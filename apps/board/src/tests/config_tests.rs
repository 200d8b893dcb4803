use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = layered_settings(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_url, DEFAULT_ENDPOINT);
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        api_url = "http://localhost:9000/board"
        database_url = "sqlite://./tmp/prefs.db"
        request_timeout_seconds = 5
    "#;
    let settings = layered_settings(Some(raw), env_from(&[])).expect("settings");
    assert_eq!(settings.api_url, "http://localhost:9000/board");
    assert_eq!(settings.database_url, "sqlite://./tmp/prefs.db");
    assert_eq!(settings.request_timeout_seconds, 5);
}

#[test]
fn environment_overrides_file_and_app_prefix_wins() {
    let raw = r#"api_url = "http://file.test/board""#;
    let settings = layered_settings(
        Some(raw),
        env_from(&[
            ("BOARD_API_URL", "http://env.test/board"),
            ("DATABASE_URL", "sqlite://./env.db"),
            ("APP__DATABASE_URL", "sqlite://./app.db"),
            ("APP__REQUEST_TIMEOUT_SECONDS", "12"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_url, "http://env.test/board");
    assert_eq!(settings.database_url, "sqlite://./app.db");
    assert_eq!(settings.request_timeout_seconds, 12);
}

#[test]
fn unparsable_timeout_env_is_ignored() {
    let settings = layered_settings(
        None,
        env_from(&[("APP__REQUEST_TIMEOUT_SECONDS", "soon")]),
    )
    .expect("settings");
    assert_eq!(settings.request_timeout_seconds, 30);
}

#[test]
fn malformed_file_is_an_error() {
    assert!(layered_settings(Some("request_timeout_seconds = \"x\""), env_from(&[])).is_err());
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("board_config_test_missing.toml");
    let settings = load_settings(Some(&path)).expect("settings");
    assert_eq!(settings.request_timeout_seconds, Settings::default().request_timeout_seconds);
}

#[test]
fn api_url_must_be_http() {
    assert_eq!(
        validate_api_url(DEFAULT_ENDPOINT).expect("valid"),
        DEFAULT_ENDPOINT
    );
    assert!(validate_api_url("ftp://example.test/board").is_err());
    assert!(validate_api_url("not a url").is_err());
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\board.db"),
        "sqlite://C:/Users/alice/board.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("  "), Settings::default().database_url);
}

#[test]
fn keeps_urls_that_already_name_a_scheme() {
    assert_eq!(
        normalize_database_url(" sqlite://./data/board.db "),
        "sqlite://./data/board.db"
    );
    assert_eq!(normalize_database_url("sqlite:board.db"), "sqlite://board.db");
}
