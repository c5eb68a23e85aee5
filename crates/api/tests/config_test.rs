use std::collections::HashMap;

use pretty_assertions::assert_eq;
use schooldesk_api::config::ApiConfig;
use tracing::Level;

fn config(vars: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ApiConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config(&[("DATABASE_URL", "postgres://localhost/schooldesk")]).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.periods.periods_per_day(), 8);
}

#[test]
fn test_database_url_is_required() {
    assert!(config(&[]).is_err());
}

#[test]
fn test_overrides() {
    let config = config(&[
        ("DATABASE_URL", "postgres://localhost/schooldesk"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "debug"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://school.example"),
        ("TIMETABLE_PERIOD_TIMES", "07:30-08:20,08:20-09:10,09:10-10:00"),
    ])
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://school.example".to_string()
        ])
    );
    assert_eq!(config.timetable_config().periods.periods_per_day(), 3);
}

#[test]
fn test_malformed_period_times_are_rejected() {
    let result = config(&[
        ("DATABASE_URL", "postgres://localhost/schooldesk"),
        ("TIMETABLE_PERIOD_TIMES", "morning"),
    ]);

    assert!(result.is_err());
}
