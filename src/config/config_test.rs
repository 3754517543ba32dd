use super::*;
use std::collections::HashMap;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let config = AppConfig::from_vars(|_| None).unwrap();
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_HTTP_PORT);
    assert!(config.client_id.is_none());
    assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
    assert_eq!(config.sheets_base_url, SHEETS_API_BASE);
    assert_eq!(config.airtable_base_url, AIRTABLE_API_BASE);
}

#[test]
fn reads_all_variables() {
    let config = AppConfig::from_vars(vars(&[
        (ENV_HOST, "0.0.0.0"),
        (ENV_PORT, "8080"),
        (ENV_CLIENT_ID, "client-1"),
        (ENV_CLIENT_SECRET, "secret-1"),
        (ENV_SPREADSHEET_ID, "sheet-1"),
        (ENV_TOKEN_URL, "http://localhost:1/token"),
        (ENV_SHEETS_BASE_URL, "http://localhost:2"),
        (ENV_GMAIL_BASE_URL, "http://localhost:3"),
        (ENV_AIRTABLE_BASE_URL, "http://localhost:4/v0"),
    ]))
    .unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.client_id.as_deref(), Some("client-1"));
    assert_eq!(config.client_secret.as_deref(), Some("secret-1"));
    assert_eq!(config.spreadsheet_id.as_deref(), Some("sheet-1"));
    assert_eq!(config.token_url, "http://localhost:1/token");
    assert_eq!(config.sheets_base_url, "http://localhost:2");
    assert_eq!(config.gmail_base_url, "http://localhost:3");
    assert_eq!(config.airtable_base_url, "http://localhost:4/v0");
}

#[test]
fn invalid_port_is_a_config_error() {
    let result = AppConfig::from_vars(vars(&[(ENV_PORT, "not-a-port")]));
    assert!(matches!(result, Err(EzyrError::Config(_))));
}

#[test]
fn empty_values_fall_back_to_defaults() {
    let config = AppConfig::from_vars(vars(&[(ENV_HOST, "  "), (ENV_CLIENT_ID, "")])).unwrap();
    assert_eq!(config.host, DEFAULT_HOST);
    assert!(config.client_id.is_none());
}
