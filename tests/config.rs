use std::time::Duration;

use assert_matches::assert_matches;

use pokeapi_etl::config::{Config, ConfigLoader, DEFAULT_BASE_URL, ResolvedConfig};
use pokeapi_etl::error::EtlError;

#[test]
fn loads_partial_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("etl.json");
    std::fs::write(&path, r#"{ "count": 12, "data_dir": "out/data", "timeout_secs": 3 }"#).unwrap();

    let config = ConfigLoader::load(path.to_str()).unwrap();
    let resolved = ConfigLoader::resolve_config(config, None).unwrap();
    assert_eq!(resolved.count, 12);
    assert_eq!(resolved.data_dir.as_str(), "out/data");
    assert_eq!(resolved.timeout, Duration::from_secs(3));
    assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
    assert_eq!(resolved.reports_dir, ResolvedConfig::default().reports_dir);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    assert_matches!(ConfigLoader::load(path.to_str()), Err(EtlError::ConfigRead(_)));
}

#[test]
fn malformed_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("etl.json");
    std::fs::write(&path, "{ count: ").unwrap();
    assert_matches!(ConfigLoader::load(path.to_str()), Err(EtlError::ConfigParse(_)));
}

#[test]
fn rejects_non_http_base_url() {
    let config = Config {
        base_url: Some("ftp://catalog.test".to_string()),
        ..Config::default()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config, None),
        Err(EtlError::InvalidConfig(_))
    );
}

#[test]
fn rejects_zero_timeout() {
    let config = Config {
        timeout_secs: Some(0),
        ..Config::default()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config, None),
        Err(EtlError::InvalidConfig(_))
    );
}

#[test]
fn env_base_url_wins() {
    let resolved =
        ConfigLoader::resolve_config(Config::default(), Some("http://localhost:8000/api/v2/".to_string()))
            .unwrap();
    assert_eq!(resolved.base_url, "http://localhost:8000/api/v2");
}
