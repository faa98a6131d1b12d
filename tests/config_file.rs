use std::io::Write;
use tempfile::NamedTempFile;
use tempora::{Config, SequenceBuilder, TemporaError, Timestamp};

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_json_file_roundtrip() {
    let config = Config::default().with_epsilon(1e-7).with_max_instants(64);
    let file = write_config(".json", &config.to_json().unwrap());

    let loaded = Config::from_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let file = write_config(".json", r#"{ "normalize": false }"#);
    let loaded = Config::from_file(file.path()).unwrap();
    assert!(!loaded.normalize);
    assert_eq!(loaded.epsilon, Config::default().epsilon);
}

#[test]
fn test_rejected_files() {
    let unknown = write_config(".json", r#"{ "tolerance": 1.0 }"#);
    assert!(Config::from_file(unknown.path()).is_err());

    let invalid = write_config(".json", r#"{ "epsilon": -1.0 }"#);
    assert!(Config::from_file(invalid.path()).is_err());

    let missing = Config::from_file("/nonexistent/tempora.json").unwrap_err();
    assert!(matches!(missing, TemporaError::Config(_)));
}

#[cfg(feature = "toml")]
#[test]
fn test_toml_file() {
    let file = write_config(".toml", "epsilon = 0.001\nnormalize = true\n");
    let loaded = Config::from_file(file.path()).unwrap();
    assert_eq!(loaded.epsilon, 0.001);
}

#[cfg(not(feature = "toml"))]
#[test]
fn test_toml_file_needs_feature() {
    let file = write_config(".toml", "epsilon = 0.001\n");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, TemporaError::Config(_)));
}

// The only test in this binary that touches the process-wide configuration
#[test]
fn test_init_applies_once() {
    let _ = env_logger::builder().is_test(true).try_init();

    let file = write_config(".json", r#"{ "normalize": false, "max_instants": 3 }"#);
    tempora::init(Config::from_file(file.path()).unwrap()).unwrap();
    assert!(tempora::init(Config::default()).is_err());

    let t = Timestamp::from_secs;
    let seq = SequenceBuilder::new()
        .instant(1.0, t(0))
        .instant(2.0, t(1))
        .instant(3.0, t(2))
        .build()
        .unwrap();
    assert_eq!(seq.num_instants(), 3);

    let too_long = SequenceBuilder::new()
        .instants((0..4).map(|i| tempora::TInstant::new(i as f64, t(i))))
        .build();
    assert!(matches!(too_long, Err(TemporaError::InvalidArgument(_))));
}
