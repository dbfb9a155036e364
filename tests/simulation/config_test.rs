/*!
 * Configuration Tests
 * JSON file loading and OSVIZ_* environment overrides
 */

use osviz_kernel::simulation::config::{ENV_ALGORITHM, ENV_CONFIG, ENV_QUANTUM, ENV_STRATEGY, ENV_TICK_MS};
use osviz_kernel::{Algorithm, SimError, SimulationConfig, Strategy};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [ENV_CONFIG, ENV_ALGORITHM, ENV_QUANTUM, ENV_STRATEGY, ENV_TICK_MS] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var(ENV_ALGORITHM, "srtf");
    std::env::set_var(ENV_QUANTUM, "3");
    std::env::set_var(ENV_STRATEGY, "avoidance");

    let config = SimulationConfig::from_env().unwrap();
    assert_eq!(config.algorithm, Algorithm::Srtf);
    assert_eq!(config.quantum, 3);
    assert_eq!(config.strategy, Strategy::Avoidance);
    assert_eq!(config.tick_interval_ms, 500);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_value_is_a_configuration_error() {
    clear_env();
    std::env::set_var(ENV_QUANTUM, "four");
    assert!(matches!(
        SimulationConfig::from_env(),
        Err(SimError::Configuration(_))
    ));

    clear_env();
    std::env::set_var(ENV_ALGORITHM, "lottery");
    let err = SimulationConfig::from_env().unwrap_err();
    assert!(err.to_string().contains(ENV_ALGORITHM));

    clear_env();
}

#[test]
#[serial]
fn test_load_reads_file_then_env() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"algorithm":"rr","quantum":2,"tick_interval_ms":50}}"#).unwrap();

    std::env::set_var(ENV_CONFIG, file.path());
    std::env::set_var(ENV_QUANTUM, "6");

    let config = SimulationConfig::load().unwrap();
    assert_eq!(config.algorithm, Algorithm::RoundRobin);
    assert_eq!(config.quantum, 6);
    assert_eq!(config.tick_interval_ms, 50);

    clear_env();
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimulationConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn test_invalid_file_contents() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"quantum":0}}"#).unwrap();
    assert!(matches!(
        SimulationConfig::from_json_file(file.path()),
        Err(SimError::Configuration(_))
    ));

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(matches!(
        SimulationConfig::from_json_file(file.path()),
        Err(SimError::Configuration(_))
    ));
}
