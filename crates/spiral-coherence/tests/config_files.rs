mod common;

use std::io::Write;
use std::sync::Arc;

use common::{point_on, Paraboloid};
use spiral_coherence::{CoherenceError, CoherenceOptimizer, ConfigError, OptimizerConfig};

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn toml_file_drives_the_optimiser() {
    let file = write_temp(
        ".toml",
        r#"
        [weights]
        alpha = 0.0
        beta = 0.0
        eta = 0.0

        [stride]
        multipliers = [1.0, 2.0]

        [checkpoint]
        risk_threshold = 0.5
        "#,
    );
    let config = OptimizerConfig::from_path(file.path()).unwrap();
    assert_eq!(config.stride.multipliers, vec![1.0, 2.0]);
    assert_eq!(config.weights.gamma, 1.0);

    let mut optimizer = CoherenceOptimizer::new(config).unwrap();
    let record = optimizer
        .step(&point_on(Arc::new(Paraboloid::centred(1)), vec![2.0]))
        .unwrap();
    // Candidates 0.1 and 0.2 land on 1.6 and 1.2; the second wins with risk 1.44.
    assert!((record.stride - 0.2).abs() < 1e-12);
    assert_eq!(optimizer.checkpoints().len(), 1);
}

#[test]
fn json_file_is_detected_by_extension() {
    let file = write_temp(".json", r#"{ "lift": { "lambda": 0.25 } }"#);
    let config = OptimizerConfig::from_path(file.path()).unwrap();
    assert_eq!(config.lift.lambda, 0.25);
    assert_eq!(config.stall, Default::default());
}

#[test]
fn malformed_files_report_the_parser() {
    let toml = write_temp(".toml", "[stall\nwindow = 3");
    assert!(matches!(
        OptimizerConfig::from_path(toml.path()),
        Err(ConfigError::Toml(_))
    ));

    let json = write_temp(".json", "{ not json");
    assert!(matches!(
        OptimizerConfig::from_path(json.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn invalid_values_surface_through_the_optimiser() {
    let mut config = OptimizerConfig::default();
    config.stride.cap = -1.0;
    assert!(matches!(
        CoherenceOptimizer::new(config),
        Err(CoherenceError::Config(ConfigError::Invalid {
            field: "stride.cap",
            ..
        }))
    ));
}
