//! Error handling and validation tests.

use region_eval::config::{load_nms_config_from_file, load_nms_config_from_str};
use region_eval::error::RegionEvalError;
use region_eval::metrics::MultiClassConfusionMatrix;
use region_eval::nms::NmsConfig;
use std::io::Write;

fn create_matrix() -> MultiClassConfusionMatrix {
    let mut matrix = MultiClassConfusionMatrix::new(["person", "car", "bicycle"]).unwrap();
    matrix.set_count("person", "person", 4).unwrap();
    matrix.set_count("car", "person", 1).unwrap();
    matrix.increment("bicycle", "car").unwrap();
    matrix
}

// ============================================================================
// LABEL ERROR TESTS
// ============================================================================

#[test]
fn test_increment_unknown_actual_label() {
    let mut matrix = create_matrix();
    let before = matrix.clone();

    let result = matrix.increment("truck", "car");
    match result {
        Err(RegionEvalError::InvalidLabel(label)) => assert_eq!(label, "truck"),
        other => panic!("Expected InvalidLabel error, got {:?}", other),
    }
    assert_eq!(matrix, before, "Matrix must be unchanged after a failed increment");
}

#[test]
fn test_increment_unknown_predicted_label() {
    let mut matrix = create_matrix();
    let before = matrix.clone();

    let result = matrix.increment("car", "truck");
    assert!(matches!(result, Err(RegionEvalError::InvalidLabel(ref label)) if label == "truck"));
    assert_eq!(matrix, before);
}

#[test]
fn test_set_count_unknown_label() {
    let mut matrix = create_matrix();
    let before = matrix.clone();

    assert!(matrix.set_count("person", "Person", 10).is_err());
    assert!(matrix.set_count("", "person", 10).is_err());
    assert_eq!(matrix, before);
}

#[test]
fn test_per_class_reads_unknown_label() {
    let matrix = create_matrix();

    assert!(matrix.true_positives("truck").is_err());
    assert!(matrix.true_negatives("truck").is_err());
    assert!(matrix.false_positives("truck").is_err());
    assert!(matrix.false_negatives("truck").is_err());
    assert!(matrix.support("truck").is_err());
    assert!(matrix.precision("truck").is_err());
    assert!(matrix.recall("truck").is_err());
    assert!(matrix.f1_score("truck").is_err());
    assert!(matrix.accuracy("truck").is_err());
    assert!(matrix.class_matrix("truck").is_err());
}

#[test]
fn test_error_message_names_label() {
    let mut matrix = create_matrix();
    let err = matrix.increment("truck", "car").unwrap_err();
    assert!(err.to_string().contains("truck"), "Error should name the label: {}", err);
}

#[test]
fn test_duplicate_label_error() {
    let result = MultiClassConfusionMatrix::new(["person", "car", "person"]);
    assert!(matches!(result, Err(RegionEvalError::DuplicateLabel(label)) if label == "person"));
}

#[test]
fn test_merge_label_mismatch() {
    let mut matrix = create_matrix();
    let before = matrix.clone();
    let other = MultiClassConfusionMatrix::new(["person", "car"]).unwrap();

    assert!(matches!(matrix.merge(&other), Err(RegionEvalError::LabelMismatch(_))));
    assert_eq!(matrix, before);
}

#[test]
fn test_count_overflow_leaves_matrix_unchanged() {
    let mut matrix = create_matrix();
    matrix.set_count("car", "car", u64::MAX - matrix.total()).unwrap();
    let before = matrix.clone();

    assert!(matches!(
        matrix.increment("person", "car"),
        Err(RegionEvalError::CountOverflow(_))
    ));
    assert!(matches!(
        matrix.set_count("bicycle", "bicycle", 1),
        Err(RegionEvalError::CountOverflow(_))
    ));
    let other = create_matrix();
    assert!(matches!(matrix.merge(&other), Err(RegionEvalError::CountOverflow(_))));

    assert_eq!(matrix, before);
    assert_eq!(matrix.total(), u64::MAX);
    assert!(matrix.weighted_f1().is_finite());
}

// ============================================================================
// CONFIG ERROR TESTS
// ============================================================================

#[test]
fn test_threshold_validation() {
    for threshold in [0.0, -0.5, 1.01, f64::NAN, f64::INFINITY] {
        let result = NmsConfig::new(threshold);
        assert!(
            matches!(result, Err(RegionEvalError::InvalidThreshold(_))),
            "threshold {} should be rejected",
            threshold
        );
    }
}

#[test]
fn test_config_invalid_json() {
    let result = load_nms_config_from_str("{ invalid json");
    assert!(matches!(result, Err(RegionEvalError::JsonError(_))));
}

#[test]
fn test_config_wrong_type() {
    let result = load_nms_config_from_str(r#"{ "iou_threshold": "high" }"#);
    assert!(matches!(result, Err(RegionEvalError::JsonError(_))));
}

#[test]
fn test_config_zero_threshold_rejected() {
    let result = load_nms_config_from_str(r#"{ "iou_threshold": 0.0, "per_class": true }"#);
    assert!(matches!(result, Err(RegionEvalError::InvalidThreshold(_))));
}

#[test]
fn test_config_file_roundtrip() {
    let config = NmsConfig::new(0.65).unwrap().with_per_class(true);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&config).unwrap().as_bytes()).unwrap();

    let loaded = load_nms_config_from_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_missing_file() {
    let result = load_nms_config_from_file("/this/path/does/not/exist.json");
    assert!(matches!(result, Err(RegionEvalError::IoError(_))));
}
