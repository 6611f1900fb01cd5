//! Non-Maximum Suppression (`NMS`) implementation
//!
//! Greedy suppression of overlapping detections: detections are visited in order of
//! decreasing confidence, and every kept detection removes the remaining ones whose
//! `IoU` with it is strictly greater than the threshold.
//!
//! By default suppression ignores labels, so a confident detection of one class can
//! remove an overlapping detection of another class. Set [`NmsConfig::per_class`] to
//! only suppress detections sharing the same label.

use serde::{Deserialize, Serialize};

use crate::error::{RegionEvalError, Result};
use crate::metrics::iou::intersection_over_union;
use crate::types::Detection;

/// Default `IoU` threshold above which a lower-confidence detection is suppressed.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Suppression settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmsConfig {
    /// `IoU` threshold in (0.0, 1.0]; equality does not suppress
    pub iou_threshold: f64,
    /// Only suppress detections carrying the same label
    pub per_class: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            per_class: false,
        }
    }
}

impl NmsConfig {
    /// Create a label-blind configuration with the given threshold.
    ///
    /// # Errors
    ///
    /// Returns error if `iou_threshold` is not in range (0.0, 1.0]
    pub fn new(iou_threshold: f64) -> Result<Self> {
        let config = Self {
            iou_threshold,
            per_class: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the per-class suppression policy.
    #[must_use]
    pub fn with_per_class(mut self, per_class: bool) -> Self {
        self.per_class = per_class;
        self
    }

    /// Check that the threshold is in range (0.0, 1.0].
    pub fn validate(&self) -> Result<()> {
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(RegionEvalError::InvalidThreshold(format!(
                "IoU threshold must be in (0, 1], got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }

    fn may_suppress(&self, kept: &Detection, candidate: &Detection) -> bool {
        !self.per_class || kept.label == candidate.label
    }
}

/// Compute which detections survive suppression
///
/// # Returns
///
/// Boolean mask in input order, `true` for kept detections
///
/// # Examples
///
/// ```
/// # use region_eval::nms::{suppression_mask, NmsConfig};
/// # use region_eval::types::{BoundingBox, Detection};
/// let detections = vec![
///     Detection::new(BoundingBox::new(10.0, 10.0, 40.0, 40.0), "car", 0.9),
///     Detection::new(BoundingBox::new(15.0, 15.0, 40.0, 40.0), "car", 0.8),
///     Detection::new(BoundingBox::new(100.0, 100.0, 50.0, 50.0), "car", 0.95),
/// ];
///
/// let keep_mask = suppression_mask(&detections, &NmsConfig::default());
/// assert_eq!(keep_mask, vec![true, false, true]);
/// ```
pub fn suppression_mask(detections: &[Detection], config: &NmsConfig) -> Vec<bool> {
    let order = confidence_order(detections);
    let mut keep_mask = vec![true; detections.len()];

    for (i, &idx_i) in order.iter().enumerate() {
        if !keep_mask[idx_i] {
            continue;
        }

        let kept = &detections[idx_i];
        for &idx_j in &order[(i + 1)..] {
            if !keep_mask[idx_j] {
                continue;
            }

            let candidate = &detections[idx_j];
            if config.may_suppress(kept, candidate)
                && intersection_over_union(&kept.bbox, &candidate.bbox) > config.iou_threshold
            {
                keep_mask[idx_j] = false;
            }
        }
    }

    keep_mask
}

/// Apply Non-Maximum Suppression to a set of detections
///
/// # Returns
///
/// The surviving detections in order of decreasing confidence. Ties keep their
/// input order.
///
/// # Examples
///
/// ```
/// # use region_eval::nms::{non_maximum_suppression, NmsConfig};
/// # use region_eval::types::{BoundingBox, Detection};
/// let detections = vec![
///     Detection::new(BoundingBox::new(10.0, 10.0, 40.0, 40.0), "car", 0.8),
///     Detection::new(BoundingBox::new(12.0, 12.0, 40.0, 40.0), "car", 0.9),
/// ];
///
/// let kept = non_maximum_suppression(&detections, &NmsConfig::default());
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].confidence, 0.9);
/// ```
pub fn non_maximum_suppression(detections: &[Detection], config: &NmsConfig) -> Vec<Detection> {
    let keep_mask = suppression_mask(detections, config);

    let kept: Vec<Detection> = confidence_order(detections)
        .into_iter()
        .filter(|&idx| keep_mask[idx])
        .map(|idx| detections[idx].clone())
        .collect();

    log::debug!(
        "nms kept {} of {} detections (iou_threshold={}, per_class={})",
        kept.len(),
        detections.len(),
        config.iou_threshold,
        config.per_class
    );

    kept
}

/// Indices sorted by confidence (descending), stable for ties.
///
/// NaN confidences sort after every number, so they never suppress a scored detection.
fn confidence_order(detections: &[Detection]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..detections.len()).collect();
    indices.sort_by(|&a, &b| {
        let (score_a, score_b) = (detections[a].confidence, detections[b].confidence);
        score_a
            .is_nan()
            .cmp(&score_b.is_nan())
            .then_with(|| score_b.total_cmp(&score_a))
    });
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn detection(left: f64, top: f64, size: f64, label: &str, confidence: f64) -> Detection {
        Detection::new(BoundingBox::new(left, top, size, size), label, confidence)
    }

    #[test]
    fn test_nms_empty_input() {
        let detections: Vec<Detection> = vec![];
        assert!(suppression_mask(&detections, &NmsConfig::default()).is_empty());
        assert!(non_maximum_suppression(&detections, &NmsConfig::default()).is_empty());
    }

    #[test]
    fn test_nms_single_detection() {
        let detections = vec![detection(0.0, 0.0, 10.0, "a", 0.9)];
        let kept = non_maximum_suppression(&detections, &NmsConfig::default());
        assert_eq!(kept, detections);
    }

    #[test]
    fn test_nms_no_overlap_reorders() {
        let detections = vec![
            detection(0.0, 0.0, 10.0, "a", 0.5),
            detection(20.0, 20.0, 10.0, "a", 0.8),
            detection(40.0, 40.0, 10.0, "a", 0.7),
        ];
        let kept = non_maximum_suppression(&detections, &NmsConfig::default());
        let confidences: Vec<f64> = kept.iter().map(|d| d.confidence).collect();
        assert_eq!(confidences, vec![0.8, 0.7, 0.5]);
    }

    #[test]
    fn test_nms_complex_scenario() {
        let detections = vec![
            detection(10.0, 10.0, 40.0, "a", 0.9),
            detection(15.0, 15.0, 40.0, "a", 0.8),
            detection(100.0, 100.0, 50.0, "a", 0.95),
            detection(105.0, 105.0, 50.0, "a", 0.7),
        ];
        let keep_mask = suppression_mask(&detections, &NmsConfig::default());

        // IoU between 2 and 3: intersection 45x45=2025, union 2500+2500-2025=2975, IoU=0.68 > 0.5
        assert_eq!(keep_mask, vec![true, false, true, false]);
    }

    #[test]
    fn test_nms_threshold_equality_does_not_suppress() {
        // Intersection 5x10 = 50, union 150, IoU = 0.3333
        let detections = vec![
            Detection::new(BoundingBox::new(10.0, 10.0, 10.0, 10.0), "a", 0.9),
            Detection::new(BoundingBox::new(15.0, 10.0, 10.0, 10.0), "a", 0.8),
        ];
        let at_threshold = NmsConfig::new(0.3333).unwrap();
        assert_eq!(suppression_mask(&detections, &at_threshold), vec![true, true]);

        let below = NmsConfig::new(0.3).unwrap();
        assert_eq!(suppression_mask(&detections, &below), vec![true, false]);
    }

    #[test]
    fn test_nms_label_blind_by_default() {
        let detections = vec![
            detection(10.0, 10.0, 40.0, "car", 0.9),
            detection(12.0, 12.0, 40.0, "truck", 0.8),
        ];

        let kept = non_maximum_suppression(&detections, &NmsConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "car");

        let per_class = NmsConfig::default().with_per_class(true);
        let kept = non_maximum_suppression(&detections, &per_class);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nms_score_ordering() {
        // Even if lower-score box comes first, higher-score should be kept
        let detections = vec![
            detection(10.0, 10.0, 40.0, "a", 0.7),
            detection(15.0, 15.0, 40.0, "a", 0.9),
        ];
        let keep_mask = suppression_mask(&detections, &NmsConfig::default());
        assert_eq!(keep_mask, vec![false, true]);
    }

    #[test]
    fn test_nms_ties_keep_input_order() {
        let detections = vec![
            detection(10.0, 10.0, 40.0, "first", 0.9),
            detection(10.0, 10.0, 40.0, "second", 0.9),
        ];
        let kept = non_maximum_suppression(&detections, &NmsConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, "first");
    }

    #[test]
    fn test_nms_nan_confidence_sorts_last() {
        let detections: Vec<Detection> = (0..200)
            .map(|i| {
                let confidence = if i % 7 == 0 { f64::NAN } else { f64::from(i) / 200.0 };
                detection(f64::from(i) * 20.0, 0.0, 10.0, "a", confidence)
            })
            .collect();

        let kept = non_maximum_suppression(&detections, &NmsConfig::default());
        assert_eq!(kept.len(), 200);

        let nan_count = detections.iter().filter(|d| d.confidence.is_nan()).count();
        let (scored, unscored) = kept.split_at(kept.len() - nan_count);
        assert!(unscored.iter().all(|d| d.confidence.is_nan()));
        assert!(scored
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
    }

    #[test]
    fn test_nms_nan_confidence_never_suppresses() {
        let detections = vec![
            detection(10.0, 10.0, 40.0, "unscored", f64::NAN),
            detection(12.0, 12.0, 40.0, "scored", 0.3),
        ];
        let keep_mask = suppression_mask(&detections, &NmsConfig::default());
        assert_eq!(keep_mask, vec![false, true]);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(NmsConfig::new(1.5).is_err());
        assert!(NmsConfig::new(0.0).is_err());
        assert!(NmsConfig::new(-0.1).is_err());
        assert!(NmsConfig::new(f64::NAN).is_err());
        assert!(NmsConfig::new(1.0).is_ok());
    }
}
