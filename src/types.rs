//! Core data types for detections and evaluation outcomes.

use serde::{Deserialize, Serialize};

/// Represents an axis-aligned bounding box (left, top, width, height).
///
/// No sign invariant is enforced: a zero or negative width/height is a valid,
/// degenerate box with zero area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a bounding box from its corners `(x1, y1)` and `(x2, y2)`.
    ///
    /// # Example
    ///
    /// ```
    /// use region_eval::types::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_corners(10.0, 20.0, 40.0, 60.0);
    /// assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
    /// ```
    #[must_use]
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Get the corners as `[x1, y1, x2, y2]`.
    #[must_use]
    pub fn to_corners(&self) -> [f64; 4] {
        [self.left, self.top, self.right(), self.bottom()]
    }

    /// Get the right coordinate (left + width).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Get the bottom coordinate (top + height).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check whether both dimensions are strictly positive.
    #[must_use]
    pub fn has_positive_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Get the area of the bounding box, 0.0 for degenerate boxes.
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.has_positive_area() {
            self.width * self.height
        } else {
            0.0
        }
    }
}

/// A region detected by a model, with its label and confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub label: String,
    pub confidence: f64,
}

impl Detection {
    /// Create a new detection.
    pub fn new(bbox: BoundingBox, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
        }
    }
}

/// How a single evaluated item relates ground truth to inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationOutcome {
    /// Ground-truth region detected correctly.
    TruePositive,
    /// Background detected correctly.
    TrueNegative,
    /// Detected region with no matching ground-truth region.
    FalsePositive,
    /// Ground-truth region not detected.
    FalseNegative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bbox.right(), 40.0);
        assert_eq!(bbox.bottom(), 60.0);
        assert_eq!(bbox.to_corners(), [10.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn test_degenerate_area() {
        assert_eq!(BoundingBox::new(0.0, 0.0, 0.0, 10.0).area(), 0.0);
        assert_eq!(BoundingBox::new(0.0, 0.0, -5.0, -5.0).area(), 0.0);
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, -1.0).has_positive_area());
        assert_eq!(BoundingBox::new(0.0, 0.0, 4.0, 5.0).area(), 20.0);
    }

    #[test]
    fn test_detection_serde() {
        let detection = Detection::new(BoundingBox::new(1.0, 2.0, 3.0, 4.0), "person", 0.75);
        let json = serde_json::to_string(&detection).unwrap();
        let parsed: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detection);
    }
}
