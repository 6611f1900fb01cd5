//! # region-eval
//!
//! A Rust library for scoring object detection output against ground truth.
//!
//! This library provides:
//! - **IoU** (Intersection over Union) between axis-aligned bounding boxes
//! - **NMS** (greedy Non-Maximum Suppression) over scored detections
//! - **Binary confusion matrix** with accuracy, precision, recall, F1 and rate metrics
//! - **Multi-class confusion matrix** with per-class metrics and micro, macro and
//!   support-weighted aggregates
//! - **Region evaluations**, an append-only log pairing ground truth with inference
//!   per classification outcome
//!
//! Everything is in-memory and synchronous. Matching detections to ground truth is
//! left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use region_eval::metrics::{intersection_over_union, MultiClassConfusionMatrix};
//! use region_eval::nms::{non_maximum_suppression, NmsConfig};
//! use region_eval::types::{BoundingBox, Detection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detections = vec![
//!     Detection::new(BoundingBox::new(10.0, 10.0, 50.0, 50.0), "person", 0.92),
//!     Detection::new(BoundingBox::new(12.0, 11.0, 50.0, 50.0), "person", 0.81),
//! ];
//! let kept = non_maximum_suppression(&detections, &NmsConfig::default());
//! assert_eq!(kept.len(), 1);
//!
//! let ground_truth = BoundingBox::new(11.0, 10.0, 50.0, 50.0);
//! assert!(intersection_over_union(&kept[0].bbox, &ground_truth) > 0.9);
//!
//! let mut matrix = MultiClassConfusionMatrix::new(["person", "car"])?;
//! matrix.increment("person", &kept[0].label)?;
//! println!("micro F1: {:.2}", matrix.micro_f1());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Matrices and evaluation logs are plain owned values without internal locking.
//! Accumulate one per worker and combine them afterwards, e.g. with
//! [`MultiClassConfusionMatrix::merge`].

pub mod error;
pub mod types;
pub mod metrics;
pub mod nms;
pub mod evaluation;
pub mod config;

// Re-export commonly used types and functions
pub use error::{RegionEvalError, Result};
pub use types::{BoundingBox, ClassificationOutcome, Detection};
pub use metrics::{
    intersection_over_union, iou_matrix, ClassMetrics, ConfusionMatrix, MatrixSummary,
    MultiClassConfusionMatrix,
};
pub use nms::{non_maximum_suppression, suppression_mask, NmsConfig};
pub use evaluation::{RegionEvaluation, RegionEvaluations};
