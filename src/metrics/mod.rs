//! Overlap and classification metrics.

pub mod iou;
pub mod confusion;
pub mod multiclass;

pub use iou::{intersection_over_union, iou_matrix, round_to_places};
pub use confusion::ConfusionMatrix;
pub use multiclass::{ClassMetrics, MatrixSummary, MultiClassConfusionMatrix};
