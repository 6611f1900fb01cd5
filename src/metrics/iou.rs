//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Number of decimal places IoU values are rounded to.
pub const IOU_DECIMAL_PLACES: i32 = 4;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
/// A box with a non-positive width or height never overlaps anything, so the
/// result is 0.0 whenever either box is degenerate.
///
/// The result is clamped to `[0.0, 1.0]` and rounded to four decimal places,
/// with midpoints rounded away from zero.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Example
///
/// ```
/// use region_eval::metrics::iou::intersection_over_union;
/// use region_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
/// let bbox2 = BoundingBox::new(15.0, 15.0, 10.0, 10.0);
/// assert_eq!(intersection_over_union(&bbox1, &bbox2), 0.1429);
/// ```
#[must_use]
pub fn intersection_over_union(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    if !bbox1.has_positive_area() || !bbox2.has_positive_area() {
        return 0.0;
    }

    let intersection_width =
        (bbox1.right().min(bbox2.right()) - bbox1.left.max(bbox2.left)).max(0.0);
    let intersection_height =
        (bbox1.bottom().min(bbox2.bottom()) - bbox1.top.max(bbox2.top)).max(0.0);
    let intersection_area = intersection_width * intersection_height;

    let union_area = bbox1.area() + bbox2.area() - intersection_area;
    let iou = intersection_area / union_area;

    if !iou.is_finite() {
        return 0.0;
    }

    round_to_places(iou.clamp(0.0, 1.0), IOU_DECIMAL_PLACES)
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a 2D vector where `result[i][j]` is the IoU between `bboxes1[i]` and `bboxes2[j]`.
///
/// # Example
///
/// ```
/// use region_eval::metrics::iou::iou_matrix;
/// use region_eval::types::BoundingBox;
///
/// let bboxes1 = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let bboxes2 = vec![BoundingBox::new(5.0, 5.0, 10.0, 10.0)];
/// let matrix = iou_matrix(&bboxes1, &bboxes2);
/// assert_eq!(matrix.len(), 1);
/// assert_eq!(matrix[0].len(), 1);
/// ```
#[must_use]
pub fn iou_matrix(bboxes1: &[BoundingBox], bboxes2: &[BoundingBox]) -> Vec<Vec<f64>> {
    bboxes1
        .iter()
        .map(|bbox1| {
            bboxes2
                .iter()
                .map(|bbox2| intersection_over_union(bbox1, bbox2))
                .collect()
        })
        .collect()
}

/// Round a value to `places` decimal places, midpoints away from zero.
#[must_use]
pub fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
