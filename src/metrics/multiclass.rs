//! Multi-class confusion matrix with per-class and aggregate metrics.
//!
//! Cell `(actual, predicted)` counts how often an item whose actual class is
//! `actual` was predicted as `predicted`. Per-class counts are derived from the
//! cells on every read:
//!
//! - true positives: the diagonal cell of the class
//! - false positives: the class row, excluding the diagonal
//! - false negatives: the class column, excluding the diagonal
//! - true negatives: every cell outside the class row and column
//!
//! Per-class metrics are those of the derived one-vs-rest [`ConfusionMatrix`].
//!
//! The sum of all cells always fits in a `u64`: updates that would overflow it
//! are rejected with [`RegionEvalError::CountOverflow`], so every derived count
//! can be read without overflow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegionEvalError, Result};
use crate::metrics::confusion::{f1_from_counts, ConfusionMatrix};

/// N x N confusion matrix over an ordered set of class labels.
///
/// # Example
///
/// ```
/// use region_eval::metrics::multiclass::MultiClassConfusionMatrix;
///
/// let mut matrix = MultiClassConfusionMatrix::new(["cat", "dog"]).unwrap();
/// matrix.increment("cat", "cat").unwrap();
/// matrix.increment("cat", "dog").unwrap();
/// matrix.set_count("dog", "dog", 3).unwrap();
///
/// assert_eq!(matrix.true_positives("dog").unwrap(), 3);
/// assert_eq!(matrix.total(), 5);
/// assert!(matrix.increment("bird", "cat").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixData", into = "MatrixData")]
pub struct MultiClassConfusionMatrix {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major storage: `cells[actual * n + predicted]`.
    cells: Vec<u64>,
    /// Sum of `cells`
    total: u64,
}

/// Serialized form of [`MultiClassConfusionMatrix`].
#[derive(Serialize, Deserialize)]
struct MatrixData {
    labels: Vec<String>,
    matrix: Vec<Vec<u64>>,
}

impl TryFrom<MatrixData> for MultiClassConfusionMatrix {
    type Error = RegionEvalError;

    fn try_from(data: MatrixData) -> Result<Self> {
        let mut matrix = Self::new(data.labels)?;
        let n = matrix.len();
        if data.matrix.len() != n || data.matrix.iter().any(|row| row.len() != n) {
            return Err(RegionEvalError::InvalidShape(format!(
                "expected {n} rows of {n} counts for {n} labels"
            )));
        }
        matrix.cells = data.matrix.into_iter().flatten().collect();
        matrix.total = matrix
            .cells
            .iter()
            .try_fold(0u64, |sum, &value| sum.checked_add(value))
            .ok_or_else(|| {
                RegionEvalError::CountOverflow("serialized cells sum past u64::MAX".to_string())
            })?;
        Ok(matrix)
    }
}

impl From<MultiClassConfusionMatrix> for MatrixData {
    fn from(matrix: MultiClassConfusionMatrix) -> Self {
        let n = matrix.len();
        let rows = if n == 0 {
            Vec::new()
        } else {
            matrix.cells.chunks(n).map(<[u64]>::to_vec).collect()
        };
        Self {
            labels: matrix.labels,
            matrix: rows,
        }
    }
}

/// Metrics of a single class, as reported by [`MultiClassConfusionMatrix::class_metrics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub true_positives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    /// Number of true instances of the class (TP + FN)
    pub support: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Corpus-level aggregates of a multi-class confusion matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSummary {
    pub total: u64,
    pub micro_f1: f64,
    pub macro_f1: f64,
    pub weighted_f1: f64,
    pub weighted_accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

impl MultiClassConfusionMatrix {
    /// Create an all-zero matrix over the given labels.
    ///
    /// Label order is kept as given and determines row/column order.
    ///
    /// # Errors
    ///
    /// Returns [`RegionEvalError::DuplicateLabel`] if a label appears more than once.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(RegionEvalError::DuplicateLabel(label.clone()));
            }
        }

        let n = labels.len();
        Ok(Self {
            labels,
            index,
            cells: vec![0; n * n],
            total: 0,
        })
    }

    /// Class labels in row/column order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the label set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Add one to the `(actual, predicted)` cell.
    ///
    /// # Errors
    ///
    /// Returns [`RegionEvalError::InvalidLabel`] if either label is unknown, or
    /// [`RegionEvalError::CountOverflow`] if the matrix total is already
    /// `u64::MAX`; the matrix is left unchanged.
    pub fn increment(&mut self, actual: &str, predicted: &str) -> Result<()> {
        let cell = self.cell_index(actual, predicted)?;
        self.total = self.total.checked_add(1).ok_or_else(|| {
            RegionEvalError::CountOverflow(format!("incrementing ({actual}, {predicted})"))
        })?;
        // cell <= total before the update, so this cannot overflow
        self.cells[cell] += 1;
        Ok(())
    }

    /// Overwrite the `(actual, predicted)` cell with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionEvalError::InvalidLabel`] if either label is unknown, or
    /// [`RegionEvalError::CountOverflow`] if the new matrix total would exceed
    /// `u64::MAX`; the matrix is left unchanged.
    pub fn set_count(&mut self, actual: &str, predicted: &str, value: u64) -> Result<()> {
        let cell = self.cell_index(actual, predicted)?;
        self.total = (self.total - self.cells[cell])
            .checked_add(value)
            .ok_or_else(|| {
                RegionEvalError::CountOverflow(format!(
                    "setting ({actual}, {predicted}) to {value}"
                ))
            })?;
        self.cells[cell] = value;
        Ok(())
    }

    /// Raw count of the `(actual, predicted)` cell.
    pub fn count(&self, actual: &str, predicted: &str) -> Result<u64> {
        Ok(self.cells[self.cell_index(actual, predicted)?])
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Add the counts of `other` cell by cell.
    ///
    /// Used to combine matrices accumulated independently, e.g. one per worker.
    ///
    /// # Errors
    ///
    /// Returns [`RegionEvalError::LabelMismatch`] unless both matrices have the
    /// same labels in the same order, or [`RegionEvalError::CountOverflow`] if
    /// the combined total would exceed `u64::MAX`. On error `self` is unchanged.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.labels != other.labels {
            return Err(RegionEvalError::LabelMismatch(format!(
                "cannot merge matrix with labels {:?} into {:?}",
                other.labels, self.labels
            )));
        }

        self.total = self.total.checked_add(other.total).ok_or_else(|| {
            RegionEvalError::CountOverflow(format!(
                "merged total of {} and {}",
                self.total, other.total
            ))
        })?;
        for (cell, value) in self.cells.iter_mut().zip(&other.cells) {
            *cell += value;
        }
        log::debug!(
            "merged confusion matrix over {} labels, total now {}",
            self.len(),
            self.total()
        );
        Ok(())
    }

    /// The one-vs-rest binary confusion matrix of a class.
    pub fn class_matrix(&self, label: &str) -> Result<ConfusionMatrix> {
        let index = self.label_index(label)?;
        Ok(self.class_matrix_at(index, self.total()))
    }

    /// Diagonal cell of the class.
    pub fn true_positives(&self, label: &str) -> Result<u64> {
        let index = self.label_index(label)?;
        Ok(self.cell(index, index))
    }

    /// Cells outside the class row and column.
    pub fn true_negatives(&self, label: &str) -> Result<u64> {
        Ok(self.class_matrix(label)?.true_negatives())
    }

    /// Class row, excluding the diagonal.
    pub fn false_positives(&self, label: &str) -> Result<u64> {
        let index = self.label_index(label)?;
        Ok(self.row_sum(index) - self.cell(index, index))
    }

    /// Class column, excluding the diagonal.
    pub fn false_negatives(&self, label: &str) -> Result<u64> {
        let index = self.label_index(label)?;
        Ok(self.column_sum(index) - self.cell(index, index))
    }

    /// True instances of the class (TP + FN).
    pub fn support(&self, label: &str) -> Result<u64> {
        let index = self.label_index(label)?;
        Ok(self.column_sum(index))
    }

    /// TP + TN + FP + FN of the class.
    pub fn total_for(&self, label: &str) -> Result<u64> {
        Ok(self.class_matrix(label)?.total())
    }

    /// (TP + TN) / total of the class, 0.0 for an empty matrix.
    pub fn accuracy(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.accuracy())
    }

    /// TP / (TP + FP) of the class, 1.0 when the class row is empty.
    pub fn precision(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.precision())
    }

    /// TP / (TP + FN) of the class, 1.0 when the class has no support.
    pub fn recall(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.recall())
    }

    /// Harmonic mean of the class precision and recall.
    ///
    /// A label that never occurs in a non-empty matrix scores 1.0.
    pub fn f1_score(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.f1_score())
    }

    /// Share of the total that is a true instance of the class.
    pub fn prevalence(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.prevalence())
    }

    /// (FP + FN) / total of the class.
    pub fn error_rate(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.error_rate())
    }

    /// Same as [`recall`](Self::recall).
    pub fn true_positive_rate(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.true_positive_rate())
    }

    /// FP / (FP + TN) of the class.
    pub fn false_positive_rate(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.false_positive_rate())
    }

    /// TN / (TN + FP) of the class.
    pub fn true_negative_rate(&self, label: &str) -> Result<f64> {
        Ok(self.class_matrix(label)?.true_negative_rate())
    }

    /// F1 from TP, FP and FN pooled over all classes, 0.0 for an empty matrix.
    #[must_use]
    pub fn micro_f1(&self) -> f64 {
        // Pooled TP is the trace; pooled FP and FN are both the off-diagonal sum.
        let tp: u64 = (0..self.len()).map(|i| self.cell(i, i)).sum();
        let off_diagonal = self.total - tp;
        f1_from_counts(tp, off_diagonal, off_diagonal, self.total)
    }

    /// Unweighted mean of per-class F1, 0.0 without labels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn macro_f1(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .class_matrices(self.total())
            .map(|m| m.f1_score())
            .sum();
        sum / self.len() as f64
    }

    /// Per-class F1 weighted by class support, 0.0 when total support is 0.
    #[must_use]
    pub fn weighted_f1(&self) -> f64 {
        self.support_weighted(ConfusionMatrix::f1_score)
    }

    /// Per-class accuracy weighted by class support, 0.0 when total support is 0.
    #[must_use]
    pub fn weighted_accuracy(&self) -> f64 {
        self.support_weighted(ConfusionMatrix::accuracy)
    }

    /// Per-class report rows, in label order.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        self.labels
            .iter()
            .zip(self.class_matrices(self.total()))
            .map(|(label, m)| ClassMetrics {
                label: label.clone(),
                true_positives: m.true_positives(),
                true_negatives: m.true_negatives(),
                false_positives: m.false_positives(),
                false_negatives: m.false_negatives(),
                support: m.true_positives() + m.false_negatives(),
                accuracy: m.accuracy(),
                precision: m.precision(),
                recall: m.recall(),
                f1_score: m.f1_score(),
            })
            .collect()
    }

    /// Aggregate metrics together with the per-class rows.
    #[must_use]
    pub fn summary(&self) -> MatrixSummary {
        MatrixSummary {
            total: self.total(),
            micro_f1: self.micro_f1(),
            macro_f1: self.macro_f1(),
            weighted_f1: self.weighted_f1(),
            weighted_accuracy: self.weighted_accuracy(),
            classes: self.class_metrics(),
        }
    }

    fn label_index(&self, label: &str) -> Result<usize> {
        self.index.get(label).copied().ok_or_else(|| {
            log::warn!("label {label:?} is not part of the confusion matrix");
            RegionEvalError::InvalidLabel(label.to_string())
        })
    }

    fn cell_index(&self, actual: &str, predicted: &str) -> Result<usize> {
        let row = self.label_index(actual)?;
        let col = self.label_index(predicted)?;
        Ok(row * self.len() + col)
    }

    fn cell(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.len() + col]
    }

    fn row_sum(&self, row: usize) -> u64 {
        let n = self.len();
        self.cells[row * n..(row + 1) * n].iter().sum()
    }

    fn column_sum(&self, col: usize) -> u64 {
        (0..self.len()).map(|row| self.cell(row, col)).sum()
    }

    fn class_matrix_at(&self, index: usize, total: u64) -> ConfusionMatrix {
        let tp = self.cell(index, index);
        let fp = self.row_sum(index) - tp;
        let fn_ = self.column_sum(index) - tp;
        ConfusionMatrix::new(tp, total - tp - fp - fn_, fp, fn_)
    }

    fn class_matrices(&self, total: u64) -> impl Iterator<Item = ConfusionMatrix> + '_ {
        (0..self.len()).map(move |i| self.class_matrix_at(i, total))
    }

    #[allow(clippy::cast_precision_loss)]
    fn support_weighted(&self, metric: fn(&ConfusionMatrix) -> f64) -> f64 {
        let (weighted_sum, total_support) = self.class_matrices(self.total()).fold(
            (0.0, 0u64),
            |(sum, support), m| {
                let class_support = m.true_positives() + m.false_negatives();
                (sum + metric(&m) * class_support as f64, support + class_support)
            },
        );

        if total_support == 0 {
            return 0.0;
        }
        weighted_sum / total_support as f64
    }
}
