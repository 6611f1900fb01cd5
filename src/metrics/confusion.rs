//! Binary confusion matrix and the metrics derived from it.
//!
//! The zero-denominator conventions are fixed: precision, recall and the
//! rate metrics report a perfect 1.0 when there was no opportunity to err,
//! while ratios over the total (accuracy, prevalence, error rate) report 0.0
//! when there is no data at all.

use serde::{Deserialize, Serialize};

/// Fixed 2x2 confusion matrix.
///
/// The four counts are set at construction; every metric is a pure function of them.
///
/// # Example
///
/// ```
/// use region_eval::metrics::confusion::ConfusionMatrix;
///
/// let matrix = ConfusionMatrix::new(100, 50, 10, 5);
/// assert_eq!(matrix.total(), 165);
/// assert!((matrix.precision() - 100.0 / 110.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    true_positives: u64,
    true_negatives: u64,
    false_positives: u64,
    false_negatives: u64,
}

impl ConfusionMatrix {
    /// Create a confusion matrix from its four counts.
    pub fn new(
        true_positives: u64,
        true_negatives: u64,
        false_positives: u64,
        false_negatives: u64,
    ) -> Self {
        Self {
            true_positives,
            true_negatives,
            false_positives,
            false_negatives,
        }
    }

    /// Predicted yes, actually yes.
    #[must_use]
    pub fn true_positives(&self) -> u64 {
        self.true_positives
    }

    /// Predicted no, actually no.
    #[must_use]
    pub fn true_negatives(&self) -> u64 {
        self.true_negatives
    }

    /// Predicted yes, actually no.
    #[must_use]
    pub fn false_positives(&self) -> u64 {
        self.false_positives
    }

    /// Predicted no, actually yes.
    #[must_use]
    pub fn false_negatives(&self) -> u64 {
        self.false_negatives
    }

    /// Total number of cases.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.true_positives
            .saturating_add(self.true_negatives)
            .saturating_add(self.false_positives)
            .saturating_add(self.false_negatives)
    }

    /// Overall, how often is the classifier correct?
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio_or(
            self.true_positives.saturating_add(self.true_negatives),
            self.total(),
            0.0,
        )
    }

    /// When it predicts yes, how often is it correct?
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio_or(
            self.true_positives,
            self.true_positives.saturating_add(self.false_positives),
            1.0,
        )
    }

    /// When it's actually yes, how often does it predict yes?
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio_or(
            self.true_positives,
            self.true_positives.saturating_add(self.false_negatives),
            1.0,
        )
    }

    /// Harmonic mean of precision and recall.
    ///
    /// 0.0 for an empty matrix, even though precision and recall both default
    /// to 1.0 there. A matrix holding only true negatives scores 1.0.
    #[must_use]
    pub fn f1_score(&self) -> f64 {
        f1_from_counts(
            self.true_positives,
            self.false_positives,
            self.false_negatives,
            self.total(),
        )
    }

    /// How often does the yes condition actually occur in the sample?
    #[must_use]
    pub fn prevalence(&self) -> f64 {
        ratio_or(
            self.true_positives.saturating_add(self.false_negatives),
            self.total(),
            0.0,
        )
    }

    /// Overall, how often is it wrong?
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        ratio_or(
            self.false_positives.saturating_add(self.false_negatives),
            self.total(),
            0.0,
        )
    }

    /// Same as [`recall`](Self::recall).
    #[must_use]
    pub fn true_positive_rate(&self) -> f64 {
        self.recall()
    }

    /// When it's actually no, how often does it predict yes?
    #[must_use]
    pub fn false_positive_rate(&self) -> f64 {
        ratio_or(
            self.false_positives,
            self.false_positives.saturating_add(self.true_negatives),
            1.0,
        )
    }

    /// When it's actually no, how often does it predict no?
    #[must_use]
    pub fn true_negative_rate(&self) -> f64 {
        ratio_or(
            self.true_negatives,
            self.true_negatives.saturating_add(self.false_positives),
            1.0,
        )
    }
}

/// `numerator / denominator`, or `fallback` when the denominator is zero.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio_or(numerator: u64, denominator: u64, fallback: f64) -> f64 {
    if denominator == 0 {
        return fallback;
    }
    numerator as f64 / denominator as f64
}

/// F1 from counts, using the precision/recall zero-denominator defaults.
///
/// `total` is the number of cases the counts were drawn from; F1 is 0.0 when it is zero.
pub(crate) fn f1_from_counts(
    true_positives: u64,
    false_positives: u64,
    false_negatives: u64,
    total: u64,
) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let precision = ratio_or(
        true_positives,
        true_positives.saturating_add(false_positives),
        1.0,
    );
    let recall = ratio_or(
        true_positives,
        true_positives.saturating_add(false_negatives),
        1.0,
    );
    harmonic_f1(precision, recall)
}

/// F1 from precision and recall, 0.0 when both are zero.
pub(crate) fn harmonic_f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * (precision * recall) / (precision + recall)
}
