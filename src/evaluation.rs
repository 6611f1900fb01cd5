//! Append-only log of region evaluations.
//!
//! Each entry pairs a ground-truth region with a model inference and records the
//! [`ClassificationOutcome`] that relates them. Which side is present depends on
//! the outcome and is fixed by the append operation used:
//!
//! | Outcome | ground truth | inference |
//! |---|---|---|
//! | true positive | present | present |
//! | false positive | absent | present |
//! | false negative | present | absent |
//! | true negative | absent | absent |

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::RegionEvalError;
use crate::metrics::confusion::ConfusionMatrix;
use crate::types::ClassificationOutcome;

/// A single evaluated region.
///
/// Deserialization rejects records whose present sides contradict the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluationRecord<T>")]
pub struct RegionEvaluation<T> {
    ground_truth: Option<T>,
    inference: Option<T>,
    outcome: ClassificationOutcome,
}

/// Unchecked serialized form of [`RegionEvaluation`].
#[derive(Deserialize)]
struct EvaluationRecord<T> {
    ground_truth: Option<T>,
    inference: Option<T>,
    outcome: ClassificationOutcome,
}

impl<T> TryFrom<EvaluationRecord<T>> for RegionEvaluation<T> {
    type Error = RegionEvalError;

    fn try_from(record: EvaluationRecord<T>) -> Result<Self, Self::Error> {
        let (needs_ground_truth, needs_inference) = match record.outcome {
            ClassificationOutcome::TruePositive => (true, true),
            ClassificationOutcome::FalsePositive => (false, true),
            ClassificationOutcome::FalseNegative => (true, false),
            ClassificationOutcome::TrueNegative => (false, false),
        };
        if record.ground_truth.is_some() != needs_ground_truth
            || record.inference.is_some() != needs_inference
        {
            return Err(RegionEvalError::InvalidEvaluation(format!(
                "{:?} requires ground truth {} and inference {}",
                record.outcome,
                presence(needs_ground_truth),
                presence(needs_inference)
            )));
        }

        Ok(Self {
            ground_truth: record.ground_truth,
            inference: record.inference,
            outcome: record.outcome,
        })
    }
}

fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}

impl<T> RegionEvaluation<T> {
    /// Ground-truth region, absent for false positives and true negatives.
    #[must_use]
    pub fn ground_truth(&self) -> Option<&T> {
        self.ground_truth.as_ref()
    }

    /// Model inference, absent for false negatives and true negatives.
    #[must_use]
    pub fn inference(&self) -> Option<&T> {
        self.inference.as_ref()
    }

    /// How the region was classified.
    #[must_use]
    pub fn outcome(&self) -> ClassificationOutcome {
        self.outcome
    }
}

/// Ordered, append-only collection of [`RegionEvaluation`]s.
///
/// # Example
///
/// ```
/// use region_eval::evaluation::RegionEvaluations;
/// use region_eval::types::ClassificationOutcome;
///
/// let mut evaluations = RegionEvaluations::new();
/// evaluations.add_true_positive("gt-1", "pred-1");
/// evaluations.add_false_positive("pred-2");
/// evaluations.add_true_negative();
///
/// assert_eq!(evaluations.len(), 3);
/// assert_eq!(evaluations[1].outcome(), ClassificationOutcome::FalsePositive);
/// assert_eq!(evaluations[1].ground_truth(), None);
/// assert_eq!(evaluations.confusion_matrix().total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionEvaluations<T> {
    evaluations: Vec<RegionEvaluation<T>>,
}

impl<T> Default for RegionEvaluations<T> {
    fn default() -> Self {
        Self {
            evaluations: Vec::new(),
        }
    }
}

impl<T> RegionEvaluations<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ground-truth region that was detected correctly.
    pub fn add_true_positive(&mut self, ground_truth: T, inference: T) {
        self.push(
            Some(ground_truth),
            Some(inference),
            ClassificationOutcome::TruePositive,
        );
    }

    /// Record background that was detected correctly.
    pub fn add_true_negative(&mut self) {
        self.push(None, None, ClassificationOutcome::TrueNegative);
    }

    /// Record a detected region with no matching ground-truth region.
    pub fn add_false_positive(&mut self, inference: T) {
        self.push(None, Some(inference), ClassificationOutcome::FalsePositive);
    }

    /// Record a ground-truth region that was not detected.
    pub fn add_false_negative(&mut self, ground_truth: T) {
        self.push(Some(ground_truth), None, ClassificationOutcome::FalseNegative);
    }

    /// Entry at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RegionEvaluation<T>> {
        self.evaluations.get(index)
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegionEvaluation<T>> {
        self.evaluations.iter()
    }

    /// Number of entries with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: ClassificationOutcome) -> u64 {
        self.iter().filter(|e| e.outcome == outcome).count() as u64
    }

    /// Fold the recorded outcomes into a binary confusion matrix.
    #[must_use]
    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        let mut counts = [0u64; 4];
        for evaluation in self {
            let slot = match evaluation.outcome {
                ClassificationOutcome::TruePositive => 0,
                ClassificationOutcome::TrueNegative => 1,
                ClassificationOutcome::FalsePositive => 2,
                ClassificationOutcome::FalseNegative => 3,
            };
            counts[slot] += 1;
        }
        ConfusionMatrix::new(counts[0], counts[1], counts[2], counts[3])
    }

    fn push(&mut self, ground_truth: Option<T>, inference: Option<T>, outcome: ClassificationOutcome) {
        self.evaluations.push(RegionEvaluation {
            ground_truth,
            inference,
            outcome,
        });
    }
}

impl<T> Index<usize> for RegionEvaluations<T> {
    type Output = RegionEvaluation<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.evaluations[index]
    }
}

impl<'a, T> IntoIterator for &'a RegionEvaluations<T> {
    type Item = &'a RegionEvaluation<T>;
    type IntoIter = std::slice::Iter<'a, RegionEvaluation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.evaluations.iter()
    }
}
