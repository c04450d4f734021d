//! # Scoring Module
//!
//! Scores every verification pair for one model variant and aggregates
//! accuracy, overall and per cross-validation fold.

use crate::core::dataset::DatasetLayout;
use crate::core::embedder::ModelVariant;
use crate::core::features::FeatureStore;
use crate::core::metric::VerificationThreshold;
use crate::core::pairs::{PairKind, PairList};
use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Result of verifying one pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairOutcome {
    pub kind: PairKind,
    pub distance: f32,
    pub correct: bool,
}

/// Accuracy of one fold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldScore {
    pub fold: usize,
    pub correct: usize,
    pub total: usize,
}

impl FoldScore {
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }
}

/// Aggregated result for one model variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantScore {
    pub variant: ModelVariant,
    pub correct: usize,
    pub total: usize,
    pub matched_correct: usize,
    pub matched_total: usize,
    pub mismatched_correct: usize,
    pub mismatched_total: usize,
    pub folds: Vec<FoldScore>,
    #[serde(skip)]
    pub outcomes: Vec<PairOutcome>,
}

impl VariantScore {
    fn empty(variant: ModelVariant) -> Self {
        Self {
            variant,
            correct: 0,
            total: 0,
            matched_correct: 0,
            matched_total: 0,
            mismatched_correct: 0,
            mismatched_total: 0,
            folds: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Fraction of pairs verified correctly (0 when there are no pairs)
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.total)
    }

    /// True accept rate on matched pairs
    pub fn matched_accuracy(&self) -> f64 {
        ratio(self.matched_correct, self.matched_total)
    }

    /// True reject rate on mismatched pairs
    pub fn mismatched_accuracy(&self) -> f64 {
        ratio(self.mismatched_correct, self.mismatched_total)
    }

    /// Mean of the per-fold accuracies
    pub fn fold_mean(&self) -> f64 {
        if self.folds.is_empty() {
            return 0.0;
        }
        self.folds.iter().map(FoldScore::accuracy).sum::<f64>() / self.folds.len() as f64
    }

    /// Sample standard deviation of the per-fold accuracies
    pub fn fold_std(&self) -> f64 {
        let n = self.folds.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.fold_mean();
        let variance = self
            .folds
            .iter()
            .map(|f| (f.accuracy() - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    }

    /// Mean distance over pairs of one kind
    pub fn mean_distance(&self, kind: PairKind) -> Option<f64> {
        let distances: Vec<f64> = self
            .outcomes
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.distance as f64)
            .collect();

        if distances.is_empty() {
            None
        } else {
            Some(distances.iter().sum::<f64>() / distances.len() as f64)
        }
    }

    fn record(&mut self, fold: usize, outcome: PairOutcome) {
        self.total += 1;
        match outcome.kind {
            PairKind::Matched => self.matched_total += 1,
            PairKind::Mismatched => self.mismatched_total += 1,
        }

        if outcome.correct {
            self.correct += 1;
            match outcome.kind {
                PairKind::Matched => self.matched_correct += 1,
                PairKind::Mismatched => self.mismatched_correct += 1,
            }
        }

        if self.folds.len() <= fold {
            let start = self.folds.len();
            self.folds.extend((start..=fold).map(|fold| FoldScore {
                fold,
                correct: 0,
                total: 0,
            }));
        }
        let fold_score = &mut self.folds[fold];
        fold_score.total += 1;
        if outcome.correct {
            fold_score.correct += 1;
        }

        self.outcomes.push(outcome);
    }
}

/// Score every pair with the embeddings of one variant
pub fn score_pairs(
    pairs: &PairList,
    layout: &DatasetLayout,
    store: &FeatureStore,
    threshold: &VerificationThreshold,
) -> Result<VariantScore, ScoringError> {
    let mut score = VariantScore::empty(store.variant());

    for pair in pairs.iter() {
        let distance = store.distance(&layout.resolve(&pair.first), &layout.resolve(&pair.second))?;
        let correct = threshold.is_correct(pair.kind, distance);

        score.record(
            pair.fold,
            PairOutcome {
                kind: pair.kind,
                distance,
                correct,
            },
        );
    }

    tracing::info!(
        variant = %score.variant,
        correct = score.correct,
        total = score.total,
        accuracy = score.accuracy(),
        "Scored pairs"
    );

    Ok(score)
}

/// Fraction of pairs on which both variants reached the same decision
pub fn agreement(a: &VariantScore, b: &VariantScore) -> f64 {
    let total = a.outcomes.len().min(b.outcomes.len());
    let same = a
        .outcomes
        .iter()
        .zip(&b.outcomes)
        .filter(|(x, y)| x.correct == y.correct)
        .count();
    ratio(same, total)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
