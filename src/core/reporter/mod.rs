//! # Reporter Module
//!
//! Turns an evaluation result into a serializable report and the plain
//! accuracy summary printed to stdout.

use crate::core::embedder::ModelVariant;
use crate::core::metric::VerificationThreshold;
use crate::core::pairs::PairKind;
use crate::core::pipeline::EvaluationResult;
use crate::core::scoring::VariantScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-variant section of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantReport {
    pub variant: ModelVariant,
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    pub matched_accuracy: f64,
    pub mismatched_accuracy: f64,
    pub mean_matched_distance: Option<f64>,
    pub mean_mismatched_distance: Option<f64>,
    pub fold_accuracies: Vec<f64>,
    pub fold_mean: f64,
    pub fold_std: f64,
    pub embedding_dims: Option<usize>,
}

impl VariantReport {
    fn from_score(score: &VariantScore, embedding_dims: Option<usize>) -> Self {
        Self {
            variant: score.variant,
            accuracy: score.accuracy(),
            correct: score.correct,
            total: score.total,
            matched_accuracy: score.matched_accuracy(),
            mismatched_accuracy: score.mismatched_accuracy(),
            mean_matched_distance: score.mean_distance(PairKind::Matched),
            mean_mismatched_distance: score.mean_distance(PairKind::Mismatched),
            fold_accuracies: score.folds.iter().map(|f| f.accuracy()).collect(),
            fold_mean: score.fold_mean(),
            fold_std: score.fold_std(),
            embedding_dims,
        }
    }
}

/// Full evaluation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated_at: DateTime<Utc>,
    pub threshold: f32,
    pub total_pairs: usize,
    pub total_images: usize,
    pub variants: Vec<VariantReport>,
    /// Fraction of pairs on which both variants decided the same way
    pub agreement: f64,
    pub duration_ms: u64,
}

impl EvaluationReport {
    pub fn new(result: &EvaluationResult, threshold: VerificationThreshold) -> Self {
        let variants = ModelVariant::ALL
            .iter()
            .map(|&variant| {
                let dims = result
                    .embedding_dims
                    .iter()
                    .find(|(v, _)| *v == variant)
                    .map(|(_, d)| *d);
                VariantReport::from_score(result.score(variant), dims)
            })
            .collect();

        Self {
            evaluated_at: Utc::now(),
            threshold: threshold.value(),
            total_pairs: result.total_pairs,
            total_images: result.total_images,
            variants,
            agreement: result.agreement,
            duration_ms: result.duration_ms,
        }
    }

    pub fn variant(&self, variant: ModelVariant) -> Option<&VariantReport> {
        self.variants.iter().find(|v| v.variant == variant)
    }

    /// Accuracy lost by quantization (reference minus quantized)
    pub fn accuracy_drop(&self) -> f64 {
        let accuracy = |variant| self.variant(variant).map(|v| v.accuracy).unwrap_or(0.0);
        accuracy(ModelVariant::FloatingPoint) - accuracy(ModelVariant::Quantized)
    }

    /// `<Label> model accuracy: <value>`, one line per variant
    pub fn summary_lines(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|v| {
                format!(
                    "{} model accuracy: {}",
                    v.variant.label(),
                    format_accuracy(v.accuracy)
                )
            })
            .collect()
    }
}

/// Shortest round-trip form, keeping a `.0` on whole numbers (`1.0`, `0.0`)
fn format_accuracy(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::FoldScore;

    fn score(variant: ModelVariant, correct: usize) -> VariantScore {
        VariantScore {
            variant,
            correct,
            total: 1000,
            matched_correct: correct / 2,
            matched_total: 500,
            mismatched_correct: correct - correct / 2,
            mismatched_total: 500,
            folds: vec![FoldScore {
                fold: 0,
                correct,
                total: 1000,
            }],
            outcomes: Vec::new(),
        }
    }

    fn result() -> EvaluationResult {
        EvaluationResult {
            quantized: score(ModelVariant::Quantized, 972),
            reference: score(ModelVariant::FloatingPoint, 979),
            agreement: 0.99,
            total_pairs: 1000,
            total_images: 1677,
            embedding_dims: vec![(ModelVariant::Quantized, 512), (ModelVariant::FloatingPoint, 512)],
            duration_ms: 1200,
        }
    }

    #[test]
    fn summary_lines_match_expected_format() {
        let report = EvaluationReport::new(&result(), VerificationThreshold::default());

        assert_eq!(
            report.summary_lines(),
            vec![
                "Quantized model accuracy: 0.972".to_string(),
                "Floating-point model accuracy: 0.979".to_string(),
            ]
        );
    }

    #[test]
    fn whole_number_accuracy_keeps_decimal_point() {
        let mut result = result();
        result.quantized = score(ModelVariant::Quantized, 0);
        result.reference = score(ModelVariant::FloatingPoint, 1000);
        let report = EvaluationReport::new(&result, VerificationThreshold::default());

        assert_eq!(
            report.summary_lines(),
            vec![
                "Quantized model accuracy: 0.0".to_string(),
                "Floating-point model accuracy: 1.0".to_string(),
            ]
        );
    }

    #[test]
    fn format_accuracy_matches_shortest_decimal() {
        assert_eq!(format_accuracy(0.5), "0.5");
        assert_eq!(format_accuracy(0.979), "0.979");
        assert_eq!(format_accuracy(1.0), "1.0");
        assert_eq!(format_accuracy(0.0), "0.0");
    }

    #[test]
    fn accuracy_drop_is_reference_minus_quantized() {
        let report = EvaluationReport::new(&result(), VerificationThreshold::default());
        assert!((report.accuracy_drop() - 0.007).abs() < 1e-9);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = EvaluationReport::new(&result(), VerificationThreshold::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_images"], 1677);
        assert_eq!(json["variants"][0]["variant"], "Quantized");
        assert_eq!(json["variants"][1]["embedding_dims"], 512);
    }
}
