//! Event type definitions for progress reporting.

use crate::core::embedder::ModelVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the evaluation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Pair loading phase events
    Load(LoadEvent),
    /// Inference phase events
    Inference(InferenceEvent),
    /// Scoring phase events
    Scoring(ScoringEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while loading pairs and resolving images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadEvent {
    /// Pairs file parsed
    PairsLoaded {
        path: PathBuf,
        matched: usize,
        mismatched: usize,
    },
    /// Referenced images resolved and checked
    ImagesResolved { total_images: usize },
}

/// Events during the inference phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InferenceEvent {
    /// Inference has started
    Started { total_images: usize },
    /// One image embedded by every variant
    Progress(InferenceProgress),
    /// Inference completed
    Completed {
        total_images: usize,
        embedding_dims: usize,
    },
}

/// Progress information during inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceProgress {
    /// Number of images embedded so far
    pub completed: usize,
    /// Total number of images
    pub total: usize,
    /// Image just embedded
    pub current_path: PathBuf,
}

/// Events during the scoring phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScoringEvent {
    /// Scoring has started
    Started { total_pairs: usize },
    /// One variant has been scored
    VariantScored {
        variant: ModelVariant,
        correct: usize,
        total: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Loading,
    Inference,
    Scoring,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub total_pairs: usize,
    pub total_images: usize,
    pub quantized_accuracy: f64,
    pub reference_accuracy: f64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Loading => write!(f, "Loading pairs"),
            PipelinePhase::Inference => write!(f, "Running inferences"),
            PipelinePhase::Scoring => write!(f, "Scoring pairs"),
        }
    }
}
