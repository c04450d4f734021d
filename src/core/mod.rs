//! # Core Module
//!
//! The evaluation engine, independent of any presentation layer.
//!
//! ## Modules
//! - `pairs` - Parses LFW pair lists
//! - `dataset` - Resolves pairs to image files
//! - `preprocess` - Decodes and crops faces
//! - `embedder` - Runs the quantized and floating-point models
//! - `features` - Stores embeddings per model variant
//! - `metric` - Cosine distance and threshold decision
//! - `scoring` - Accuracy over all pairs
//! - `pipeline` - Orchestrates the full workflow
//! - `reporter` - Builds the final report

pub mod dataset;
pub mod embedder;
pub mod features;
pub mod metric;
pub mod pairs;
pub mod pipeline;
pub mod preprocess;
pub mod reporter;
pub mod scoring;

// Re-export commonly used types
pub use embedder::{Embedder, Embedding, ModelVariant};
pub use metric::VerificationThreshold;
pub use pairs::{PairKind, PairList, VerificationPair};
pub use pipeline::{Evaluation, EvaluationResult};
pub use reporter::EvaluationReport;
pub use scoring::VariantScore;
