//! # Pipeline Module
//!
//! Orchestrates one evaluation run.
//!
//! ## Pipeline Stages
//! 1. **Load** - Parse the pairs file and resolve the referenced images
//! 2. **Inference** - Embed each distinct image once per model variant
//! 3. **Scoring** - Compare pair distances against the threshold
//!
//! Stages run sequentially on the calling thread.

mod executor;

pub use executor::{Evaluation, EvaluationBuilder, EvaluationConfig, EvaluationResult};
