//! # Error Module
//!
//! Error types for the verification evaluation harness.
//!
//! ## Design Principles
//! - **Never panic** on dataset input - return errors instead
//! - **Include context** - paths, line numbers, what went wrong
//! - **Abort the run** - an evaluation over partial data is not comparable

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Pairs file error: {0}")]
    Pairs(#[from] PairsError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors while reading an LFW pairs file
#[derive(Error, Debug)]
pub enum PairsError {
    #[error("Failed to read pairs file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pairs file is empty")]
    Empty,

    #[error("Invalid header on line 1: {reason}")]
    InvalidHeader { reason: String },

    #[error("Line {line}: expected 3 or 4 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid image index '{value}'")]
    InvalidIndex { line: usize, value: String },
}

/// Errors while resolving dataset images
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Image referenced by pairs file not found: {path}")]
    ImageNotFound { path: PathBuf },

    #[error("Pairs file references no images")]
    NoImages,
}

/// Errors while decoding and preparing an image for inference
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a recognised image file: {path}")]
    InvalidHeader { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Crop margin {margin} is too large for {width}x{height} image {path}")]
    CropTooLarge {
        path: PathBuf,
        margin: u32,
        width: u32,
        height: u32,
    },

    #[error("Resize failed: {0}")]
    ResizeFailed(String),
}

/// Errors from the inference backends
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model file not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("Failed to load model {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Unsupported model input: {0}")]
    UnsupportedInput(String),

    #[error("Input is {actual_width}x{actual_height} but the model expects {expected_width}x{expected_height}")]
    InputSize {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Inference failed: {0}")]
    RunFailed(String),

    #[error("Model produced an empty embedding")]
    EmptyOutput,
}

/// Errors computing distances and decisions
#[derive(Error, Debug, PartialEq)]
pub enum MetricError {
    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Invalid threshold: {value} (must be within 0-2)")]
    InvalidThreshold { value: f32 },
}

/// Errors while scoring pairs
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("No embedding computed for {path}")]
    MissingEmbedding { path: PathBuf },

    #[error(transparent)]
    Metric(#[from] MetricError),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, EvalError>;
