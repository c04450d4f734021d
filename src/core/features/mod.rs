//! # Features Module
//!
//! Holds the embeddings computed for one model variant, keyed by image
//! path. Filled once during inference, read during scoring.

use crate::core::embedder::{Embedding, ModelVariant};
use crate::error::ScoringError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Embeddings of one model variant
#[derive(Debug, Clone)]
pub struct FeatureStore {
    variant: ModelVariant,
    entries: HashMap<PathBuf, Embedding>,
}

impl FeatureStore {
    pub fn new(variant: ModelVariant) -> Self {
        Self {
            variant,
            entries: HashMap::new(),
        }
    }

    pub fn with_capacity(variant: ModelVariant, capacity: usize) -> Self {
        Self {
            variant,
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Store the embedding of an image, replacing any previous one
    pub fn insert(&mut self, path: PathBuf, embedding: Embedding) {
        self.entries.insert(path, embedding);
    }

    /// Embedding of an image
    pub fn get(&self, path: &Path) -> Result<&Embedding, ScoringError> {
        self.entries
            .get(path)
            .ok_or_else(|| ScoringError::MissingEmbedding {
                path: path.to_path_buf(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimension of the stored embeddings, if any are stored
    pub fn dimension(&self) -> Option<usize> {
        self.entries.values().next().map(Embedding::dimension)
    }

    /// Cosine distance between two stored embeddings
    pub fn distance(&self, first: &Path, second: &Path) -> Result<f32, ScoringError> {
        let a = self.get(first)?;
        let b = self.get(second)?;
        Ok(a.distance(b)?)
    }
}
