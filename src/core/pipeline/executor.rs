//! Evaluation execution.

use crate::core::dataset::{DatasetLayout, ImageSet};
use crate::core::embedder::{Embedder, ModelVariant};
use crate::core::features::FeatureStore;
use crate::core::metric::VerificationThreshold;
use crate::core::pairs::{load_pairs, PairList};
use crate::core::preprocess::PreprocessConfig;
use crate::core::scoring::{agreement, score_pairs, VariantScore};
use crate::error::EvalError;
use crate::events::{
    null_sender, Event, EventSender, InferenceEvent, LoadEvent, PipelineEvent,
    PipelinePhase, PipelineSummary, ScoringEvent,
};
use std::path::PathBuf;
use std::time::Instant;

/// Result of an evaluation run
#[derive(Debug)]
pub struct EvaluationResult {
    pub quantized: VariantScore,
    pub reference: VariantScore,
    /// Fraction of pairs on which both variants decided the same way
    pub agreement: f64,
    pub total_pairs: usize,
    pub total_images: usize,
    /// Embedding dimension per variant
    pub embedding_dims: Vec<(ModelVariant, usize)>,
    pub duration_ms: u64,
}

impl EvaluationResult {
    pub fn score(&self, variant: ModelVariant) -> &VariantScore {
        match variant {
            ModelVariant::Quantized => &self.quantized,
            ModelVariant::FloatingPoint => &self.reference,
        }
    }
}

/// Configuration for an evaluation run
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Root of the LFW image tree
    pub lfw_dir: PathBuf,
    /// Pairs file
    pub pairs_file: PathBuf,
    pub threshold: VerificationThreshold,
    pub preprocess: PreprocessConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            lfw_dir: PathBuf::from("lfw-deepfunneled"),
            pairs_file: PathBuf::from("pairsDevTest.txt"),
            threshold: VerificationThreshold::default(),
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// Builder for evaluation runs
pub struct EvaluationBuilder {
    config: EvaluationConfig,
    quantized: Option<Box<dyn Embedder>>,
    reference: Option<Box<dyn Embedder>>,
}

impl EvaluationBuilder {
    pub fn new() -> Self {
        Self {
            config: EvaluationConfig::default(),
            quantized: None,
            reference: None,
        }
    }

    pub fn lfw_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lfw_dir = path.into();
        self
    }

    pub fn pairs_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pairs_file = path.into();
        self
    }

    pub fn threshold(mut self, threshold: VerificationThreshold) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.config.preprocess = preprocess;
        self
    }

    /// Set the quantized on-device model
    pub fn quantized(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.quantized = Some(embedder);
        self
    }

    /// Set the floating-point reference model
    pub fn reference(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.reference = Some(embedder);
        self
    }

    /// Build the evaluation; both models are required
    pub fn build(self) -> Result<Evaluation, EvalError> {
        let quantized = self
            .quantized
            .ok_or_else(|| EvalError::Config("quantized model not set".to_string()))?;
        let reference = self
            .reference
            .ok_or_else(|| EvalError::Config("reference model not set".to_string()))?;

        for (slot, embedder) in [
            (ModelVariant::Quantized, &quantized),
            (ModelVariant::FloatingPoint, &reference),
        ] {
            if embedder.variant() != slot {
                return Err(EvalError::Config(format!(
                    "{} model set where the {} model is expected",
                    embedder.variant(),
                    slot
                )));
            }
        }

        Ok(Evaluation {
            config: self.config,
            embedders: [quantized, reference],
        })
    }
}

impl Default for EvaluationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-pass evaluation of both model variants
pub struct Evaluation {
    config: EvaluationConfig,
    /// Quantized first, reference second
    embedders: [Box<dyn Embedder>; 2],
}

impl Evaluation {
    pub fn builder() -> EvaluationBuilder {
        EvaluationBuilder::new()
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Run without events
    pub fn run(&self) -> Result<EvaluationResult, EvalError> {
        self.run_with_events(&null_sender())
    }

    /// Run with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<EvaluationResult, EvalError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Loading
        events.phase(PipelinePhase::Loading);

        let pairs = load_pairs(&self.config.pairs_file)?;
        events.send(Event::Load(LoadEvent::PairsLoaded {
            path: self.config.pairs_file.clone(),
            matched: pairs.matched(),
            mismatched: pairs.mismatched(),
        }));

        let layout = DatasetLayout::new(&self.config.lfw_dir);
        let images = ImageSet::from_pairs(&layout, &pairs);
        images.verify(&layout)?;
        events.send(Event::Load(LoadEvent::ImagesResolved {
            total_images: images.len(),
        }));

        // Phase 2: Inference
        events.phase(PipelinePhase::Inference);

        let stores = self.embed_all(&images, events)?;

        // Phase 3: Scoring
        events.phase(PipelinePhase::Scoring);

        let [quantized_store, reference_store] = stores;
        let quantized = self.score(&pairs, &layout, &quantized_store, events)?;
        let reference = self.score(&pairs, &layout, &reference_store, events)?;

        let embedding_dims = [&quantized_store, &reference_store]
            .iter()
            .filter_map(|store| store.dimension().map(|d| (store.variant(), d)))
            .collect();

        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_pairs: pairs.len(),
                total_images: images.len(),
                quantized_accuracy: quantized.accuracy(),
                reference_accuracy: reference.accuracy(),
                duration_ms,
            },
        }));

        Ok(EvaluationResult {
            agreement: agreement(&quantized, &reference),
            quantized,
            reference,
            total_pairs: pairs.len(),
            total_images: images.len(),
            embedding_dims,
            duration_ms,
        })
    }

    /// Embed every image once with both models
    fn embed_all(
        &self,
        images: &ImageSet,
        events: &EventSender,
    ) -> Result<[FeatureStore; 2], EvalError> {
        let total = images.len();
        events.send(Event::Inference(InferenceEvent::Started {
            total_images: total,
        }));

        let mut stores = [
            FeatureStore::with_capacity(ModelVariant::Quantized, total),
            FeatureStore::with_capacity(ModelVariant::FloatingPoint, total),
        ];

        for (completed, path) in images.iter().enumerate() {
            let face = self.config.preprocess.load(path)?;

            for (embedder, store) in self.embedders.iter().zip(stores.iter_mut()) {
                let (width, height) = embedder.input_size();
                let input = face.fit_to(width, height)?;
                let embedding = embedder.embed(&input)?;
                store.insert(path.clone(), embedding);
            }

            tracing::debug!(path = %path.display(), "Embedded image");
            events.image_embedded(completed + 1, total, path);
        }

        events.send(Event::Inference(InferenceEvent::Completed {
            total_images: total,
            embedding_dims: stores[0].dimension().unwrap_or(0),
        }));
        tracing::info!(images = total, "Inference complete");

        Ok(stores)
    }

    fn score(
        &self,
        pairs: &PairList,
        layout: &DatasetLayout,
        store: &FeatureStore,
        events: &EventSender,
    ) -> Result<VariantScore, EvalError> {
        events.send(Event::Scoring(ScoringEvent::Started {
            total_pairs: pairs.len(),
        }));

        let score = score_pairs(pairs, layout, store, &self.config.threshold)?;

        events.send(Event::Scoring(ScoringEvent::VariantScored {
            variant: score.variant,
            correct: score.correct,
            total: score.total,
        }));

        Ok(score)
    }
}
