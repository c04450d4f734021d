//! Integration tests for the evaluation pipeline.
//!
//! These tests build a small LFW-shaped tree on disk and run the full
//! pipeline with a deterministic embedder, covering:
//! - Accuracy of a perfect and a degraded model
//! - Deduplication of images shared between pairs
//! - Fatal errors for missing or corrupt inputs

use assert_fs::prelude::*;
use assert_fs::TempDir;
use face_verify_eval::core::embedder::{Embedder, Embedding, ModelVariant};
use face_verify_eval::core::metric::VerificationThreshold;
use face_verify_eval::core::pipeline::Evaluation;
use face_verify_eval::core::preprocess::{FaceImage, PreprocessConfig};
use face_verify_eval::core::reporter::EvaluationReport;
use face_verify_eval::error::{DatasetError, EvalError, InferenceError, PreprocessError};
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Embeds a face as its mean channel values and counts calls
struct MeanColorEmbedder {
    variant: ModelVariant,
    calls: Arc<AtomicUsize>,
}

impl MeanColorEmbedder {
    fn boxed(variant: ModelVariant) -> (Box<dyn Embedder>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let embedder = Self {
            variant,
            calls: Arc::clone(&calls),
        };
        (Box::new(embedder), calls)
    }
}

impl Embedder for MeanColorEmbedder {
    fn embed(&self, face: &FaceImage) -> Result<Embedding, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut sums = [0f32; 3];
        for pixel in face.pixels().chunks_exact(3) {
            for (sum, value) in sums.iter_mut().zip(pixel) {
                *sum += *value as f32;
            }
        }
        let count = (face.pixels().len() / 3) as f32;
        Ok(Embedding::new(sums.iter().map(|s| s / count).collect()))
    }

    fn variant(&self) -> ModelVariant {
        self.variant
    }

    fn input_size(&self) -> (u32, u32) {
        (32, 32)
    }
}

/// Every image embeds to the same vector: all pairs look matched
struct ConstantEmbedder;

impl Embedder for ConstantEmbedder {
    fn embed(&self, _face: &FaceImage) -> Result<Embedding, InferenceError> {
        Ok(Embedding::new(vec![1.0, 1.0, 1.0]))
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Quantized
    }

    fn input_size(&self) -> (u32, u32) {
        (32, 32)
    }
}

/// Write a solid-color 60x60 face as a JPEG under the LFW naming scheme
fn write_face(lfw: &assert_fs::fixture::ChildPath, identity: &str, index: u32, color: [u8; 3]) {
    let file = lfw
        .child(identity)
        .child(format!("{}_{:04}.jpg", identity, index));
    file.touch().unwrap();
    RgbImage::from_pixel(60, 60, Rgb(color))
        .save(file.path())
        .unwrap();
}

/// Two identities with distinct colors; the dev-test layout with 2+2 pairs
fn lfw_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    let lfw = temp.child("lfw-deepfunneled");

    write_face(&lfw, "Abel_Pacheco", 1, [200, 20, 20]);
    write_face(&lfw, "Abel_Pacheco", 2, [190, 25, 15]);
    write_face(&lfw, "Abel_Pacheco", 4, [210, 10, 30]);
    write_face(&lfw, "Dean_Barker", 1, [20, 20, 200]);
    write_face(&lfw, "Dean_Barker", 3, [15, 30, 190]);

    temp.child("pairsDevTest.txt")
        .write_str(
            "2\n\
             Abel_Pacheco\t1\t4\n\
             Dean_Barker\t1\t3\n\
             Abel_Pacheco\t1\tDean_Barker\t1\n\
             Abel_Pacheco\t2\tDean_Barker\t3\n",
        )
        .unwrap();

    temp
}

fn preprocess() -> PreprocessConfig {
    PreprocessConfig::new().crop_margin(10)
}

#[test]
fn distinct_identities_score_full_accuracy() {
    let temp = lfw_fixture();
    let (quantized, _) = MeanColorEmbedder::boxed(ModelVariant::Quantized);
    let (reference, _) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);

    let result = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .preprocess(preprocess())
        .quantized(quantized)
        .reference(reference)
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.total_pairs, 4);
    assert_eq!(result.quantized.accuracy(), 1.0);
    assert_eq!(result.reference.accuracy(), 1.0);
    assert_eq!(result.agreement, 1.0);
}

#[test]
fn each_image_is_embedded_once_per_variant() {
    let temp = lfw_fixture();
    let (quantized, quantized_calls) = MeanColorEmbedder::boxed(ModelVariant::Quantized);
    let (reference, reference_calls) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);

    let result = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .preprocess(preprocess())
        .quantized(quantized)
        .reference(reference)
        .build()
        .unwrap()
        .run()
        .unwrap();

    // Abel_Pacheco 1 and Dean_Barker 1/3 appear in several pairs
    assert_eq!(result.total_images, 5);
    assert_eq!(quantized_calls.load(Ordering::SeqCst), 5);
    assert_eq!(reference_calls.load(Ordering::SeqCst), 5);
    assert_eq!(result.embedding_dims, vec![(ModelVariant::Quantized, 3), (ModelVariant::FloatingPoint, 3)]);
}

#[test]
fn collapsed_model_fails_every_mismatched_pair() {
    let temp = lfw_fixture();
    let (reference, _) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);
    let threshold = VerificationThreshold::default();

    let evaluation = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .threshold(threshold)
        .preprocess(preprocess())
        .quantized(Box::new(ConstantEmbedder))
        .reference(reference)
        .build()
        .unwrap();

    let result = evaluation.run().unwrap();

    assert_eq!(result.quantized.matched_correct, 2);
    assert_eq!(result.quantized.mismatched_correct, 0);
    assert_eq!(result.quantized.accuracy(), 0.5);
    assert_eq!(result.reference.accuracy(), 1.0);
    assert_eq!(result.agreement, 0.5);

    let report = EvaluationReport::new(&result, threshold);
    let lines = report.summary_lines();
    assert!(predicate::str::contains("Quantized model accuracy: 0.5").eval(&lines[0]));
    assert!(predicate::str::ends_with("Floating-point model accuracy: 1.0").eval(&lines[1]));
    assert!((report.accuracy_drop() - 0.5).abs() < 1e-9);
}

#[test]
fn missing_image_aborts_the_run() {
    let temp = lfw_fixture();
    temp.child("pairsDevTest.txt")
        .write_str("1\nAbel_Pacheco\t1\t9\nAbel_Pacheco\t1\tDean_Barker\t1\n")
        .unwrap();
    let (quantized, calls) = MeanColorEmbedder::boxed(ModelVariant::Quantized);
    let (reference, _) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);

    let result = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .quantized(quantized)
        .reference(reference)
        .build()
        .unwrap()
        .run();

    match result {
        Err(EvalError::Dataset(DatasetError::ImageNotFound { path })) => {
            assert!(predicate::str::ends_with("Abel_Pacheco_0009.jpg")
                .eval(path.to_string_lossy().as_ref()));
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.total_pairs)),
    }
    // Existence is checked before any inference
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn corrupt_image_aborts_the_run() {
    let temp = lfw_fixture();
    temp.child("lfw-deepfunneled")
        .child("Dean_Barker")
        .child("Dean_Barker_0003.jpg")
        .write_binary(b"this is not a valid image file")
        .unwrap();
    let (quantized, _) = MeanColorEmbedder::boxed(ModelVariant::Quantized);
    let (reference, _) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);

    let result = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .preprocess(preprocess())
        .quantized(quantized)
        .reference(reference)
        .build()
        .unwrap()
        .run();

    assert!(matches!(
        result,
        Err(EvalError::Preprocess(PreprocessError::InvalidHeader { .. }))
    ));
}

#[test]
fn malformed_pairs_file_aborts_the_run() {
    let temp = lfw_fixture();
    temp.child("pairsDevTest.txt")
        .write_str("1\nAbel_Pacheco\t1\n")
        .unwrap();
    let (quantized, _) = MeanColorEmbedder::boxed(ModelVariant::Quantized);
    let (reference, _) = MeanColorEmbedder::boxed(ModelVariant::FloatingPoint);

    let result = Evaluation::builder()
        .lfw_dir(temp.child("lfw-deepfunneled").path())
        .pairs_file(temp.child("pairsDevTest.txt").path())
        .quantized(quantized)
        .reference(reference)
        .build()
        .unwrap()
        .run();

    let message = match result {
        Err(e) => e.to_string(),
        Ok(_) => panic!("malformed pairs file was accepted"),
    };
    assert!(predicate::str::contains("Line 2").eval(&message));
}
