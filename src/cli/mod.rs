//! # CLI Module
//!
//! Command-line interface for the evaluation harness.
//!
//! ## Usage
//! ```bash
//! # Evaluate with the default file names in the working directory
//! face-eval evaluate
//!
//! # Explicit inputs
//! face-eval evaluate --lfw-dir lfw-deepfunneled --pairs pairsDevTest.txt \
//!     --quantized-model facenet512_uint8.tflite --reference-model facenet512.onnx
//!
//! # Only the two accuracy lines
//! face-eval evaluate --output plain
//!
//! # JSON report
//! face-eval evaluate --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use face_verify_eval::core::embedder::{EmbedderConfig, ModelVariant};
use face_verify_eval::core::metric::VerificationThreshold;
use face_verify_eval::core::pipeline::Evaluation;
use face_verify_eval::core::preprocess::{ChannelOrder, PreprocessConfig};
use face_verify_eval::core::reporter::EvaluationReport;
use face_verify_eval::error::{EvalError, Result};
use face_verify_eval::events::{Event, EventChannel, InferenceEvent, PipelineEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;

/// Face verification accuracy of a quantized model against its reference
#[derive(Parser, Debug)]
#[command(name = "face-eval")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate both models on an LFW pairs file
    Evaluate {
        /// LFW image directory (one sub-directory per identity)
        #[arg(long, default_value = "lfw-deepfunneled")]
        lfw_dir: PathBuf,

        /// LFW pairs file
        #[arg(short, long, default_value = "pairsDevTest.txt")]
        pairs: PathBuf,

        /// Quantized TFLite model
        #[arg(short, long, default_value = "facenet512_uint8.tflite")]
        quantized_model: PathBuf,

        /// Floating-point reference model (ONNX)
        #[arg(short, long, default_value = "facenet512.onnx")]
        reference_model: PathBuf,

        /// Cosine distance threshold (0-2)
        #[arg(short, long, default_value = "0.6")]
        threshold: f32,

        /// Pixels cropped from each image edge
        #[arg(long, default_value = "45")]
        crop_margin: u32,

        /// Channel order fed to the models
        #[arg(long, default_value = "bgr")]
        channel_order: Channels,

        /// Reference model input size (square)
        #[arg(long, default_value = "160")]
        input_size: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Channels {
    /// Blue, green, red (OpenCV order)
    Bgr,
    /// Red, green, blue
    Rgb,
}

impl From<Channels> for ChannelOrder {
    fn from(channels: Channels) -> Self {
        match channels {
            Channels::Bgr => ChannelOrder::Bgr,
            Channels::Rgb => ChannelOrder::Rgb,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON report for scripting
    Json,
    /// The two accuracy lines only
    Plain,
}

/// Options for one evaluate invocation
struct EvaluateArgs {
    lfw_dir: PathBuf,
    pairs: PathBuf,
    quantized_model: PathBuf,
    reference_model: PathBuf,
    threshold: f32,
    preprocess: PreprocessConfig,
    input_size: u32,
    output: OutputFormat,
    verbose: bool,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            lfw_dir,
            pairs,
            quantized_model,
            reference_model,
            threshold,
            crop_margin,
            channel_order,
            input_size,
            output,
            verbose,
        } => run_evaluate(EvaluateArgs {
            lfw_dir,
            pairs,
            quantized_model,
            reference_model,
            threshold,
            preprocess: PreprocessConfig::new()
                .crop_margin(crop_margin)
                .channel_order(channel_order.into()),
            input_size,
            output,
            verbose,
        }),
    }
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let term = Term::stderr();
    let threshold = VerificationThreshold::new(args.threshold)?;

    if matches!(args.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Face Verification Eval").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let quantized = EmbedderConfig::new(ModelVariant::Quantized)
        .model_path(&args.quantized_model)
        .build()?;
    let reference = EmbedderConfig::new(ModelVariant::FloatingPoint)
        .model_path(&args.reference_model)
        .input_size(args.input_size, args.input_size)
        .build()?;

    let evaluation = Evaluation::builder()
        .lfw_dir(&args.lfw_dir)
        .pairs_file(&args.pairs)
        .threshold(threshold)
        .preprocess(args.preprocess.clone())
        .quantized(quantized)
        .reference(reference)
        .build()?;

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(args.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| EvalError::Config(e.to_string()))?
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose = args.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Inference(InferenceEvent::Started { total_images }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Inference(InferenceEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(
                            p.current_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = evaluation.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = EvaluationReport::new(&result?, threshold);

    match args.output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, &args),
        OutputFormat::Json => print_json_results(&report)?,
        OutputFormat::Plain => print_plain_results(&report),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, report: &EvaluationReport, args: &EvaluateArgs) {
    term.write_line(&format!("{} Evaluation Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} pairs, {} images in {:.1}s",
        style(report.total_pairs).cyan(),
        style(report.total_images).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  threshold {} ({} crop {}px)",
        style(report.threshold).cyan(),
        args.preprocess.order(),
        args.preprocess.margin()
    ))
    .ok();
    term.write_line("").ok();

    for variant in &report.variants {
        term.write_line(&format!(
            "  {:<16} {}  ({}/{})",
            style(format!("{}:", variant.variant.label())).bold(),
            style(format!("{:.4}", variant.accuracy)).green(),
            variant.correct,
            variant.total
        ))
        .ok();

        if args.verbose {
            term.write_line(&format!(
                "    matched {:.4}  mismatched {:.4}",
                variant.matched_accuracy, variant.mismatched_accuracy
            ))
            .ok();

            if let (Some(same), Some(different)) =
                (variant.mean_matched_distance, variant.mean_mismatched_distance)
            {
                term.write_line(&format!(
                    "    mean distance: matched {:.4}  mismatched {:.4}",
                    same, different
                ))
                .ok();
            }

            if variant.fold_accuracies.len() > 1 {
                term.write_line(&format!(
                    "    {} folds: {:.4} ± {:.4}",
                    variant.fold_accuracies.len(),
                    variant.fold_mean,
                    variant.fold_std
                ))
                .ok();
            }
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} {:+.4}",
        style("Quantization accuracy drop:").dim(),
        report.accuracy_drop()
    ))
    .ok();
    term.write_line(&format!(
        "  {} {:.2}%",
        style("Decision agreement:").dim(),
        report.agreement * 100.0
    ))
    .ok();

    // Plain accuracy lines always go to stdout
    print_plain_results(report);
}

fn print_json_results(report: &EvaluationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| EvalError::Config(format!("failed to serialize report: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn print_plain_results(report: &EvaluationReport) {
    for line in report.summary_lines() {
        println!("{}", line);
    }
}
