//! # Face Verification Evaluation
//!
//! Measures how much face-verification accuracy a quantized on-device
//! embedding model loses against its floating-point reference on LFW.
//!
//! ## Workflow
//! - Read an LFW pairs file and resolve the referenced images
//! - Embed every image once per model variant
//! - Score each pair by cosine distance against a fixed threshold
//!
//! ## Architecture
//! - `core` - Pair loading, preprocessing, inference and scoring
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{EvalError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    // A subscriber installed earlier (e.g. by a test harness) wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
