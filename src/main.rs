//! # face-eval CLI
//!
//! Command-line interface for the verification evaluation harness.
//!
//! ## Usage
//! ```bash
//! face-eval evaluate --lfw-dir lfw-deepfunneled --pairs pairsDevTest.txt
//! face-eval evaluate --threshold 0.55 --output json
//! ```

mod cli;

use face_verify_eval::Result;

fn main() -> Result<()> {
    face_verify_eval::init_tracing();
    cli::run()
}
