//! # Events Module
//!
//! Progress reporting decoupled from presentation.
//!
//! ## Design
//! The pipeline emits events through a channel; the CLI listens on a
//! separate thread and drives its progress bar from them.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Inference(InferenceEvent::Progress(p)) = event {
//!             println!("Embedded {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! evaluation.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
