//! Crossbeam-backed event channel between an evaluation and its observer.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::Path;

use super::{Event, InferenceEvent, InferenceProgress, PipelineEvent, PipelinePhase};

/// Sending half handed to [`crate::core::Evaluation::run_with_events`].
#[derive(Clone)]
pub struct EventSender {
    inner: Option<Sender<Event>>,
}

impl EventSender {
    /// Send an event. Dropped silently once the observer is gone.
    pub fn send(&self, event: Event) {
        if let Some(sender) = &self.inner {
            let _ = sender.send(event);
        }
    }

    /// Announce the start of a phase
    pub fn phase(&self, phase: PipelinePhase) {
        self.send(Event::Pipeline(PipelineEvent::PhaseChanged { phase }));
    }

    /// Report that `completed` of `total` images have been embedded
    pub fn image_embedded(&self, completed: usize, total: usize, path: &Path) {
        self.send(Event::Inference(InferenceEvent::Progress(InferenceProgress {
            completed,
            total,
            current_path: path.to_path_buf(),
        })));
    }
}

/// Receiving half, read by the CLI's progress thread.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once every sender is dropped
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

pub struct EventChannel;

impl EventChannel {
    /// Create a connected sender/receiver pair.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender {
                inner: Some(sender),
            },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender for runs nobody observes; events are discarded without queueing.
pub fn null_sender() -> EventSender {
    EventSender { inner: None }
}
