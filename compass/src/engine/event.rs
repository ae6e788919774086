//! Events consumed by the engine and the callbacks that produce them.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::device::{OrientationCallback, PositionCallback, PositionEvent};
use crate::lifecycle::{CallbackFactory, Generation};
use crate::orientation::RawOrientationSample;

/// One unit of work for the event thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The compass came into the foreground.
    Foreground,
    /// The compass left the foreground.
    Background,
    /// An orientation sample from the subscription of `generation`.
    Orientation {
        generation: Generation,
        sample: RawOrientationSample,
    },
    /// A position event from the subscription of `generation`.
    Position {
        generation: Generation,
        event: PositionEvent,
    },
    /// Release everything and stop the loop.
    Shutdown,
}

impl EngineEvent {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Foreground => "foreground",
            EngineEvent::Background => "background",
            EngineEvent::Orientation { .. } => "orientation",
            EngineEvent::Position { .. } => "position",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}

/// Callbacks that forward device data into the engine's queue.
///
/// Sending never blocks. If the engine has already stopped the event is
/// dropped.
#[derive(Clone)]
pub struct ChannelCallbacks {
    tx: UnboundedSender<EngineEvent>,
}

impl ChannelCallbacks {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl CallbackFactory for ChannelCallbacks {
    fn orientation(&self, generation: Generation) -> OrientationCallback {
        let tx = self.tx.clone();
        Arc::new(move |sample| {
            if tx
                .send(EngineEvent::Orientation { generation, sample })
                .is_err()
            {
                trace!(%generation, "Engine stopped, dropping orientation sample");
            }
        })
    }

    fn position(&self, generation: Generation) -> PositionCallback {
        let tx = self.tx.clone();
        Arc::new(move |event| {
            if tx.send(EngineEvent::Position { generation, event }).is_err() {
                trace!(%generation, "Engine stopped, dropping position event");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_callbacks_tag_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let callbacks = ChannelCallbacks::new(tx);
        let generation = Generation::default();

        let orientation = callbacks.orientation(generation);
        orientation(RawOrientationSample::from_azimuth(12.0));

        assert_eq!(
            rx.try_recv().unwrap(),
            EngineEvent::Orientation {
                generation,
                sample: RawOrientationSample::from_azimuth(12.0),
            }
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        let callbacks = ChannelCallbacks::new(tx);
        drop(rx);

        let callback = callbacks.orientation(Generation::default());
        callback(RawOrientationSample::from_azimuth(1.0));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EngineEvent::Foreground.name(), "foreground");
        assert_eq!(EngineEvent::Shutdown.name(), "shutdown");
    }
}
