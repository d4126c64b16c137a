//! Host-side event plumbing: the environment-change signal, the frame queue
//! and the channel that carries their notifications to the page loop.

mod frames;
mod media;

use core_types::SubscriptionId;
use std::sync::mpsc::{self, Receiver, Sender};

pub use frames::{FrameCallback, FrameQueue, FrameScheduler};
pub use media::{MediaQueryList, MediaSignal};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// A media query flipped. Delivered once per listener per edge.
    MediaChange {
        subscription: SubscriptionId,
        media: String,
        matches: bool,
    },
}

pub struct Bus {
    pub evt_tx: Sender<HostEvent>, // shareable with every signal source
    pub evt_rx: Receiver<HostEvent>,
}

impl Bus {
    pub fn new() -> Self {
        let (evt_tx, evt_rx) = mpsc::channel();
        Self { evt_tx, evt_rx }
    }

    /// Everything queued so far, in send order. Never blocks.
    pub fn drain(&self) -> Vec<HostEvent> {
        self.evt_rx.try_iter().collect()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
