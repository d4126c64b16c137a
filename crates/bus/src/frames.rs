use core_types::{ComponentId, FrameToken, IdAllocator};
use std::collections::VecDeque;

/// "Run this on the next rendering frame" capability.
///
/// Implementations must never run a callback synchronously inside
/// `request_frame`, and must never deliver a callback after it was cancelled.
pub trait FrameScheduler {
    fn request_frame(&mut self, target: ComponentId) -> FrameToken;

    /// Returns `true` if the callback was still pending.
    fn cancel_frame(&mut self, token: FrameToken) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCallback {
    pub token: FrameToken,
    pub target: ComponentId,
}

/// FIFO frame queue stepped by the host loop.
///
/// `take_due` hands out everything requested before the frame started;
/// requests made while those callbacks run land in the following frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<FrameCallback>,
    ids: IdAllocator,
    frames_run: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn take_due(&mut self) -> Vec<FrameCallback> {
        self.frames_run += 1;
        let due: Vec<_> = self.pending.drain(..).collect();
        if !due.is_empty() {
            log::trace!(
                target: "bus.frames",
                "frame {}: {} callback(s) due",
                self.frames_run,
                due.len()
            );
        }
        due
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, target: ComponentId) -> FrameToken {
        let token = FrameToken::from_raw(self.ids.next_raw());
        self.pending.push_back(FrameCallback { token, target });
        log::trace!(target: "bus.frames", "{target} requested {token}");
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) -> bool {
        let Some(pos) = self.pending.iter().position(|cb| cb.token == token) else {
            return false;
        };
        self.pending.remove(pos);
        log::trace!(target: "bus.frames", "cancelled {token}");
        true
    }
}
