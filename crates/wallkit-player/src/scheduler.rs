//! Frame scheduling.
//!
//! The player never sleeps or spawns anything itself. It asks a
//! [`FrameScheduler`] for a frame and is called back through
//! [`TrajectoryPlayer::on_frame`](crate::TrajectoryPlayer::on_frame) with the
//! ticket it was given. Cancelled or superseded tickets are ignored.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Handle identifying one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host-side frame source (animation frame, timer, test harness...).
pub trait FrameScheduler {
    /// Requests a single callback on the next frame.
    fn schedule(&mut self) -> FrameTicket;

    /// Withdraws a previously requested frame. Unknown tickets are ignored.
    fn cancel(&mut self, ticket: FrameTicket);
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    pending: VecDeque<FrameTicket>,
}

/// In-process frame queue drained by the host loop.
///
/// Clones share one queue: give one clone to the player and keep the other
/// to deliver frames.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    state: Arc<Mutex<QueueState>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest pending frame.
    pub fn take_next(&self) -> Option<FrameTicket> {
        self.state.lock().pending.pop_front()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self) -> FrameTicket {
        let mut state = self.state.lock();
        state.next_id += 1;
        let ticket = FrameTicket(state.next_id);
        state.pending.push_back(ticket);
        ticket
    }

    fn cancel(&mut self, ticket: FrameTicket) {
        self.state.lock().pending.retain(|pending| *pending != ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_cancel() {
        let queue = FrameQueue::new();
        let mut scheduler = queue.clone();
        let first = scheduler.schedule();
        let second = scheduler.schedule();
        assert_ne!(first, second);
        assert_eq!(queue.pending_count(), 2);

        scheduler.cancel(first);
        assert_eq!(queue.take_next(), Some(second));
        assert!(queue.is_empty());

        // Cancelling twice is harmless.
        scheduler.cancel(first);
        assert_eq!(queue.take_next(), None);
    }
}
