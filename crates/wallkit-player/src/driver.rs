//! Async frame delivery.
//!
//! Drives a [`TrajectoryPlayer`] from a tokio interval, standing in for a
//! display's animation frames when running headless.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace};

use crate::player::{TickOutcome, TrajectoryPlayer};
use crate::scheduler::FrameQueue;

/// Delivers queued frames to a player at a fixed interval.
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    queue: FrameQueue,
    frame_interval: Duration,
}

impl PlaybackDriver {
    /// `queue` must be the scheduler the player was built with.
    pub fn new(queue: FrameQueue, frame_interval: Duration) -> Self {
        Self {
            queue,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Delivers frames until the player stops requesting them.
    ///
    /// Returns the number of frames delivered.
    pub async fn run(&self, player: &mut TrajectoryPlayer) -> usize {
        self.run_with(player, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_frame` after every delivered frame.
    pub async fn run_with<F>(&self, player: &mut TrajectoryPlayer, mut on_frame: F) -> usize
    where
        F: FnMut(&TrajectoryPlayer),
    {
        let mut interval = time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut frames = 0;
        while let Some(ticket) = self.queue.take_next() {
            interval.tick().await;
            let outcome = player.on_frame(ticket);
            frames += 1;
            trace!(frame = frames, cursor = player.cursor(), "frame delivered");
            on_frame(player);
            if outcome == TickOutcome::Halt {
                break;
            }
        }

        debug!(frames, state = %player.state(), "playback driver finished");
        frames
    }
}
