//! Banner carousel: a wrapping slide index plus a background timer that
//! advances it and reports progress toward the next slide.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CarouselConfig {
    /// Time each slide stays up.
    pub interval: Duration,
    /// How often progress is published.
    pub tick: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            tick: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Step to the next slide, wrapping to the first.
    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    /// Jump to a slide. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }
}

/// What the banner renders: the slide and how far along its timer is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub slide: usize,
    /// `0.0` right after a slide change, approaching `1.0` before the next.
    pub progress: f32,
}

/// Handle to a running auto-advance task. Dropping it stops the task.
pub struct AutoAdvance {
    frames: watch::Receiver<Frame>,
    jumps: mpsc::UnboundedSender<usize>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AutoAdvance {
    /// Start advancing `carousel`. The task also stops when `parent` is
    /// cancelled.
    ///
    /// # Panics
    ///
    /// Panics if `config.interval` or `config.tick` is zero.
    pub fn spawn(carousel: Carousel, config: CarouselConfig, parent: &CancellationToken) -> Self {
        assert!(
            !config.interval.is_zero() && !config.tick.is_zero(),
            "carousel interval and tick must be non-zero"
        );
        let cancel = parent.child_token();
        let (frame_tx, frames) = watch::channel(Frame {
            slide: carousel.current(),
            progress: 0.0,
        });
        let (jumps, jump_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(carousel, config, frame_tx, jump_rx, cancel.clone()));
        Self {
            frames,
            jumps,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn frame(&self) -> Frame {
        *self.frames.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    /// Manual navigation. Restarts the timer for the chosen slide.
    pub fn go_to(&self, index: usize) {
        let _ = self.jumps.send(index);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    mut carousel: Carousel,
    config: CarouselConfig,
    frames: watch::Sender<Frame>,
    mut jumps: mpsc::UnboundedReceiver<usize>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + config.tick, config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut elapsed = Duration::ZERO;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                elapsed += config.tick;
                if elapsed >= config.interval {
                    elapsed = Duration::ZERO;
                    carousel.advance();
                }
            }
            Some(index) = jumps.recv() => {
                if carousel.go_to(index) {
                    elapsed = Duration::ZERO;
                }
            }
        }
        let progress = (elapsed.as_secs_f32() / config.interval.as_secs_f32()).min(1.0);
        frames.send_replace(Frame {
            slide: carousel.current(),
            progress,
        });
    }
    debug!(slides = carousel.len(), "carousel stopped");
}
