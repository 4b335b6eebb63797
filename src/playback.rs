//! Year cursor for the animated race view and the periodic ticker driving it.

use crate::filter::YearRange;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Playback state over a year range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    range: YearRange,
    cursor: i32,
    playing: bool,
}

impl Playback {
    /// Paused, positioned on the first year
    pub fn new(range: YearRange) -> Self {
        Self {
            range,
            cursor: range.start,
            playing: false,
        }
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playing. A cursor sitting on the last year rewinds first.
    pub fn play(&mut self) {
        if self.range.is_empty() {
            return;
        }
        if self.cursor >= self.range.end {
            self.cursor = self.range.start;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Move the cursor, clamped into the range. Returns the new position.
    pub fn seek(&mut self, year: i32) -> i32 {
        if !self.range.is_empty() {
            self.cursor = year.clamp(self.range.start, self.range.end);
        }
        self.cursor
    }

    /// Advance one year while playing. Reaching the last year stops playback;
    /// returns `None` when nothing moved.
    pub fn tick(&mut self) -> Option<i32> {
        if !self.playing {
            return None;
        }
        if self.cursor >= self.range.end {
            self.playing = false;
            return None;
        }
        self.cursor += 1;
        if self.cursor == self.range.end {
            self.playing = false;
        }
        Some(self.cursor)
    }
}

struct Run {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Runs a callback periodically on a background thread.
///
/// At most one run is live: `start` cancels and joins the previous run before
/// spawning the next one, and dropping the ticker stops it.
#[derive(Default)]
pub struct Ticker {
    run: Option<Run>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `on_tick` every `interval` until it returns `Break` or the ticker
    /// is stopped.
    pub fn start<F>(&mut self, interval: Duration, mut on_tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.stop();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                // park can wake early, so wait out the full deadline
                loop {
                    if flag.load(Ordering::Acquire) {
                        return;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
                if on_tick().is_break() {
                    return;
                }
                deadline += interval;
            }
        });
        debug!("Ticker started with a {:?} interval", interval);

        self.run = Some(Run { cancelled, handle });
    }

    /// Cancel the live run, if any, and wait for its thread to finish.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancelled.store(true, Ordering::Release);
            run.handle.thread().unpark();
            if run.handle.join().is_err() {
                debug!("Ticker callback panicked");
            }
        }
    }

    /// Whether a run is live and has not finished on its own
    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.handle.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
