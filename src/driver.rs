//! Per-frame update/render driver
//!
//! The host (requestAnimationFrame on web, a plain loop natively) feeds
//! timestamps into `FrameDriver::step`, which turns them into deltas and runs
//! one update followed by one render.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::REFERENCE_HZ;

/// Something driven once per display refresh
pub trait Frame {
    /// Advance by `dt` seconds
    fn update(&mut self, dt: f32);
    /// Draw the current state; must not advance the simulation
    fn render(&mut self);
}

/// Shared cancellation flag for a running driver
#[derive(Debug, Clone)]
pub struct DriverHandle {
    running: Rc<Cell<bool>>,
}

impl Default for DriverHandle {
    fn default() -> Self {
        Self {
            running: Rc::new(Cell::new(true)),
        }
    }
}

impl DriverHandle {
    /// Stop the driver; no further frames run
    pub fn stop(&self) {
        if self.running.replace(false) {
            log::info!("Frame driver stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Turns host timestamps into update/render steps
#[derive(Debug, Default)]
pub struct FrameDriver {
    handle: DriverHandle,
    last_time_ms: Option<f64>,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that can stop this driver from elsewhere (input, unload)
    pub fn handle(&self) -> DriverHandle {
        self.handle.clone()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Real time since the previous timestamp (seconds)
    ///
    /// The first frame (and any timestamp that goes backwards) uses one
    /// reference frame. Long frames are passed through whole: the score is
    /// wall-clock time, and the simulation bounds its own motion step.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time_ms {
            Some(last) if now_ms >= last => ((now_ms - last) / 1000.0) as f32,
            _ => 1.0 / REFERENCE_HZ,
        };
        self.last_time_ms = Some(now_ms);
        dt
    }

    /// Run one update then one render. Returns false once stopped.
    pub fn step<F: Frame + ?Sized>(&mut self, frame: &mut F, now_ms: f64) -> bool {
        if !self.handle.is_running() {
            return false;
        }
        let dt = self.delta(now_ms);
        frame.update(dt);
        frame.render();
        self.frames += 1;
        true
    }

    /// Forget the last timestamp (after the page was hidden, say)
    pub fn reset_clock(&mut self) {
        self.last_time_ms = None;
    }
}
