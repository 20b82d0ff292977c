//! Frame timing.
//!
//! Elapsed time is the running sum of frame deltas rather than a wall-clock
//! reading, so a [`Clock`] with a fixed step replays a session exactly. Tests
//! and benches use that to step a scene through simulated seconds.
//!
//! ```ignore
//! let mut clock = Clock::new();
//! loop {
//!     scene.update(clock.tick(), &signal);
//! }
//! ```

use std::time::{Duration, Instant};

/// How often the FPS estimate refreshes.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Time values handed to every per-frame update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started, excluding pauses.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameTime {
    pub fn new(elapsed: f32, delta: f32) -> Self {
        Self { elapsed, delta }
    }
}

/// Counts frames within one FPS window.
#[derive(Debug, Clone, Copy)]
struct FpsWindow {
    started: Instant,
    frames: u32,
    rate: f32,
}

impl FpsWindow {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            frames: 0,
            rate: 0.0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let span = now.duration_since(self.started);
        if span >= FPS_WINDOW {
            self.rate = self.frames as f32 / span.as_secs_f32();
            self.frames = 0;
            self.started = now;
        }
    }
}

/// Render-loop clock.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    current: FrameTime,
    frames: u64,
    fps: FpsWindow,
    paused: bool,
    /// Replaces the measured delta when set.
    step: Option<f32>,
    scale: f32,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            current: FrameTime::default(),
            frames: 0,
            fps: FpsWindow::new(now),
            paused: false,
            step: None,
            scale: 1.0,
        }
    }

    /// Clock that advances by exactly `delta` seconds per tick.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.set_fixed_delta(Some(delta));
        clock
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let measured = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        if self.paused {
            self.current.delta = 0.0;
            return self.current;
        }

        let delta = self.step.unwrap_or(measured) * self.scale;
        self.current = FrameTime::new(self.current.elapsed + delta, delta);
        self.frames += 1;
        self.fps.record(now);
        self.current
    }

    /// Values of the most recent tick.
    #[inline]
    pub fn frame_time(&self) -> FrameTime {
        self.current
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.current.elapsed
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.current.delta
    }

    /// Ticks counted so far, excluding paused ones.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Wall-clock frame rate over the last window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps.rate
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    /// Freeze elapsed time. Ticks report a zero delta until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            // Time spent paused never reaches the next delta
            self.last_tick = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use `Some(step)` for deterministic ticks, `None` for measured ones.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.step = delta;
    }

    /// Multiply every delta by `scale`. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    /// Restart from zero, keeping the fixed step and scale.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_tick = now;
        self.current = FrameTime::default();
        self.frames = 0;
        self.fps = FpsWindow::new(now);
        self.paused = false;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
