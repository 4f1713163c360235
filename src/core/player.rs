//! Frame controller: current frame index plus timed playback.
//!
//! The player does not own any docks. It only decides which frame should be
//! on screen; the app turns every change into a `SetFrameEvent` and the
//! session pushes it to each dock.
//!
//! # Timing
//!
//! `update()` is called once per UI frame. While playing it advances by one
//! frame whenever at least `1000 / fps` ms have passed since the last tick,
//! wrapping back to frame 0 after the last frame. Manual stepping clamps at
//! both ends instead.

use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

pub const FPS_MIN: u32 = 1;
pub const FPS_MAX: u32 = 100;
pub const FPS_DEFAULT: u32 = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    frame: usize,
    num_frames: usize,
    playing: bool,
    fps: u32,

    #[serde(skip)]
    last_tick: Option<Instant>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Player {
    pub fn new(num_frames: usize) -> Self {
        Self {
            frame: 0,
            num_frames,
            playing: false,
            fps: FPS_DEFAULT,
            last_tick: None,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn last_frame(&self) -> usize {
        self.num_frames.saturating_sub(1)
    }

    /// Interval between playback ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / self.fps.max(FPS_MIN)))
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(FPS_MIN, FPS_MAX);
        debug!("Playback fps: {}", self.fps);
    }

    pub fn play(&mut self) {
        if self.num_frames == 0 {
            return;
        }
        self.playing = true;
        self.last_tick = None;
        debug!("Play from frame {}", self.frame);
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
        debug!("Paused at frame {}", self.frame);
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `frame`, clamped to the stack. Returns the frame now shown.
    pub fn set_frame(&mut self, frame: usize) -> usize {
        self.frame = frame.min(self.last_frame());
        self.frame
    }

    pub fn step_forward(&mut self) -> usize {
        self.set_frame(self.frame.saturating_add(1))
    }

    pub fn step_backward(&mut self) -> usize {
        self.set_frame(self.frame.saturating_sub(1))
    }

    /// Next frame, wrapping to 0 after the last one.
    pub fn advance(&mut self) -> usize {
        if self.num_frames > 0 {
            self.frame = (self.frame + 1) % self.num_frames;
        }
        self.frame
    }

    /// Playback tick. Returns the new frame when one was advanced.
    pub fn update(&mut self, now: Instant) -> Option<usize> {
        if !self.playing || self.num_frames == 0 {
            return None;
        }
        match self.last_tick {
            Some(last) if now.duration_since(last) >= self.tick_interval() => {
                self.last_tick = Some(now);
                let frame = self.advance();
                trace!("Playback tick -> frame {}", frame);
                Some(frame)
            }
            Some(_) => None,
            None => {
                self.last_tick = Some(now);
                None
            }
        }
    }

    /// Time left until the next tick, for scheduling a repaint.
    pub fn time_to_next_tick(&self, now: Instant) -> Option<Duration> {
        if !self.playing {
            return None;
        }
        let elapsed = self.last_tick.map(|t| now.duration_since(t)).unwrap_or_default();
        Some(self.tick_interval().saturating_sub(elapsed))
    }
}
