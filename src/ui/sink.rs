//! Output side of the simulation.
//!
//! The episode loop hands a [`FrameView`] to a [`FrameSink`] once per tick.
//! Sinks only draw and report whether the user asked to close; nothing they
//! do feeds back into the game.

use std::time::{Duration, Instant};

use ratatui::{backend::Backend, Terminal};

use super::input::close_requested;
use super::render::render;
use crate::config::DisplayConfig;
use crate::error::Result;
use crate::game::{Ball, Field, Paddle};

/// Everything drawn for one tick
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub field: Field,
    pub ball: &'a Ball,
    pub left: &'a Paddle,
    pub right: &'a Paddle,
    pub generation: usize,
    pub fitness: f64,
    /// Agents still playing in this generation
    pub active: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkSignal {
    Continue,
    /// The user closed the window
    Close,
}

pub trait FrameSink {
    fn present(&mut self, view: &FrameView<'_>) -> Result<SinkSignal>;
}

/// Draws nothing and never closes; runs as fast as the CPU allows
#[derive(Debug, Default)]
pub struct HeadlessSink {
    pub frames: u64,
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, _view: &FrameView<'_>) -> Result<SinkSignal> {
        self.frames += 1;
        Ok(SinkSignal::Continue)
    }
}

/// Renders into a ratatui terminal at a capped frame rate.
///
/// The terminal is borrowed so the caller can always restore it, whatever the
/// run returns.
pub struct TerminalSink<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    display: DisplayConfig,
    frame_duration: Duration,
}

impl<'a, B: Backend> TerminalSink<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, display: DisplayConfig) -> Self {
        let frame_duration = Duration::from_micros(1_000_000 / display.target_fps.max(1));
        Self {
            terminal,
            display,
            frame_duration,
        }
    }
}

impl<B: Backend> FrameSink for TerminalSink<'_, B> {
    fn present(&mut self, view: &FrameView<'_>) -> Result<SinkSignal> {
        let frame_start = Instant::now();

        if close_requested()? {
            return Ok(SinkSignal::Close);
        }

        let display = &self.display;
        self.terminal.draw(|f| render(f, view, display))?;

        limit_frame_rate(frame_start, self.frame_duration);
        Ok(SinkSignal::Continue)
    }
}

/// Sleep away whatever is left of the frame budget
pub fn limit_frame_rate(frame_start: Instant, frame_duration: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame_duration {
        std::thread::sleep(frame_duration - elapsed);
    }
}
