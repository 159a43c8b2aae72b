//! Fixed timestep frame driver
//!
//! Owns the session, turns variable frame deltas into fixed simulation ticks
//! and forwards notifications to a presentation layer.

use crate::consts::*;
use crate::presentation::Presentation;
use crate::sim::{GameState, TickInput, tick};

/// Game instance driven once per rendered frame
pub struct FrameDriver {
    pub state: GameState,
    /// Input applied to every substep; one-shot flags are cleared after use
    pub input: TickInput,
    accumulator: f32,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl FrameDriver {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Run simulation ticks for a frame `dt` seconds long at wall time `time`
    /// (ms) and dispatch everything the ticks produced. Returns the number of
    /// substeps taken.
    pub fn update(&mut self, dt: f32, time: f64, presentation: &mut impl Presentation) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.advance_level = false;
            self.input.restart = false;
        }

        // Track frame times for FPS
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % 60;

        // Calculate FPS from oldest to newest frame
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (60000.0 / elapsed).round() as u32;
            }
        }

        for event in self.state.drain_events() {
            presentation.notify(&event);
        }
        presentation.sync_hud(&self.state.hud());

        substeps
    }
}
