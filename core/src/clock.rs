//! Simulation clock: pause and speed control for the tick driver.
//!
//! The clock never schedules anything itself; the driver asks it how
//! many ticks to run per real second and whether it may tick at all.

use serde::{Deserialize, Serialize};

/// Seconds of game time advanced by one tick.
pub const TICK_DELTA: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub speed:  SimSpeed,
    pub paused: bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            speed:  SimSpeed::Normal,
            paused: true,
        }
    }

    pub fn pause(&mut self)  { self.paused = true;  }
    pub fn resume(&mut self) { self.paused = false; }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        self.speed = speed;
    }

    pub fn ticks_per_real_second(&self) -> u32 {
        match self.speed {
            SimSpeed::Normal      => 1,
            SimSpeed::Accelerated => 5,
            SimSpeed::FastForward => 30,
        }
    }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    Normal,       // 1 tick per real second
    Accelerated,  // 5 ticks per real second
    FastForward,  // 30 ticks per real second
}
