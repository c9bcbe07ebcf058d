/// Fixed-timestep scheduler.
///
/// Each poll samples the time source once. If the reading has not moved
/// since the last poll (`is_stalled`) the caller should yield. Otherwise
/// `maybe_advance` allows at most one tick whenever simulated time trails
/// real time; a slow host falls behind instead of running several ticks
/// back to back.

use std::time::{Duration, Instant};

/// Default simulation step in milliseconds.
pub const SIM_TIMESTEP_MS: u64 = 32;

/// Millisecond clock plus a way to give up the CPU.
pub trait TimeSource {
    /// Milliseconds since the first reading.
    fn now_millis(&mut self) -> u64;
    /// Sleep for `ms`; 0 just yields.
    fn sleep_millis(&mut self, ms: u64);
}

/// Wall clock anchored at its first reading.
#[derive(Default)]
pub struct MonotonicClock {
    anchor: Option<Instant>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { anchor: None }
    }
}

impl TimeSource for MonotonicClock {
    fn now_millis(&mut self) -> u64 {
        let anchor = *self.anchor.get_or_insert_with(Instant::now);
        u64::try_from(anchor.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_millis(&mut self, ms: u64) {
        if ms == 0 {
            std::thread::yield_now();
        } else {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
}

#[derive(Debug)]
pub struct SimulationClock {
    step_ms: u64,
    real_ms: u64,
    sim_ms: u64,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(step_ms: u64) -> Self {
        SimulationClock {
            step_ms: step_ms.max(1),
            real_ms: 0,
            sim_ms: 0,
            ticks: 0,
        }
    }

    /// True when `now_ms` is the reading already consumed; the caller
    /// should yield instead of polling again straight away.
    pub fn is_stalled(&self, now_ms: u64) -> bool {
        now_ms == self.real_ms
    }

    /// Feed one clock reading. `true` means the caller runs exactly one
    /// simulation step. A stalled reading never ticks.
    pub fn maybe_advance(&mut self, now_ms: u64) -> bool {
        if self.is_stalled(now_ms) {
            return false;
        }
        self.real_ms = now_ms;

        if self.sim_ms < self.real_ms {
            self.ticks += 1;
            self.sim_ms = self.ticks * self.step_ms;
            true
        } else {
            false
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// How far simulated time trails the last real reading.
    pub fn lag_millis(&self) -> u64 {
        self.real_ms.saturating_sub(self.sim_ms)
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        SimulationClock::new(SIM_TIMESTEP_MS)
    }
}
