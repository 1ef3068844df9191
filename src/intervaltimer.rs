use std::thread;
use std::time::{Duration, Instant};

/// Fixed-cadence sleep helper for polling loops.
pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
}

impl IntervalTimer {
    pub fn new(freq_hz: f32) -> IntervalTimer {
        let frame_duration_microsec = 1000.0 / freq_hz * 1000.0;

        IntervalTimer {
            interval: Duration::from_micros(frame_duration_microsec as u64),
            last_tick: Instant::now(),
        }
    }

    pub fn sleep_until_next_tick(&mut self) {
        let next_tick = if self.last_tick + self.interval > Instant::now() {
            self.last_tick + self.interval
        } else {
            log::debug!("Poll loop skipped a tick");
            Instant::now() + self.interval
        };

        thread::sleep(next_tick - Instant::now());
        self.last_tick = next_tick
    }
}
