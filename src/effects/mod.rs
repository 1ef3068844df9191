pub(crate) mod fade;
pub(crate) mod flash;
pub(crate) mod smooth;
pub(crate) mod solid;
pub(crate) mod strobe;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::lightstate::{LightState, Mode};
use crate::output::{Channel, OutputSink};

/// Cadence of the blanked idle loop while the fixture is disabled.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Animation period for the given alpha, mapped onto a per-mode range.
/// Alpha 0 gives the fastest animation, 255 the slowest.
pub fn period(alpha: u8, min_s: f32, max_s: f32) -> Duration {
    Duration::from_secs_f32(f32::from(alpha) * (max_s - min_s) / 255.0 + min_s)
}

/// What an effect loop is allowed to do at its next step.
pub enum Gate {
    /// Keep rendering; carries the current speed-control alpha.
    Run { alpha: u8 },
    /// Fixture is disabled; blank the outputs and idle.
    Hold,
    /// Mode changed or the process is shutting down; blank and return.
    Exit,
}

/// Every effect loop consults this at each suspension point. The contract
/// on `Exit` is to blank all channels before returning so the successor
/// renderer starts from a dark fixture.
pub fn gate(state: &Arc<Mutex<LightState>>, own_mode: Mode) -> Gate {
    let state = state.lock().unwrap();
    if state.mode != own_mode || state.shutdown {
        Gate::Exit
    } else if !state.enabled {
        Gate::Hold
    } else {
        Gate::Run { alpha: state.alpha }
    }
}

#[derive(Clone, Copy)]
pub enum Direction {
    Up,
    Down,
}

/// One leg of a ramp cycle: the listed channels move through 0..=255 in
/// lock step, up or down.
pub struct Segment {
    pub channels: &'static [Channel],
    pub direction: Direction,
}

/// Timing and channel sequence for one ramping mode. Strobe, fade and
/// smooth only differ in these parameters; `run_ramp` is the one loop
/// driving all three.
pub struct RampPlan {
    pub mode: Mode,
    pub min_period: f32,
    pub max_period: f32,
    /// Pause between segments, as a fraction of the current period.
    pub pause_factor: f32,
    /// Channel values written once before the first cycle.
    pub prelude: (u8, u8, u8),
    pub segments: &'static [Segment],
}

pub fn run_ramp(
    plan: &RampPlan,
    state: &Arc<Mutex<LightState>>,
    sink: &Arc<Mutex<dyn OutputSink + Send>>,
) {
    {
        let (red, green, blue) = plan.prelude;
        sink.lock().unwrap().set_rgb(red, green, blue);
    }

    'cycle: loop {
        match gate(state, plan.mode) {
            Gate::Exit => break 'cycle,
            Gate::Hold => {
                sink.lock().unwrap().blackout();
                thread::sleep(POLL_INTERVAL);
                // A disable always restarts the cycle from its first segment
                continue 'cycle;
            }
            Gate::Run { .. } => {}
        }

        for segment in plan.segments {
            for value in ramp_values(segment.direction) {
                let alpha = match gate(state, plan.mode) {
                    Gate::Exit => break 'cycle,
                    Gate::Hold => continue 'cycle,
                    Gate::Run { alpha } => alpha,
                };

                {
                    let mut sink = sink.lock().unwrap();
                    for channel in segment.channels {
                        sink.set_channel(*channel, value);
                    }
                }
                // Re-derived every step so alpha changes apply mid-ramp
                let step = period(alpha, plan.min_period, plan.max_period).mul_f32(0.01);
                thread::sleep(step);
            }

            let alpha = match gate(state, plan.mode) {
                Gate::Exit => break 'cycle,
                Gate::Hold => continue 'cycle,
                Gate::Run { alpha } => alpha,
            };
            let pause = period(alpha, plan.min_period, plan.max_period).mul_f32(plan.pause_factor);
            thread::sleep(pause);
        }
    }

    sink.lock().unwrap().blackout();
}

// The up leg stops at 254; the down leg owns the 255 extremum, so a full
// up/down cycle holds the peak for exactly one step.
fn ramp_values(direction: Direction) -> Box<dyn Iterator<Item = u8>> {
    match direction {
        Direction::Up => Box::new(0..255),
        Direction::Down => Box::new((0..=255).rev()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::output::testsink::MemorySink;

    #[test]
    fn period_interpolates_linearly() {
        assert_eq!(period(0, 0.05, 0.5), Duration::from_secs_f32(0.05));
        assert_eq!(period(255, 0.05, 0.5), Duration::from_secs_f32(0.5));
        // Worked example: flash at alpha 0x5a sits near 0.2088 s
        let mid = period(0x5a, 0.05, 0.5);
        assert!((mid.as_secs_f32() - 0.2088).abs() < 0.001);
    }

    const SINGLE_UP: &[Segment] = &[Segment {
        channels: &[Channel::Red],
        direction: Direction::Up,
    }];

    const TEST_PLAN: RampPlan = RampPlan {
        mode: Mode::Fade,
        min_period: 0.05,
        max_period: 0.05,
        pause_factor: 0.0,
        prelude: (0, 0, 0),
        segments: SINGLE_UP,
    };

    #[test]
    fn ramp_steps_up_and_blanks_on_exit() {
        let state = Arc::new(Mutex::new(LightState::new()));
        state.lock().unwrap().mode = Mode::Fade;
        let (sink, writes) = MemorySink::new();
        let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(sink));

        let thread_state = Arc::clone(&state);
        let thread_sink = Arc::clone(&sink);
        let handle = thread::spawn(move || run_ramp(&TEST_PLAN, &thread_state, &thread_sink));

        thread::sleep(Duration::from_millis(40));
        state.lock().unwrap().mode = Mode::Solid;
        handle.join().unwrap();

        let writes = writes.lock().unwrap();
        // Prelude triple, then single red steps, then the exit blackout triple
        assert_eq!(
            &writes[..3],
            &[(Channel::Red, 0), (Channel::Green, 0), (Channel::Blue, 0)]
        );
        let steps = &writes[3..writes.len() - 3];
        assert!(!steps.is_empty());
        let mut previous = 0;
        for (channel, value) in steps {
            assert_eq!(*channel, Channel::Red);
            assert!(*value >= previous);
            previous = *value;
        }
        assert_eq!(
            &writes[writes.len() - 3..],
            &[(Channel::Red, 0), (Channel::Green, 0), (Channel::Blue, 0)]
        );
    }

    #[test]
    fn ramp_legs_visit_the_peak_once() {
        let up: Vec<u8> = ramp_values(Direction::Up).collect();
        let down: Vec<u8> = ramp_values(Direction::Down).collect();

        assert_eq!(up.first(), Some(&0));
        assert_eq!(up.last(), Some(&254));
        assert_eq!(down.first(), Some(&255));
        assert_eq!(down.last(), Some(&0));
        // One full up/down cycle writes 255 exactly once
        assert_eq!(up.iter().filter(|value| **value == 255).count(), 0);
        assert_eq!(down.iter().filter(|value| **value == 255).count(), 1);
    }

    // Wide period range so an alpha flip is visible in the write cadence:
    // alpha 0 steps every 0.5 ms, alpha 255 every 50 ms.
    const ALPHA_SPREAD_PLAN: RampPlan = RampPlan {
        mode: Mode::Fade,
        min_period: 0.05,
        max_period: 5.0,
        pause_factor: 0.0,
        prelude: (0, 0, 0),
        segments: SINGLE_UP,
    };

    #[test]
    fn alpha_change_slows_the_ramp_without_restarting_it() {
        let state = Arc::new(Mutex::new(LightState::new()));
        state.lock().unwrap().mode = Mode::Fade;
        let (sink, writes) = MemorySink::new();
        let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(sink));

        let thread_state = Arc::clone(&state);
        let thread_sink = Arc::clone(&sink);
        let handle =
            thread::spawn(move || run_ramp(&ALPHA_SPREAD_PLAN, &thread_state, &thread_sink));

        thread::sleep(Duration::from_millis(30));
        state.lock().unwrap().alpha = 255;
        let before_flip = writes.lock().unwrap().len();
        thread::sleep(Duration::from_millis(150));
        let after_flip = writes.lock().unwrap().len();

        state.lock().unwrap().shutdown = true;
        handle.join().unwrap();

        // The fast phase produced many steps, the slow phase only a handful:
        // every post-flip iteration sleeps at least 50 ms.
        assert!(before_flip - 3 >= 5);
        assert!(after_flip - before_flip >= 1);
        assert!(after_flip - before_flip <= 10);

        // The ramp carried on from where it was; a restart would show a
        // drop back to zero somewhere in the step sequence.
        let writes = writes.lock().unwrap();
        let steps = &writes[3..writes.len() - 3];
        let mut previous = 0;
        for (channel, value) in steps {
            assert_eq!(*channel, Channel::Red);
            assert!(*value >= previous);
            previous = *value;
        }
    }

    #[test]
    fn reenable_restarts_the_cycle_from_its_first_segment() {
        let state = Arc::new(Mutex::new(LightState::new()));
        state.lock().unwrap().mode = Mode::Fade;
        let (sink, writes) = MemorySink::new();
        let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(sink));

        let thread_state = Arc::clone(&state);
        let thread_sink = Arc::clone(&sink);
        let handle = thread::spawn(move || run_ramp(&TEST_PLAN, &thread_state, &thread_sink));

        thread::sleep(Duration::from_millis(20));
        state.lock().unwrap().enabled = false;
        thread::sleep(Duration::from_millis(40));
        state.lock().unwrap().enabled = true;
        thread::sleep(Duration::from_millis(30));

        state.lock().unwrap().shutdown = true;
        handle.join().unwrap();

        let writes = writes.lock().unwrap();
        // The ramp had moved off zero before the disable
        assert_eq!(writes[4], (Channel::Red, 1));

        // Everything between the last disabled blackout (its final write
        // hits Blue) and the exit blackout is the restarted first segment,
        // ramping up from zero again.
        let tail = &writes[..writes.len() - 3];
        let last_blackout_end = tail
            .iter()
            .rposition(|write| write.0 == Channel::Blue)
            .expect("no blackout while disabled");
        let steps = &tail[last_blackout_end + 1..];
        assert!(!steps.is_empty());
        assert_eq!(steps[0], (Channel::Red, 0));
        let mut previous = 0;
        for (channel, value) in steps {
            assert_eq!(*channel, Channel::Red);
            assert!(*value >= previous);
            previous = *value;
        }
    }

    #[test]
    fn ramp_holds_dark_while_disabled() {
        let state = Arc::new(Mutex::new(LightState::new()));
        state.lock().unwrap().mode = Mode::Fade;
        let (sink, writes) = MemorySink::new();
        let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(sink));

        let thread_state = Arc::clone(&state);
        let thread_sink = Arc::clone(&sink);
        let handle = thread::spawn(move || run_ramp(&TEST_PLAN, &thread_state, &thread_sink));

        thread::sleep(Duration::from_millis(20));
        state.lock().unwrap().enabled = false;
        thread::sleep(Duration::from_millis(40));

        {
            let writes = writes.lock().unwrap();
            assert_eq!(
                &writes[writes.len() - 3..],
                &[(Channel::Red, 0), (Channel::Green, 0), (Channel::Blue, 0)]
            );
        }

        state.lock().unwrap().shutdown = true;
        handle.join().unwrap();
    }
}
