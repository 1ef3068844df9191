use std::sync::{Arc, Mutex};

use crate::effects::{run_ramp, Direction, RampPlan, Segment};
use crate::lightstate::{LightState, Mode};
use crate::output::{Channel, OutputSink};

const ALL_CHANNELS: &[Channel] = &[Channel::Red, Channel::Green, Channel::Blue];

/// White breathing: all three channels ramp 0 -> 255 -> 0 in lock step,
/// holding a full period at each extremum.
const PLAN: RampPlan = RampPlan {
    mode: Mode::Strobe,
    min_period: 0.05,
    max_period: 0.8,
    pause_factor: 1.0,
    prelude: (0, 0, 0),
    segments: &[
        Segment {
            channels: ALL_CHANNELS,
            direction: Direction::Up,
        },
        Segment {
            channels: ALL_CHANNELS,
            direction: Direction::Down,
        },
    ],
};

pub struct Strobe {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
}

impl Strobe {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> Strobe {
        Strobe { state, sink }
    }

    pub fn run(&mut self) {
        run_ramp(&PLAN, &self.state, &self.sink);
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::output::testsink::MemorySink;

    #[test]
    fn ramps_all_channels_in_lock_step() {
        let state = Arc::new(Mutex::new(LightState::new()));
        state.lock().unwrap().mode = Mode::Strobe;
        let (sink, writes) = MemorySink::new();
        let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(sink));

        let thread_state = Arc::clone(&state);
        let thread_sink = Arc::clone(&sink);
        let handle = thread::spawn(move || Strobe::new(thread_state, thread_sink).run());

        thread::sleep(Duration::from_millis(40));
        state.lock().unwrap().mode = Mode::Solid;
        handle.join().unwrap();

        let writes = writes.lock().unwrap();
        // Skip the prelude and exit blackout triples; every step in between
        // writes the same intensity to R, G and B, ascending from 0.
        let steps = &writes[3..writes.len() - 3];
        assert!(steps.len() >= 3);
        let mut previous = 0;
        for triple in steps.chunks_exact(3) {
            let value = triple[0].1;
            assert_eq!(
                triple,
                &[
                    (Channel::Red, value),
                    (Channel::Green, value),
                    (Channel::Blue, value)
                ]
            );
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(
            &writes[writes.len() - 3..],
            &[(Channel::Red, 0), (Channel::Green, 0), (Channel::Blue, 0)]
        );
    }
}
