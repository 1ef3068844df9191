use std::sync::{Arc, Mutex};

use crate::effects::{run_ramp, Direction, RampPlan, Segment};
use crate::lightstate::{LightState, Mode};
use crate::output::{Channel, OutputSink};

/// One channel at a time ramps up and back down, R then G then B, with a
/// half-period rest between every leg. Exactly one channel is ever lit.
const PLAN: RampPlan = RampPlan {
    mode: Mode::Fade,
    min_period: 0.05,
    max_period: 1.8,
    pause_factor: 0.5,
    prelude: (0, 0, 0),
    segments: &[
        Segment {
            channels: &[Channel::Red],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Red],
            direction: Direction::Down,
        },
        Segment {
            channels: &[Channel::Green],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Green],
            direction: Direction::Down,
        },
        Segment {
            channels: &[Channel::Blue],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Blue],
            direction: Direction::Down,
        },
    ],
};

pub struct Fade {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
}

impl Fade {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> Fade {
        Fade { state, sink }
    }

    pub fn run(&mut self) {
        run_ramp(&PLAN, &self.state, &self.sink);
    }
}
