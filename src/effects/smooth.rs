use std::sync::{Arc, Mutex};

use crate::effects::{run_ramp, Direction, RampPlan, Segment};
use crate::lightstate::{LightState, Mode};
use crate::output::{Channel, OutputSink};

/// Crossfading rainbow: while one channel ramps down the next has already
/// ramped up, so the fixture is never fully dark mid-cycle. The cycle is
/// primed with red at full intensity.
const PLAN: RampPlan = RampPlan {
    mode: Mode::Smooth,
    min_period: 0.025,
    max_period: 2.0,
    pause_factor: 1.0,
    prelude: (255, 0, 0),
    segments: &[
        Segment {
            channels: &[Channel::Green],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Red],
            direction: Direction::Down,
        },
        Segment {
            channels: &[Channel::Blue],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Green],
            direction: Direction::Down,
        },
        Segment {
            channels: &[Channel::Red],
            direction: Direction::Up,
        },
        Segment {
            channels: &[Channel::Blue],
            direction: Direction::Down,
        },
    ],
};

pub struct Smooth {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
}

impl Smooth {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> Smooth {
        Smooth { state, sink }
    }

    pub fn run(&mut self) {
        run_ramp(&PLAN, &self.state, &self.sink);
    }
}
