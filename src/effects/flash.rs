use std::sync::{Arc, Mutex};
use std::thread;

use crate::effects::{gate, period, Gate, POLL_INTERVAL};
use crate::lightstate::{LightState, Mode};
use crate::output::OutputSink;

/// The seven non-black on/off combinations of the three channels, in the
/// order the fixture cycles through them.
const COMBINATIONS: [(u8, u8, u8); 7] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

const MIN_PERIOD: f32 = 0.05;
const MAX_PERIOD: f32 = 0.5;

/// Hard color cycle: every combination is held for one full period.
pub struct Flash {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
}

impl Flash {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> Flash {
        Flash { state, sink }
    }

    pub fn run(&mut self) {
        'cycle: loop {
            match gate(&self.state, Mode::Flash) {
                Gate::Exit => break 'cycle,
                Gate::Hold => {
                    self.sink.lock().unwrap().blackout();
                    thread::sleep(POLL_INTERVAL);
                    continue 'cycle;
                }
                Gate::Run { .. } => {}
            }

            for (red, green, blue) in COMBINATIONS {
                let alpha = match gate(&self.state, Mode::Flash) {
                    Gate::Exit => break 'cycle,
                    Gate::Hold => continue 'cycle,
                    Gate::Run { alpha } => alpha,
                };

                self.sink.lock().unwrap().set_rgb(red, green, blue);
                thread::sleep(period(alpha, MIN_PERIOD, MAX_PERIOD));
            }
        }

        self.sink.lock().unwrap().blackout();
    }
}
