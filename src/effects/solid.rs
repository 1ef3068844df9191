use std::sync::{Arc, Mutex};

use crate::intervaltimer::IntervalTimer;
use crate::lightstate::{LightState, Mode};
use crate::output::{Channel, OutputSink};

/// Holds a static color, scaled by alpha. Polls the shared state and only
/// rewrites channels whose source value changed since the last write.
pub struct Solid {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
    timer: IntervalTimer,
}

fn scaled(value: u8, alpha: u8) -> u8 {
    (u16::from(value) * u16::from(alpha) / 255) as u8
}

impl Solid {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> Solid {
        Solid {
            state,
            sink,
            timer: IntervalTimer::new(100.0),
        }
    }

    pub fn run(&mut self) {
        // None forces a full rewrite on the next enabled iteration
        let mut last_written: Option<(u8, u8, u8, u8)> = None;

        loop {
            let (red, green, blue, alpha, enabled) = {
                let state = self.state.lock().unwrap();
                if state.mode != Mode::Solid || state.shutdown {
                    break;
                }
                (
                    state.red,
                    state.green,
                    state.blue,
                    state.alpha,
                    state.enabled,
                )
            };

            if !enabled {
                self.sink.lock().unwrap().blackout();
                last_written = None;
            } else {
                match last_written {
                    Some((last_red, last_green, last_blue, last_alpha)) => {
                        let mut sink = self.sink.lock().unwrap();
                        if alpha != last_alpha {
                            // Alpha rescales every channel
                            sink.set_rgb(
                                scaled(red, alpha),
                                scaled(green, alpha),
                                scaled(blue, alpha),
                            );
                        } else {
                            if red != last_red {
                                sink.set_channel(Channel::Red, scaled(red, alpha));
                            }
                            if green != last_green {
                                sink.set_channel(Channel::Green, scaled(green, alpha));
                            }
                            if blue != last_blue {
                                sink.set_channel(Channel::Blue, scaled(blue, alpha));
                            }
                        }
                    }
                    None => {
                        self.sink.lock().unwrap().set_rgb(
                            scaled(red, alpha),
                            scaled(green, alpha),
                            scaled(blue, alpha),
                        );
                    }
                }
                last_written = Some((red, green, blue, alpha));
            }

            self.timer.sleep_until_next_tick();
        }

        self.sink.lock().unwrap().blackout();
    }
}
