use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::lightstate::{LightState, Mode};
use crate::modecontrol::ModeControl;
use crate::protocol::{self, Command};

/// Single consumer of the inbound command queue. All state mutation runs
/// through here, strictly in arrival order, so commands never race each
/// other; only the active renderer reads the state concurrently.
pub struct Dispatcher {
    commands: Receiver<Command>,
    sync_frames: Sender<String>,
    state: Arc<Mutex<LightState>>,
    modes: ModeControl,
}

impl Dispatcher {
    pub fn new(
        commands: Receiver<Command>,
        sync_frames: Sender<String>,
        state: Arc<Mutex<LightState>>,
        modes: ModeControl,
    ) -> Dispatcher {
        Dispatcher {
            commands,
            sync_frames,
            state,
            modes,
        }
    }

    pub fn run(&mut self) {
        // One renderer owns the outputs from process start
        self.modes.set_mode(Mode::Solid);

        loop {
            match self.commands.recv() {
                Ok(command) => {
                    if !self.handle_command(command) {
                        return;
                    }
                }
                Err(_) => {
                    log::info!("Command queue closed, stopping renderer");
                    self.modes.shutdown();
                    return;
                }
            }
        }
    }

    /// Returns false once the dispatcher should stop consuming commands.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::SetColor {
                red,
                green,
                blue,
                alpha,
            } => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.red = red;
                    state.green = green;
                    state.blue = blue;
                    state.alpha = alpha;
                }
                self.modes.set_mode(Mode::Solid);
                true
            }
            Command::SetMode { mode, alpha } => {
                self.state.lock().unwrap().alpha = alpha;
                self.modes.set_mode(mode);
                true
            }
            Command::SetEnabled(enabled) => {
                self.state.lock().unwrap().enabled = enabled;
                true
            }
            Command::RequestSync => {
                let frame = protocol::encode_state(&self.state.lock().unwrap());
                log::info!("Link closed, capturing state: {}", frame);
                if self.sync_frames.send(frame).is_err() {
                    log::warn!("State sync queue closed, frame dropped");
                }
                true
            }
            Command::Shutdown => {
                // Joins the renderer, which blanks the fixture on its way out
                log::info!("Shutdown requested, stopping renderer");
                self.modes.shutdown();
                false
            }
        }
    }
}
