use std::sync::{Arc, Mutex};
use std::thread;

use crate::effects::fade::Fade;
use crate::effects::flash::Flash;
use crate::effects::smooth::Smooth;
use crate::effects::solid::Solid;
use crate::effects::strobe::Strobe;
use crate::lightstate::{LightState, Mode};
use crate::output::OutputSink;

struct Session {
    mode: Mode,
    handle: thread::JoinHandle<()>,
}

/// Owns the single live renderer thread. A mode switch writes the new mode
/// into the shared state, waits for the old renderer to observe it and
/// drain out (it blanks the fixture on the way), and only then starts the
/// replacement. Two renderers never write the outputs concurrently.
pub struct ModeControl {
    state: Arc<Mutex<LightState>>,
    sink: Arc<Mutex<dyn OutputSink + Send>>,
    session: Option<Session>,
    sessions_started: u32,
}

impl ModeControl {
    pub fn new(
        state: Arc<Mutex<LightState>>,
        sink: Arc<Mutex<dyn OutputSink + Send>>,
    ) -> ModeControl {
        ModeControl {
            state,
            sink,
            session: None,
            sessions_started: 0,
        }
    }

    pub fn set_mode(&mut self, target: Mode) {
        if let Some(session) = &self.session {
            if session.mode == target {
                return;
            }
        }

        // The running loop exits once it sees the mode change
        self.state.lock().unwrap().mode = target;

        if let Some(session) = self.session.take() {
            log::debug!("Waiting for {:?} renderer to stop", session.mode);
            if session.handle.join().is_err() {
                log::error!("{:?} renderer panicked", session.mode);
            }
        }

        let state = Arc::clone(&self.state);
        let sink = Arc::clone(&self.sink);
        let res = thread::Builder::new()
            .name(format!("{:?}", target))
            .spawn(move || match target {
                Mode::Solid => Solid::new(state, sink).run(),
                Mode::Flash => Flash::new(state, sink).run(),
                Mode::Strobe => Strobe::new(state, sink).run(),
                Mode::Fade => Fade::new(state, sink).run(),
                Mode::Smooth => Smooth::new(state, sink).run(),
            });
        let handle = match res {
            Ok(handle) => handle,
            Err(error) => panic!("Failed to create thread: {}", error),
        };

        log::info!("Switched to {:?} mode", target);
        self.session = Some(Session {
            mode: target,
            handle,
        });
        self.sessions_started += 1;
    }

    /// Stops the live renderer for process teardown; the fixture ends dark.
    pub fn shutdown(&mut self) {
        self.state.lock().unwrap().shutdown = true;
        if let Some(session) = self.session.take() {
            if session.handle.join().is_err() {
                log::error!("{:?} renderer panicked", session.mode);
            }
        }
    }

    #[cfg(test)]
    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }
}
