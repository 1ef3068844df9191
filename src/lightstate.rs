#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Solid,
    Flash,
    Strobe,
    Fade,
    Smooth,
}

/// Shared record of what the fixture should currently show. Written by the
/// command dispatcher, read continuously by the active effect loop; always
/// accessed through an `Arc<Mutex<_>>`.
pub struct LightState {
    pub mode: Mode,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
    pub enabled: bool,
    pub shutdown: bool,
}

impl LightState {
    pub fn new() -> LightState {
        LightState {
            mode: Mode::Solid,
            red: 0,
            green: 0,
            blue: 0,
            alpha: 0,
            enabled: true,
            shutdown: false,
        }
    }
}
