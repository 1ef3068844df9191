use crate::lightstate::{LightState, Mode};

// Frame layout, all ASCII with fixed offsets:
//   "2_G0000005a"  animated mode (G/H/I/J), alpha hex at 8..10
//   "2_K... / 2_L..."  output on / off
//   "2_ff00ff80"  solid color, RGBA hex pairs at 2..10
//   "0_A0000000"  internal disconnect notice
// Frames arrive concatenated, separated by ';'.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetColor { red: u8, green: u8, blue: u8, alpha: u8 },
    SetMode { mode: Mode, alpha: u8 },
    SetEnabled(bool),
    RequestSync,
    /// Process teardown. Queued by the signal handler, never decoded from
    /// the wire; the dispatcher stops the renderer before the process exits.
    Shutdown,
}

/// Splits a receive buffer into frames and decodes each one on its own.
/// Malformed frames are dropped; one bad frame never affects its neighbors.
pub fn decode_stream(data: &str) -> Vec<Command> {
    data.split(';')
        .filter(|segment| !segment.is_empty())
        .filter_map(decode_frame)
        .collect()
}

pub fn decode_frame(segment: &str) -> Option<Command> {
    let bytes = segment.as_bytes();
    if bytes.len() < 3 {
        log::warn!("Dropping truncated frame: {:?}", segment);
        return None;
    }

    match bytes[0] {
        b'2' => decode_light_frame(segment),
        b'0' => match bytes[2] {
            b'A' => Some(Command::RequestSync),
            _ => {
                log::warn!("Unexpected internal frame: {:?}", segment);
                None
            }
        },
        _ => {
            log::warn!("Unexpected channel selector in frame: {:?}", segment);
            None
        }
    }
}

fn decode_light_frame(segment: &str) -> Option<Command> {
    let bytes = segment.as_bytes();
    match bytes[2] {
        b'G' => decode_mode_frame(segment, Mode::Flash),
        b'H' => decode_mode_frame(segment, Mode::Strobe),
        b'I' => decode_mode_frame(segment, Mode::Fade),
        b'J' => decode_mode_frame(segment, Mode::Smooth),
        b'K' => Some(Command::SetEnabled(true)),
        b'L' => Some(Command::SetEnabled(false)),
        _ => decode_color_frame(segment),
    }
}

fn decode_mode_frame(segment: &str, mode: Mode) -> Option<Command> {
    match hex_pair(segment, 8) {
        Some(alpha) => Some(Command::SetMode { mode, alpha }),
        None => {
            log::warn!("Dropping malformed mode frame: {:?}", segment);
            None
        }
    }
}

fn decode_color_frame(segment: &str) -> Option<Command> {
    let color = (
        hex_pair(segment, 2),
        hex_pair(segment, 4),
        hex_pair(segment, 6),
        hex_pair(segment, 8),
    );
    match color {
        (Some(red), Some(green), Some(blue), Some(alpha)) => Some(Command::SetColor {
            red,
            green,
            blue,
            alpha,
        }),
        _ => {
            log::warn!("Dropping malformed color frame: {:?}", segment);
            None
        }
    }
}

/// Two hex characters at a fixed byte offset. None if the frame is too
/// short or the characters are not hexadecimal digits.
fn hex_pair(segment: &str, offset: usize) -> Option<u8> {
    let digits = segment.as_bytes().get(offset..offset + 2)?;
    let digits = std::str::from_utf8(digits).ok()?;
    u8::from_str_radix(digits, 16).ok()
}

/// Encodes the current state as a status frame for a (re)connecting client.
pub fn encode_state(state: &LightState) -> String {
    match state.mode {
        Mode::Solid => format!(
            ";2_{:02x}{:02x}{:02x}{:02x}",
            state.red, state.green, state.blue, state.alpha
        ),
        Mode::Flash => format!(";2_G00000{:02x}", state.alpha),
        Mode::Strobe => format!(";2_H00000{:02x}", state.alpha),
        Mode::Fade => format!(";2_I00000{:02x}", state.alpha),
        Mode::Smooth => format!(";2_J00000{:02x}", state.alpha),
    }
}
