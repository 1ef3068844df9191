use std::{
    net::{SocketAddr, UdpSocket},
    str::FromStr,
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::output::{Channel, OutputSink};

const UNIVERSE_SIZE: usize = 512;

/// Drives the fixture through a local olad instance: the three color
/// channels live at consecutive slots of a DMX universe that is sent as an
/// OSC blob after every write.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    base_channel: u8,
    universe: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr, base_channel: u8) -> Result<Self, String> {
        let our_addr = SocketAddr::from_str("127.0.0.1:0").unwrap();
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        Ok(OlaOutput {
            sock,
            target_addr,
            base_channel,
            universe: vec![0; UNIVERSE_SIZE],
        })
    }

    fn slot(&self, channel: Channel) -> usize {
        let offset = match channel {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        };
        self.base_channel as usize + offset
    }

    fn flush(&mut self) {
        let msg_buf = encoder::encode(&OscPacket::Message(OscMessage {
            addr: "/dmx/universe/0".to_string(),
            args: vec![OscType::Blob(Vec::clone(&self.universe))],
        }))
        .unwrap();
        if let Err(error) = self.sock.send_to(&msg_buf, self.target_addr) {
            log::warn!("Failed to send DMX universe to olad: {}", error);
        }
    }
}

impl OutputSink for OlaOutput {
    fn set_channel(&mut self, channel: Channel, value: u8) {
        let slot = self.slot(channel);
        self.universe[slot] = value;
        self.flush();
    }

    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        // Patch all three slots first so one datagram carries the whole color.
        let base = self.slot(Channel::Red);
        self.universe[base] = red;
        self.universe[base + 1] = green;
        self.universe[base + 2] = blue;
        self.flush();
    }
}
