#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Abstract intensity output for one fixture. The effect loops only ever
/// talk to this; the concrete driver lives in `olaoutput`.
pub trait OutputSink {
    fn set_channel(&mut self, channel: Channel, value: u8);

    fn set_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.set_channel(Channel::Red, red);
        self.set_channel(Channel::Green, green);
        self.set_channel(Channel::Blue, blue);
    }

    fn blackout(&mut self) {
        self.set_rgb(0, 0, 0);
    }
}
