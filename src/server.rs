use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{Receiver, Sender};

use crate::protocol::{self, Command};

/// Serves the text protocol to one remote client at a time. A connecting
/// client first receives any status frames captured since the last
/// disconnect; afterwards its frames are decoded and queued for the
/// dispatcher. A disconnect queues a sync request so the state is ready
/// for the next client.
pub struct LinkServer {
    listener: TcpListener,
    commands: Sender<Command>,
    sync_frames: Receiver<String>,
}

impl LinkServer {
    pub fn new(
        listen_addr: SocketAddr,
        commands: Sender<Command>,
        sync_frames: Receiver<String>,
    ) -> Result<LinkServer, String> {
        let listener = match TcpListener::bind(listen_addr) {
            Ok(listener) => listener,
            Err(error) => return Err(error.to_string()),
        };

        Ok(LinkServer {
            listener,
            commands,
            sync_frames,
        })
    }

    pub fn run(&self) {
        loop {
            log::info!("Waiting for connection...");
            let (stream, peer_addr) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(error) => {
                    log::warn!("Failed to accept connection: {}", error);
                    continue;
                }
            };

            log::info!("Accepted connection from {}, syncing state...", peer_addr);
            self.sync_state(&stream);
            self.serve_client(stream);

            if self.commands.send(Command::RequestSync).is_err() {
                log::info!("Dispatcher gone, shutting down link server");
                return;
            }
            log::info!("Connection closed, state capture requested");
        }
    }

    fn sync_state(&self, mut stream: &TcpStream) {
        let mut synced = false;
        while let Ok(frame) = self.sync_frames.try_recv() {
            if let Err(error) = stream.write_all(frame.as_bytes()) {
                log::warn!("Failed to sync state: {}", error);
                return;
            }
            log::info!("State synced: {}", frame);
            synced = true;
        }
        if !synced {
            log::info!("Nothing to sync");
        }
    }

    fn serve_client(&self, mut stream: TcpStream) {
        let mut buf = [0u8; 1024];
        loop {
            let read_bytes = match stream.read(&mut buf) {
                Ok(0) => return,
                Ok(read_bytes) => read_bytes,
                Err(error) => {
                    log::warn!("Read error, dropping connection: {}", error);
                    return;
                }
            };

            let data = String::from_utf8_lossy(&buf[..read_bytes]);
            for command in protocol::decode_stream(&data) {
                log::info!("Received from device: {:?}", command);
                if self.commands.send(command).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::str::FromStr;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::lightstate::Mode;

    fn start_server() -> (
        SocketAddr,
        mpsc::Receiver<Command>,
        mpsc::Sender<String>,
    ) {
        let (command_tx, command_rx) = mpsc::channel();
        let (sync_tx, sync_rx) = mpsc::channel();
        let listen_addr = SocketAddr::from_str("127.0.0.1:0").unwrap();
        let server = LinkServer::new(listen_addr, command_tx, sync_rx).unwrap();
        let bound_addr = server.listener.local_addr().unwrap();
        thread::spawn(move || server.run());
        (bound_addr, command_rx, sync_tx)
    }

    #[test]
    fn decodes_client_frames_and_requests_sync_on_disconnect() {
        let (addr, command_rx, _sync_tx) = start_server();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"2_G0000005A;2_K0000000;").unwrap();
        drop(client);

        assert_eq!(
            command_rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            Command::SetMode {
                mode: Mode::Flash,
                alpha: 0x5a
            }
        );
        assert_eq!(
            command_rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            Command::SetEnabled(true)
        );
        // Disconnect is reported as a sync request
        assert_eq!(
            command_rx.recv_timeout(Duration::from_secs(1)).unwrap(),
            Command::RequestSync
        );
    }

    #[test]
    fn pending_state_is_sent_to_the_next_client() {
        let (addr, _command_rx, sync_tx) = start_server();

        sync_tx.send(";2_ff00ff80".to_string()).unwrap();
        let mut client = TcpStream::connect(addr).unwrap();
        client
            .set_read_timeout(Some(Duration::from_secs(1)))
            .unwrap();

        let mut buf = [0u8; 64];
        let read_bytes = client.read(&mut buf).unwrap();
        assert_eq!(&buf[..read_bytes], b";2_ff00ff80");
    }
}
