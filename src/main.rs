pub(crate) mod dispatcher;
pub(crate) mod effects;
pub(crate) mod intervaltimer;
pub(crate) mod lightstate;
pub(crate) mod modecontrol;
pub(crate) mod olaoutput;
pub(crate) mod output;
pub(crate) mod protocol;
pub(crate) mod server;
pub(crate) mod settings;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::mpsc;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use clap::Parser;
use dispatcher::Dispatcher;
use lightstate::LightState;
use modecontrol::ModeControl;
use olaoutput::OlaOutput;
use output::OutputSink;
use server::LinkServer;
use settings::Settings;

#[derive(Parser)]
struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// Address to listen on for remote clients
    #[arg(short, long, value_name = "ADDR")]
    listen_addr: Option<String>,

    /// Address of the local olad OSC input
    #[arg(short, long, value_name = "ADDR")]
    ola_addr: Option<String>,
}

fn load_settings(args: &Cli) -> Result<Settings, String> {
    let mut settings = match args.config.as_deref() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(listen_addr) = args.listen_addr.as_deref() {
        settings.listen_addr = listen_addr.to_string();
    }
    if let Some(ola_addr) = args.ola_addr.as_deref() {
        settings.ola_addr = ola_addr.to_string();
    }

    Ok(settings)
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(msg) => panic!("Cannot load settings: {}", msg),
    };

    let listen_addr = match SocketAddr::from_str(&settings.listen_addr) {
        Ok(addr) => addr,
        Err(error) => panic!("Invalid listen address {}: {}", settings.listen_addr, error),
    };
    let ola_addr = match SocketAddr::from_str(&settings.ola_addr) {
        Ok(addr) => addr,
        Err(error) => panic!("Invalid OLA address {}: {}", settings.ola_addr, error),
    };

    let state = Arc::new(Mutex::new(LightState::new()));

    let ola = match OlaOutput::new(ola_addr, settings.dmx_base_channel) {
        Ok(ola) => ola,
        Err(msg) => panic!("Cannot set up OLA output: {}", msg),
    };
    let sink: Arc<Mutex<dyn OutputSink + Send>> = Arc::new(Mutex::new(ola));

    let (command_tx, command_rx) = mpsc::channel();
    let (sync_tx, sync_rx) = mpsc::channel();

    let modes = ModeControl::new(Arc::clone(&state), Arc::clone(&sink));
    let mut dispatcher = Dispatcher::new(command_rx, sync_tx, Arc::clone(&state), modes);

    let (done_tx, done_rx) = mpsc::channel();
    let ctrlc_tx = command_tx.clone();
    let res = ctrlc::set_handler(move || {
        log::info!("Shutting down");
        if ctrlc_tx.send(protocol::Command::Shutdown).is_err() {
            std::process::exit(0);
        }
        // The dispatcher joins the renderer, which blanks the fixture on
        // exit; wait for that instead of guessing at a grace period.
        done_rx.recv_timeout(Duration::from_secs(5)).ok();
        std::process::exit(0);
    });
    if let Err(error) = res {
        panic!("Failed to install signal handler: {}", error);
    }

    let res = thread::Builder::new()
        .name("Dispatcher".to_string())
        .spawn(move || {
            dispatcher.run();
            done_tx.send(()).ok();
        });
    if let Err(error) = res {
        panic!("Failed to create thread: {}", error);
    }

    let server = match LinkServer::new(listen_addr, command_tx, sync_rx) {
        Ok(server) => server,
        Err(msg) => panic!("Cannot set up link server: {}", msg),
    };
    server.run();
}
