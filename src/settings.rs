use std::path::Path;

use config_file::FromConfigFile;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the link server listens on for remote clients.
    pub listen_addr: String,
    /// Address of the local olad OSC input.
    pub ola_addr: String,
    /// First DMX slot of the fixture; R/G/B occupy three consecutive slots.
    pub dmx_base_channel: u8,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            listen_addr: "0.0.0.0:7000".to_string(),
            ola_addr: "127.0.0.1:7770".to_string(),
            dmx_base_channel: 0,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, String> {
        match Settings::from_config_file(path) {
            Ok(settings) => Ok(settings),
            Err(error) => Err(format!(
                "Cannot read settings from {}: {}",
                path.display(),
                error
            )),
        }
    }
}
