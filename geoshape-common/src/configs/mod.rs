use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Error;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

/// A structure to hold environment settings. Backed by a settings.json file
/// in the working directory; any field missing from the file keeps its
/// default value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    /// Reject headers with an unknown file code or version.
    pub strict_headers: bool,
    /// Load a whole seekable file into memory rather than streaming it.
    pub buffer_whole_file: bool,
    /// Chunk size, in bytes, used when streaming a main file.
    pub read_buffer_size: usize,
    /// Capacity, in bytes, of the buffered file sinks used by writers.
    pub write_buffer_size: usize,
}

impl Configs {
    pub fn new() -> Configs {
        Configs {
            verbose_mode: false,
            strict_headers: true,
            buffer_whole_file: true,
            read_buffer_size: 8 * 1024,
            write_buffer_size: 8 * 1024,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configs, Error> {
        let contents = fs::read_to_string(path)?;
        let configs: Configs = serde_json::from_str(&contents)?;
        Ok(configs)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let configs_json = serde_json::to_string_pretty(self)?;
        fs::write(path, configs_json)
    }
}

impl Default for Configs {
    fn default() -> Configs {
        Configs::new()
    }
}

fn settings_path() -> Result<PathBuf, Error> {
    Ok(std::env::current_dir()?.join(SETTINGS_FILE))
}

/// Reads settings.json from the working directory, falling back to the
/// defaults when the file does not exist.
pub fn get_configs() -> Result<Configs, Error> {
    let config_file = settings_path()?;
    if !config_file.exists() {
        return Ok(Configs::new());
    }
    Configs::load(config_file)
}

pub fn save_configs(configs: &Configs) -> Result<(), Error> {
    configs.save(settings_path()?)
}

#[cfg(test)]
mod test {
    use super::Configs;

    #[test]
    fn test_configs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut configs = Configs::new();
        configs.strict_headers = false;
        configs.read_buffer_size = 64;
        configs.save(&path).unwrap();
        assert_eq!(Configs::load(&path).unwrap(), configs);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "verbose_mode": true }"#).unwrap();
        let configs = Configs::load(&path).unwrap();
        assert!(configs.verbose_mode);
        assert!(configs.strict_headers);
        assert_eq!(configs.read_buffer_size, 8 * 1024);
    }

    #[test]
    fn test_malformed_settings_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Configs::load(&path).is_err());
    }
}
