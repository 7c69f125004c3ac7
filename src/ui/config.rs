use crate::debugger::SessionOptions;
use crate::{muted_error, weak_error};
use log::error;
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::Path;
use std::sync::OnceLock;

/// Application user interface config.
#[derive(Debug)]
pub struct UIConfig {
    /// Colorize output.
    pub colored: bool,
}

/// Read-only ui configuration (set only once, at application start).
static CONFIG: OnceLock<UIConfig> = OnceLock::new();

/// Set initial configuration.
pub fn set(config: UIConfig) {
    CONFIG.set(config).expect("should called once");
}

/// Return application ui config.
pub fn current() -> &'static UIConfig {
    CONFIG.get_or_init(|| UIConfig { colored: true })
}

/// Settings from a configuration file, all of them are optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Debugger executable name or path.
    pub gdb: Option<String>,
    /// Run debugee on its own terminal.
    pub show_output: Option<bool>,
    /// Stay at `main` after start.
    pub stop_at_main: Option<bool>,
    /// Echo debugger traffic to the console.
    pub echo: Option<bool>,
    /// Colorize output.
    pub color: Option<bool>,
}

impl FileConfig {
    const DEFAULT_PATH: &'static str = ".config/gdbpilot/config.toml";

    /// Load config from file. Missing default file is silently ignored, other errors are
    /// logged. Return [`None`] on errors.
    pub fn from_file(path: Option<&Path>) -> Option<Self> {
        let data = match path {
            None => {
                let path = home::home_dir()?;
                let path = path.join(Self::DEFAULT_PATH);
                muted_error!(read_to_string(path))?
            }
            Some(path) => match read_to_string(path) {
                Ok(data) => data,
                Err(err) => {
                    error!("Error while load config file: {err}");
                    return None;
                }
            },
        };

        weak_error!(Self::from_toml(&data), "malformed config file:")
    }

    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(data)
    }

    /// Apply file settings on top of defaults.
    pub fn apply(&self, mut options: SessionOptions) -> SessionOptions {
        if let Some(gdb) = &self.gdb {
            options.debugger = gdb.clone();
        }
        if let Some(show_output) = self.show_output {
            options.show_debugee_output = show_output;
        }
        if let Some(stop_at_main) = self.stop_at_main {
            options.stop_at_entry = stop_at_main;
        }
        if let Some(echo) = self.echo {
            options.echo_to_console = echo;
        }
        options
    }
}

/// Resolve debugger executable with `PATH` lookup, return name as is if it can not be found.
pub fn resolve_debugger(name: &str) -> String {
    if Path::new(name).exists() {
        return name.to_string();
    }
    match which::which(name) {
        Ok(path) => path.to_string_lossy().to_string(),
        Err(e) => {
            log::warn!(target: "debugger", "`{name}` not found in PATH: {e}");
            name.to_string()
        }
    }
}
