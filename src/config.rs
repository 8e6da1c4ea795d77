//! Configuration and CLI argument handling

use std::{fs, path::PathBuf};

use clap::Parser;
use tracing::warn;

/// Name of the per-user application directory
pub const APP_DIR_NAME: &str = "Espresso";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "espresso")]
#[command(about = "Keep your screen on and your system active for a chosen brew time")]
#[command(version)]
pub struct Config {
    /// Port the control surface listens on
    #[arg(short, long, default_value = "20580")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory for settings, lock file and materialized resources
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Files kept in the application directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    dir: PathBuf,
}

impl AppPaths {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Use `override_dir`, else the OS config dir, the working dir or the temp dir,
    /// and make sure the directory exists
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        let dir = override_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR_NAME)
        });

        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Could not create config dir {}: {}", dir.display(), e);
        }
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.dir.join("settings.json")
    }

    pub fn license_file(&self) -> PathBuf {
        self.dir.join("LICENSE.txt")
    }

    pub fn awake_icon(&self) -> PathBuf {
        self.dir.join("espresso.svg")
    }

    pub fn decaf_icon(&self) -> PathBuf {
        self.dir.join("espressoff.svg")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.dir.join("espresso.lock")
    }
}
