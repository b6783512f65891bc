//! Runtime configuration from the environment

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG: &str = "info";

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the auth API
    pub auth_url: Option<String>,
    pub bind: String,
    pub timeout: Duration,
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_url: None,
            bind: DEFAULT_BIND.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log: DEFAULT_LOG.into(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read `CASEGATE_*` variables
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(url) = get("CASEGATE_AUTH_URL").filter(|s| !s.trim().is_empty()) {
            cfg.auth_url = Some(url);
        }
        if let Some(bind) = get("CASEGATE_BIND") {
            cfg.bind = bind;
        }
        if let Some(secs) = get("CASEGATE_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Config(format!("CASEGATE_TIMEOUT_SECS is not a number: {secs}")))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(log) = get("CASEGATE_LOG") {
            cfg.log = log;
        }
        Ok(cfg)
    }

    /// Replace the port of `bind`, keeping the host
    pub fn with_port(mut self, port: u16) -> Self {
        let host = self.bind.rsplit_once(':').map(|(h, _)| h).unwrap_or("0.0.0.0");
        self.bind = format!("{host}:{port}");
        self
    }

    /// Apply `--auth-url`/`-a`, `--port`/`-p` and `--help`/`-h` on top of
    /// this config. `args` excludes the program name; unknown flags are
    /// ignored.
    pub fn apply_args<I: IntoIterator<Item = String>>(mut self, args: I) -> Result<Command> {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--auth-url" | "-a" => {
                    let url = args.next().ok_or_else(|| Error::Config(format!("{arg} needs a value")))?;
                    self.auth_url = Some(url);
                }
                "--port" | "-p" => {
                    let value = args.next().ok_or_else(|| Error::Config(format!("{arg} needs a value")))?;
                    let port = value.parse().map_err(|_| Error::Config(format!("invalid port: {value}")))?;
                    self = self.with_port(port);
                }
                "--help" | "-h" => return Ok(Command::Help),
                _ => {}
            }
        }
        Ok(Command::Run(self))
    }
}
