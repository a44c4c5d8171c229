// ABOUTME: Dispatcher configuration with serde defaults
// ABOUTME: Loadable from JSON so timeouts and queue sizes can be tuned without rebuilding

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tunables for a [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-call timeout in milliseconds; 0 waits for the transport indefinitely
    pub call_timeout_ms: u64,
    /// Capacity of each subscription's event queue
    pub event_queue_depth: usize,
    /// Forward calls to deprecated functions to their replacement
    pub follow_replacements: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 5_000,
            event_queue_depth: 64,
            follow_replacements: false,
        }
    }
}

impl ClientConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded client config from {}", path.display());
        Ok(config)
    }

    /// Reject values the dispatcher cannot work with
    pub fn validate(&self) -> Result<(), Error> {
        if self.event_queue_depth == 0 {
            return Err(Error::Config(
                "event_queue_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-call timeout, if enabled
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }

    /// Set the per-call timeout; `None` disables it
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout_ms =
            timeout.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }
}
