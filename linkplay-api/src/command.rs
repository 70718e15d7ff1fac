//! Command construction for the `httpapi.asp` endpoint.
//!
//! A LinkPlay command is a name optionally followed by `:`-separated
//! parameters, e.g. `setPlayerCmd:vol:50` or
//! `wlanConnectApEx:ssid=4142:ch=0`. [`Command`] keeps the pieces apart until
//! the request is formatted.

use std::fmt;

/// Lowest volume level accepted by the device
pub const VOLUME_MIN: i32 = 0;
/// Highest volume level accepted by the device
pub const VOLUME_MAX: i32 = 100;

/// A single vendor command addressed to one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    params: Vec<String>,
}

impl Command {
    /// Create a command with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, value: impl fmt::Display) -> Self {
        self.params.push(value.to_string());
        self
    }

    /// Append several parameters in order
    pub fn params<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.params.extend(values.into_iter().map(|v| v.to_string()));
        self
    }

    /// Command name without parameters
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in the order they will be sent
    pub fn parameters(&self) -> &[String] {
        &self.params
    }

    /// `getStatus`: device information (name, firmware, MAC, ...)
    pub fn get_status() -> Self {
        Self::new("getStatus")
    }

    /// `getStatusEx`: extended device status
    pub fn get_status_ex() -> Self {
        Self::new("getStatusEx")
    }

    /// `getPlayerStatus`: playback state, volume, position
    pub fn get_player_status() -> Self {
        Self::new("getPlayerStatus")
    }

    /// `setPlayerCmd:vol:N` with `level` clamped to 0..=100
    pub fn set_volume(level: i32) -> Self {
        Self::player("vol").param(level.clamp(VOLUME_MIN, VOLUME_MAX))
    }

    pub fn play() -> Self {
        Self::player("play")
    }

    pub fn pause() -> Self {
        Self::player("pause")
    }

    pub fn next_track() -> Self {
        Self::player("next")
    }

    pub fn prev_track() -> Self {
        Self::player("prev")
    }

    fn player(action: &str) -> Self {
        Self::new("setPlayerCmd").param(action)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for param in &self.params {
            write!(f, ":{}", param)?;
        }
        Ok(())
    }
}

impl From<&str> for Command {
    /// Split an already formed command string on its first `:`.
    fn from(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((name, rest)) => Self::new(name).params(rest.split(':')),
            None => Self::new(raw),
        }
    }
}

/// Lowercase hex encoding of a UTF-8 string
pub fn hex_lower(value: &str) -> String {
    value.bytes().map(|b| format!("{:02x}", b)).collect()
}
