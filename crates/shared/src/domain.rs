use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{EndpointError, PercentOutOfRange};

pub const DEFAULT_SPEED: u8 = 50;
pub const DEFAULT_BATTERY: u8 = 85;
pub const DEFAULT_ENDPOINT: &str = "ws://192.168.4.1:81";

/// Integer percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const MIN: Percent = Percent(0);
    pub const MAX: Percent = Percent(100);

    /// Clamps any integer into range. Out-of-range input is never an error.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = PercentOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 100 {
            return Err(PercentOutOfRange { value });
        }
        Ok(Self(value))
    }
}

impl From<Percent> for u8 {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Neutral,
    Forward,
    Reverse,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Neutral,
        Direction::Forward,
        Direction::Reverse,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Neutral => "Neutral",
            Direction::Forward => "Forward",
            Direction::Reverse => "Reverse",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operator's current intent. Every push carries one of these in full.
///
/// Fields are only reachable through the setters so the speed clamp holds for
/// every value that exists in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandState {
    direction: Direction,
    speed: Percent,
    headlights_on: bool,
    horn_on: bool,
    battery: Percent,
}

impl Default for CommandState {
    fn default() -> Self {
        Self {
            direction: Direction::Neutral,
            speed: Percent(DEFAULT_SPEED),
            headlights_on: false,
            horn_on: false,
            battery: Percent(DEFAULT_BATTERY),
        }
    }
}

impl CommandState {
    /// Startup state with a configured initial speed and battery display value.
    pub fn with_initial(speed: i64, battery: i64) -> Self {
        Self {
            speed: Percent::clamped(speed),
            battery: Percent::clamped(battery),
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> u8 {
        self.speed.get()
    }

    pub fn headlights_on(&self) -> bool {
        self.headlights_on
    }

    pub fn horn_on(&self) -> bool {
        self.horn_on
    }

    pub fn battery(&self) -> u8 {
        self.battery.get()
    }

    /// Leaves `speed` untouched.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// A released direction button keeps the vehicle moving in the last
    /// commanded direction until `stop` or another direction.
    pub fn release_direction(&mut self) {}

    pub fn set_speed(&mut self, value: i64) {
        self.speed = Percent::clamped(value);
    }

    pub fn set_headlights(&mut self, on: bool) {
        self.headlights_on = on;
    }

    pub fn set_horn(&mut self, on: bool) {
        self.horn_on = on;
    }

    pub fn stop(&mut self) {
        self.direction = Direction::Neutral;
        self.speed = Percent::MIN;
    }
}

/// Fixed device address. Only `ws://` and `wss://` URLs with a host are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let trimmed = input.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("ws://{trimmed}")
        };
        let url = Url::parse(&candidate).map_err(|source| EndpointError::Parse {
            input: trimmed.to_string(),
            source,
        })?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(trimmed.to_string()));
        }

        Ok(Self { url })
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
