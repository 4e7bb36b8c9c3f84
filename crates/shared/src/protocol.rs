use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{CommandState, Direction},
    error::IntentParseError,
};

/// Discrete operator actions raised by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    SetDirection(Direction),
    ReleaseDirection,
    Stop,
    SetSpeed(i64),
    SetHeadlights(bool),
    SetHorn(bool),
    ToggleHeadlights,
    ToggleHorn,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetDirection(_) => "set_direction",
            Intent::ReleaseDirection => "release_direction",
            Intent::Stop => "stop",
            Intent::SetSpeed(_) => "set_speed",
            Intent::SetHeadlights(_) => "set_headlights",
            Intent::SetHorn(_) => "set_horn",
            Intent::ToggleHeadlights => "toggle_headlights",
            Intent::ToggleHorn => "toggle_horn",
        }
    }
}

impl CommandState {
    /// Returns the snapshot that follows `intent`. `self` is left untouched.
    pub fn apply(mut self, intent: Intent) -> CommandState {
        match intent {
            Intent::SetDirection(direction) => self.set_direction(direction),
            Intent::ReleaseDirection => self.release_direction(),
            Intent::Stop => self.stop(),
            Intent::SetSpeed(value) => self.set_speed(value),
            Intent::SetHeadlights(on) => self.set_headlights(on),
            Intent::SetHorn(on) => self.set_horn(on),
            Intent::ToggleHeadlights => {
                let on = !self.headlights_on();
                self.set_headlights(on);
            }
            Intent::ToggleHorn => {
                let on = !self.horn_on();
                self.set_horn(on);
            }
        }
        self
    }
}

/// Wire form of a push: one compact JSON object carrying all five fields.
pub fn encode_snapshot<T: Serialize + ?Sized>(record: &T) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

pub fn decode_snapshot(text: &str) -> serde_json::Result<CommandState> {
    serde_json::from_str(text)
}

/// Console line commands, e.g. `forward`, `speed 72`, `horn toggle`.
impl FromStr for Intent {
    type Err = IntentParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Err(IntentParseError::Empty);
        };
        let argument = parts.next();

        let intent = match command.to_ascii_lowercase().as_str() {
            "forward" | "up" | "w" => Intent::SetDirection(Direction::Forward),
            "reverse" | "back" | "down" | "s" => Intent::SetDirection(Direction::Reverse),
            "left" | "a" => Intent::SetDirection(Direction::Left),
            "right" | "d" => Intent::SetDirection(Direction::Right),
            "neutral" => Intent::SetDirection(Direction::Neutral),
            "release" => Intent::ReleaseDirection,
            "stop" | "x" => Intent::Stop,
            "speed" => {
                let value = argument.ok_or(IntentParseError::MissingArgument {
                    command: "speed",
                    expected: "an integer",
                })?;
                let value = value
                    .parse::<i64>()
                    .map_err(|_| IntentParseError::InvalidArgument {
                        command: "speed",
                        value: value.to_string(),
                        expected: "an integer",
                    })?;
                Intent::SetSpeed(value)
            }
            "lights" | "headlights" => match parse_switch("lights", argument)? {
                Switch::On => Intent::SetHeadlights(true),
                Switch::Off => Intent::SetHeadlights(false),
                Switch::Toggle => Intent::ToggleHeadlights,
            },
            "horn" => match parse_switch("horn", argument)? {
                Switch::On => Intent::SetHorn(true),
                Switch::Off => Intent::SetHorn(false),
                Switch::Toggle => Intent::ToggleHorn,
            },
            other => return Err(IntentParseError::UnknownCommand(other.to_string())),
        };
        Ok(intent)
    }
}

enum Switch {
    On,
    Off,
    Toggle,
}

const SWITCH_EXPECTED: &str = "on, off or toggle";

fn parse_switch(command: &'static str, argument: Option<&str>) -> Result<Switch, IntentParseError> {
    match argument.map(str::to_ascii_lowercase).as_deref() {
        None | Some("toggle") => Ok(Switch::Toggle),
        Some("on") => Ok(Switch::On),
        Some("off") => Ok(Switch::Off),
        Some(other) => Err(IntentParseError::InvalidArgument {
            command,
            value: other.to_string(),
            expected: SWITCH_EXPECTED,
        }),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
