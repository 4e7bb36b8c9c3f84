use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("percentage {value} is outside 0..=100")]
pub struct PercentOutOfRange {
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("invalid endpoint '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("endpoint scheme must be ws or wss, got '{0}'")]
    UnsupportedScheme(String),
    #[error("endpoint '{0}' has no host")]
    MissingHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid argument '{value}' for '{command}', expected {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}
