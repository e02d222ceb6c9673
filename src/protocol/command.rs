//! Command definitions
//!
//! Represents commands sent to the backing store.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    LRange,
}

impl CommandType {
    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            CommandType::LRange => "LRANGE",
        }
    }
}

/// A store command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch list elements between `start` and `end` (inclusive, negative counts from the tail)
    LRange { key: Vec<u8>, start: i64, end: i64 },
}

impl Command {
    /// Build a range query for `key`
    pub fn lrange(key: impl Into<Vec<u8>>, start: i64, end: i64) -> Self {
        Command::LRange {
            key: key.into(),
            start,
            end,
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::LRange { .. } => CommandType::LRange,
        }
    }

    /// Arguments following the command name, each sent as one bulk string
    pub fn arguments(&self) -> Vec<Vec<u8>> {
        match self {
            Command::LRange { key, start, end } => vec![
                key.clone(),
                start.to_string().into_bytes(),
                end.to_string().into_bytes(),
            ],
        }
    }
}
