//! Shell Commands
//!
//! Parses one input line into a command against a string-keyed map.

use std::time::Duration;

use crate::error::{MapError, Result};

/// Longest pause a `sleep` command may request (one hour)
pub const MAX_SLEEP_MS: u64 = 3_600_000;

/// A single shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Remove { key: String },
    Contains { key: String },
    ContainsValue { value: String },
    Size,
    Empty,
    Keys,
    Values,
    Entries,
    Clear,
    ExpiredKeys,
    ExpiredValues,
    ExpiredEntries,
    ExpiredSize,
    ExpiredEmpty,
    ExpiredGet { key: String },
    ExpiredRemove { key: String },
    ExpiredClear,
    Stats,
    /// Lets time pass through the map's clock
    Sleep { duration: Duration },
}

impl Command {
    // == Parse ==
    /// Parses a command line.
    ///
    /// The verb is case-insensitive. For `put` and `contains-value` the value
    /// is the rest of the line and may contain spaces.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidCommand`] for an unknown verb, a missing
    /// argument or trailing arguments.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "put" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(key, value)| (key, value.trim()))
                    .filter(|(_, value)| !value.is_empty())
                    .ok_or_else(|| invalid("put requires a key and a value"))?;
                Command::Put {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "get" => Command::Get { key: single_key(verb, rest)? },
            "remove" => Command::Remove { key: single_key(verb, rest)? },
            "contains" => Command::Contains { key: single_key(verb, rest)? },
            "contains-value" => {
                if rest.is_empty() {
                    return Err(invalid("contains-value requires a value"));
                }
                Command::ContainsValue {
                    value: rest.to_string(),
                }
            }
            "size" => no_args(verb, rest, Command::Size)?,
            "empty" => no_args(verb, rest, Command::Empty)?,
            "keys" => no_args(verb, rest, Command::Keys)?,
            "values" => no_args(verb, rest, Command::Values)?,
            "entries" => no_args(verb, rest, Command::Entries)?,
            "clear" => no_args(verb, rest, Command::Clear)?,
            "expired-keys" => no_args(verb, rest, Command::ExpiredKeys)?,
            "expired-values" => no_args(verb, rest, Command::ExpiredValues)?,
            "expired-entries" => no_args(verb, rest, Command::ExpiredEntries)?,
            "expired-size" => no_args(verb, rest, Command::ExpiredSize)?,
            "expired-empty" => no_args(verb, rest, Command::ExpiredEmpty)?,
            "expired-get" => Command::ExpiredGet { key: single_key(verb, rest)? },
            "expired-remove" => Command::ExpiredRemove { key: single_key(verb, rest)? },
            "expired-clear" => no_args(verb, rest, Command::ExpiredClear)?,
            "stats" => no_args(verb, rest, Command::Stats)?,
            "sleep" => {
                let millis: u64 = rest
                    .parse()
                    .map_err(|_| invalid("sleep requires a duration in milliseconds"))?;
                if millis > MAX_SLEEP_MS {
                    return Err(invalid(&format!(
                        "sleep is limited to {} ms",
                        MAX_SLEEP_MS
                    )));
                }
                Command::Sleep {
                    duration: Duration::from_millis(millis),
                }
            }
            "" => return Err(invalid("empty command")),
            other => return Err(invalid(&format!("unknown verb '{}'", other))),
        };

        Ok(command)
    }
}

// == Helpers ==
fn invalid(message: &str) -> MapError {
    MapError::InvalidCommand(message.to_string())
}

fn single_key(verb: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(invalid(&format!("{} requires a key", verb)));
    }
    if rest.contains(char::is_whitespace) {
        return Err(invalid(&format!("{} takes exactly one key", verb)));
    }
    Ok(rest.to_string())
}

fn no_args(verb: &str, rest: &str, command: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(invalid(&format!("{} takes no arguments", verb)))
    }
}
