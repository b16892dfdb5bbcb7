//! Shell Module
//!
//! A line-oriented front end over a string-keyed expiring map. Each input
//! line is parsed into a [`Command`], executed, and answered with one JSON
//! [`Response`] line.

mod command;
mod response;

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

pub use command::{Command, MAX_SLEEP_MS};
pub use response::Response;

use crate::config::Config;
use crate::error::Result;
use crate::map::{Clock, ExpiringMap, MonotonicClock};

// == Shell ==
/// Executes commands against an owned `ExpiringMap<String, String>`.
#[derive(Debug)]
pub struct Shell<C = MonotonicClock> {
    map: ExpiringMap<String, String, C>,
}

impl Shell<MonotonicClock> {
    /// Creates a shell from configuration, backed by the system clock.
    ///
    /// # Errors
    /// Returns [`MapError::InvalidTtl`](crate::error::MapError::InvalidTtl)
    /// if the configured TTL is zero.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ExpiringMap::new(config.ttl())?))
    }
}

impl<C: Clock> Shell<C> {
    /// Creates a shell over an existing map.
    pub fn new(map: ExpiringMap<String, String, C>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &ExpiringMap<String, String, C> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut ExpiringMap<String, String, C> {
        &mut self.map
    }

    // == Execute ==
    /// Runs one command and returns its response.
    pub fn execute(&mut self, command: Command) -> Response {
        debug!(?command, "Executing command");

        match command {
            Command::Put { key, value } => {
                let previous = self.map.put(key.clone(), value);
                Response::Put { key, previous }
            }
            Command::Get { key } => {
                let value = self.map.get(&key).cloned();
                Response::Value { key, value }
            }
            Command::Remove { key } => {
                let value = self.map.remove(&key);
                Response::Removed { key, value }
            }
            Command::Contains { key } => Response::Bool {
                value: self.map.contains_key(&key),
            },
            Command::ContainsValue { value } => Response::Bool {
                value: self.map.contains_value(&value),
            },
            Command::Size => Response::Count {
                value: self.map.len(),
            },
            Command::Empty => Response::Bool {
                value: self.map.is_empty(),
            },
            Command::Keys => Response::keys(self.map.keys()),
            Command::Values => Response::values(self.map.entries()),
            Command::Entries => Response::entries(self.map.entries()),
            Command::Clear => {
                self.map.clear();
                Response::ok("Live entries cleared")
            }
            Command::ExpiredKeys => Response::keys(self.map.expired_keys()),
            Command::ExpiredValues => Response::values(self.map.expired_entries()),
            Command::ExpiredEntries => Response::entries(self.map.expired_entries()),
            Command::ExpiredSize => Response::Count {
                value: self.map.expired_len(),
            },
            Command::ExpiredEmpty => Response::Bool {
                value: self.map.expired_is_empty(),
            },
            Command::ExpiredGet { key } => {
                let value = self.map.expired_get(&key).cloned();
                Response::Value { key, value }
            }
            Command::ExpiredRemove { key } => {
                let value = self.map.expired_remove(&key);
                Response::Removed { key, value }
            }
            Command::ExpiredClear => {
                self.map.expired_clear();
                Response::ok("Expired entries cleared")
            }
            Command::Stats => Response::stats(self.map.stats()),
            Command::Sleep { duration } => {
                self.map.clock().sleep(duration);
                Response::ok(format!("Slept {} ms", duration.as_millis()))
            }
        }
    }

    // == Handle Line ==
    /// Parses and executes one line. Blank lines and `#` comments yield `None`.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let response = match Command::parse(trimmed) {
            Ok(command) => self.execute(command),
            Err(err) => {
                warn!(line = trimmed, error = %err, "Rejected command");
                Response::error(err)
            }
        };
        Some(response)
    }

    // == Run ==
    /// Reads commands from `reader` until EOF, writing one JSON line per
    /// command to `writer`. Returns the number of commands answered.
    ///
    /// Malformed commands are answered with an `error` response and do not
    /// end the session.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> io::Result<usize> {
        let mut answered = 0;

        for line in reader.lines() {
            let line = line?;
            if let Some(response) = self.handle_line(&line) {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                answered += 1;
            }
        }

        debug!(answered, "Shell input exhausted");
        Ok(answered)
    }
}
