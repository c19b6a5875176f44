//! Shell command parsing
//!
//! Query syntax:
//! - `set <key>=<value>`
//! - `get <key>`
//! - `pop <key>`
//! - `commit`
//! - `help`, `exit`

use crate::error::{CordError, Result};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bind a key to a value
    Set { key: String, value: String },

    /// Look up a key
    Get { key: String },

    /// Delete a key and return its value
    Pop { key: String },

    /// Persist everything since the last commit
    Commit,

    /// Print usage
    Help,

    /// Leave the shell
    Exit,
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (cmd, args) = match line.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (line, ""),
        };

        match cmd {
            "set" => Self::parse_set(args),
            "get" => Ok(Command::Get {
                key: Self::parse_key(args)?,
            }),
            "pop" => Ok(Command::Pop {
                key: Self::parse_key(args)?,
            }),
            "commit" => Ok(Command::Commit),
            "help" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            other => Err(CordError::Query(format!(
                "Invalid query. {} is not a cordkv command.",
                other
            ))),
        }
    }

    fn parse_set(args: &str) -> Result<Command> {
        if args.chars().filter(|c| *c == '=').count() != 1 {
            return Err(CordError::Query("Invalid set syntax.".to_string()));
        }
        // count above guarantees the split succeeds
        let (key, value) = args.split_once('=').ok_or_else(|| {
            CordError::Query("Invalid set syntax.".to_string())
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CordError::Query("Invalid set syntax.".to_string()));
        }
        Ok(Command::Set {
            key: key.to_string(),
            value: value.trim().to_string(),
        })
    }

    fn parse_key(args: &str) -> Result<String> {
        if args.is_empty() {
            return Err(CordError::Query("Missing key.".to_string()));
        }
        Ok(args.to_string())
    }
}
