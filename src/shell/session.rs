//! Shell session
//!
//! Validates user input, makes store calls, and returns output strings.
//! Errors that are normal outcomes of program logic (`KeyNotFound`, parse
//! failures) become messages; they are never propagated out of `execute`.

use crate::codec::Bincode;
use crate::error::CordError;
use crate::store::Store;

use super::command::Command;

/// The store type the shell speaks: string keys, string values, bincode on
/// the wire.
pub type TextStore = Store<Bincode<String>, Bincode<String>>;

/// What the caller should do with an executed line.
pub enum Reply {
    /// Print this and prompt again.
    Output(String),
    /// Leave the shell.
    Exit,
}

/// One interactive session over a store.
pub struct Session {
    store: TextStore,
}

impl Session {
    pub fn new(store: TextStore) -> Self {
        Self { store }
    }

    /// Execute one input line and format the outcome.
    pub fn execute(&mut self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => return Reply::Output(e.to_string()),
        };

        let output = match command {
            Command::Set { key, value } => self.set(key, value),
            Command::Get { key } => self.get(key),
            Command::Pop { key } => self.pop(key),
            Command::Commit => self.commit(),
            Command::Help => Self::usage(),
            Command::Exit => return Reply::Exit,
        };
        Reply::Output(output)
    }

    fn set(&mut self, key: String, value: String) -> String {
        match self.store.set(key.clone(), value.clone()) {
            Ok(()) => format!("  set {}: {}", key, value),
            Err(e) => format!("error: {}", e),
        }
    }

    fn get(&mut self, key: String) -> String {
        match self.store.get(&key) {
            Ok(value) => value,
            Err(CordError::KeyNotFound) => format!("Not found: {}", key),
            Err(e) => format!("error: {}", e),
        }
    }

    fn pop(&mut self, key: String) -> String {
        match self.store.pop(&key) {
            Ok(value) => value,
            Err(CordError::KeyNotFound) => format!("Not found: {}", key),
            Err(e) => format!("error: {}", e),
        }
    }

    fn commit(&mut self) -> String {
        match self.store.commit() {
            Ok(()) => "committed".to_string(),
            Err(e) => format!("error: {}", e),
        }
    }

    fn usage() -> String {
        "commands:\n  \
         set <key>=<value>   bind a key (in memory until commit)\n  \
         get <key>           look up a key\n  \
         pop <key>           delete a key and print its value\n  \
         commit              make changes durable\n  \
         exit                leave the shell"
            .to_string()
    }

    /// The underlying store (the caller checks dirtiness on exit).
    pub fn store(&self) -> &TextStore {
        &self.store
    }
}
