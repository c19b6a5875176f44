//! Query shell module
//!
//! A thin, line-oriented collaborator over the store facade: it parses
//! `set k=v`, `get k`, `pop k` and `commit` lines, runs them, and formats
//! the replies. Nothing in here knows about frames, references, or the
//! commit protocol beyond calling it.

mod command;
mod session;

pub use command::Command;
pub use session::{Reply, Session, TextStore};
