//! Store Module
//!
//! The facade that coordinates the log and the index.
//!
//! ## Responsibilities
//! - Open the log and bootstrap the index from the root pointer
//! - Route get/set/pop/commit to the index
//! - Own the log file exclusively for the store's lifetime
//!
//! ## Resource Model
//!
//! Single-threaded and synchronous: one `Store` owns its file, there is no
//! locking, and nothing here is `Send`. Dropping the store releases the
//! file on every exit path; `close` exists for callers who want the release
//! to be a visible statement. Uncommitted changes are discarded either way.
//! That is the commit model, not an error.

use std::path::Path;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Result;
use crate::index::PersistentIndex;
use crate::log::{AppendLog, RootPointer};

/// An embedded key-value store: one append-only log, one persistent index.
pub struct Store<KC: Codec, VC: Codec> {
    config: Config,
    log: AppendLog,
    index: PersistentIndex<KC, VC>,
}

impl<KC, VC> Store<KC, VC>
where
    KC: Codec,
    VC: Codec,
    KC::Item: Clone + PartialEq,
    VC::Item: Clone,
{
    /// Open or create a store with the given config.
    ///
    /// On startup:
    /// 1. Open/create the log file (frontier rediscovered by the scan)
    /// 2. Ensure the root pointer slot exists
    /// 3. Bootstrap the index from the committed root address
    pub fn open(config: Config) -> Result<Self> {
        let mut log = AppendLog::open(&config.path, config.sync_strategy)?;

        RootPointer::ensure(&mut log)?;
        let index = PersistentIndex::bootstrap(&mut log)?;

        tracing::debug!("store opened: {}", config.path.display());

        Ok(Self { config, log, index })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses the default config with the specified log file path
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().path(path.as_ref()).build();
        Self::open(config)
    }

    /// Get the value bound to a key
    ///
    /// Fails with `KeyNotFound` when the key is absent or logically
    /// deleted.
    pub fn get(&mut self, key: &KC::Item) -> Result<VC::Item> {
        self.index.get(&mut self.log, key)
    }

    /// Bind a key to a value (in memory until `commit`)
    pub fn set(&mut self, key: KC::Item, value: VC::Item) -> Result<()> {
        self.index.set(&mut self.log, key, value)
    }

    /// Remove a key's binding and return its value (in memory until
    /// `commit`)
    ///
    /// Fails with `KeyNotFound` under the same rule as `get`.
    pub fn pop(&mut self, key: &KC::Item) -> Result<VC::Item> {
        self.index.pop(&mut self.log, key)
    }

    /// Make everything since the last commit durable and atomically
    /// visible
    pub fn commit(&mut self) -> Result<()> {
        self.index.commit(&mut self.log)
    }

    /// Whether uncommitted changes would be lost by closing now
    pub fn is_dirty(&self) -> bool {
        self.index.is_dirty()
    }

    /// Release the underlying file.
    ///
    /// Ownership makes a second close unrepresentable; `Drop` covers every
    /// other exit path. Uncommitted changes are discarded.
    pub fn close(self) -> Result<()> {
        drop(self);
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
