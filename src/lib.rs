//! # cordkv
//!
//! A minimal embedded key-value store built from two layers:
//! - An append-only, address-based log of length-prefixed frames
//! - A copy-on-write persistent chain mapping keys to values atop it
//!
//! Durability comes without in-place mutation: every change builds new
//! immutable records that share unchanged suffixes with prior versions,
//! and a single atomically-updated root pointer makes a batch of changes
//! visible at `commit`, all or nothing.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Shell / Caller                         │
//! │                 (get / set / pop / commit)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Store Facade                            │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌──────────────────┐
//!   │ PersistentIndex │  commit   │    AppendLog     │
//!   │  (COW chains)   ├──────────▶│ (framed records) │
//!   └─────────────────┘           └────────┬─────────┘
//!                                          │
//!                                          ▼
//!                                  ┌──────────────┐
//!                                  │ Root pointer │
//!                                  │  (slot @ 0)  │
//!                                  └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod log;
pub mod index;
pub mod store;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CordError, Result};
pub use config::{Config, SyncStrategy};
pub use codec::{Bincode, Codec};
pub use log::{Address, AppendLog, NIL_ADDRESS};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cordkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
