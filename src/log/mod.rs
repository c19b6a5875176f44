//! Append-only log module
//!
//! Durable, ordered, framed byte storage in a single file.
//!
//! ## Responsibilities
//! - Append length-prefixed frames and hand back their addresses
//! - Read a frame's payload by address
//! - Rediscover the writable frontier on open (crash recovery)
//! - Forward enumeration of frames without an external index
//! - Host the one reserved, rewritable slot: the root pointer
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Root slot (address 0)                         │
//! │ ┌─────────┬───────────────────┐               │
//! │ │ Len (4) │ Root address (8)  │               │
//! │ └─────────┴───────────────────┘               │
//! ├───────────────────────────────────────────────┤
//! │ Frame                                         │
//! │ ┌─────────┬──────────────────────────┐        │
//! │ │ Len (4) │ Payload (len - 4 bytes)  │        │
//! │ └─────────┴──────────────────────────┘        │
//! ├───────────────────────────────────────────────┤
//! │ ...                                           │
//! ├───────────────────────────────────────────────┤
//! │ Zero marker (4 zero bytes) = frontier         │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Lengths are little-endian `u32` and count their own 4 bytes. A zero
//! length read at any position means "no data here". Frames are never
//! mutated once written; the root slot's payload is the single exception.

mod file;
mod root;
mod scan;

pub use file::{AppendLog, LEN_WIDTH};
pub use root::RootPointer;
pub use scan::{Frame, Frames};

/// Byte offset of a frame within the log.
pub type Address = u64;

/// The null address: no record / empty structure.
///
/// Safe as a sentinel because the root slot occupies address 0, so no data
/// frame can ever start there.
pub const NIL_ADDRESS: Address = 0;
