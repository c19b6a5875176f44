//! Root pointer slot
//!
//! The single mutable cell in the whole system: a fixed frame at address 0
//! whose payload names the current root of the persistent chain. It is
//! appended once, when the log is empty, and from then on only its payload
//! is rewritten, at commit, after the frames it will point at are already
//! on disk.

use crate::error::{CordError, Result};

use super::file::AppendLog;
use super::{Address, NIL_ADDRESS};

/// Address of the reserved slot.
const ROOT_SLOT_ADDRESS: Address = 0;

/// Payload width: one `u64` address.
const ROOT_PAYLOAD_LEN: usize = 8;

/// Accessor for the reserved root slot at address 0.
pub struct RootPointer;

impl RootPointer {
    /// Append the slot if the log is freshly empty.
    ///
    /// A fresh slot holds `NIL_ADDRESS`: an empty index with no committed
    /// data.
    pub fn ensure(log: &mut AppendLog) -> Result<()> {
        if !log.is_empty() {
            return Ok(());
        }
        let addr = log.append(&NIL_ADDRESS.to_le_bytes())?;
        debug_assert_eq!(addr, ROOT_SLOT_ADDRESS);
        Ok(())
    }

    /// Read the committed root address.
    pub fn load(log: &mut AppendLog) -> Result<Address> {
        let payload = log.read(ROOT_SLOT_ADDRESS)?.ok_or_else(|| {
            CordError::Corrupt("root slot missing at address 0".to_string())
        })?;
        if payload.len() != ROOT_PAYLOAD_LEN {
            return Err(CordError::Corrupt(format!(
                "root slot holds {} bytes, expected {}",
                payload.len(),
                ROOT_PAYLOAD_LEN
            )));
        }
        let mut addr = [0u8; ROOT_PAYLOAD_LEN];
        addr.copy_from_slice(&payload);
        Ok(Address::from_le_bytes(addr))
    }

    /// Rewrite the slot to name a new root, then sync.
    ///
    /// This is the commit point: once the slot's bytes reach disk, the new
    /// chain version is the one a restart will see.
    pub fn store(log: &mut AppendLog, addr: Address) -> Result<()> {
        log.overwrite_payload(ROOT_SLOT_ADDRESS, &addr.to_le_bytes())?;
        log.sync()?;
        Ok(())
    }
}
