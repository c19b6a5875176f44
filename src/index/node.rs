//! Chain nodes
//!
//! A node is one immutable link of the chain: a key, a reference to the
//! key's value, and a reference to the rest of the chain as of some
//! historical version.
//!
//! ## Node Frame Payload
//! ```text
//! ┌─────────────┬───────────┬────────────────┬───────────────┐
//! │ KeyLen (4)  │ Key bytes │ ValueAddr (8)  │ NextAddr (8)  │
//! └─────────────┴───────────┴────────────────┴───────────────┘
//! ```
//!
//! Key bytes come from the injected key codec; a zero child address encodes
//! the null reference. A node is only framed after its children have
//! addresses, so encoding takes those addresses as arguments rather than
//! reading them out of the references.

use crate::codec::Codec;
use crate::error::{CordError, Result};
use crate::log::Address;

use super::reference::{NodeRef, ValueRef};

/// Fixed bytes around the key: length prefix plus two child addresses.
const KEY_LEN_WIDTH: usize = 4;
const ADDR_WIDTH: usize = 8;

/// One immutable key/value binding plus a link to the rest of the chain.
pub struct Node<KC: Codec, VC: Codec> {
    key: KC::Item,
    value: ValueRef<VC>,
    next: NodeRef<KC, VC>,
}

impl<KC: Codec, VC: Codec> Node<KC, VC> {
    /// Build a node. There is no way to change it afterwards.
    pub fn new(key: KC::Item, value: ValueRef<VC>, next: NodeRef<KC, VC>) -> Self {
        Self { key, value, next }
    }

    pub fn key(&self) -> &KC::Item {
        &self.key
    }

    pub fn value(&self) -> &ValueRef<VC> {
        &self.value
    }

    pub fn next(&self) -> &NodeRef<KC, VC> {
        &self.next
    }

    /// Serialize to a frame payload, embedding the children's addresses.
    pub(crate) fn to_frame(&self, value_addr: Address, next_addr: Address) -> Result<Vec<u8>> {
        let key_bytes = KC::encode(&self.key)?;
        let mut frame =
            Vec::with_capacity(KEY_LEN_WIDTH + key_bytes.len() + 2 * ADDR_WIDTH);
        frame.extend_from_slice(&(key_bytes.len() as u32).to_le_bytes());
        frame.extend_from_slice(&key_bytes);
        frame.extend_from_slice(&value_addr.to_le_bytes());
        frame.extend_from_slice(&next_addr.to_le_bytes());
        Ok(frame)
    }

    /// Deserialize from a frame payload.
    pub(crate) fn from_frame(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < KEY_LEN_WIDTH {
            return Err(CordError::Corrupt(
                "node frame too short for its key length".to_string(),
            ));
        }
        let mut key_len = [0u8; KEY_LEN_WIDTH];
        key_len.copy_from_slice(&bytes[..KEY_LEN_WIDTH]);
        let key_len = u32::from_le_bytes(key_len) as usize;

        let expected = KEY_LEN_WIDTH + key_len + 2 * ADDR_WIDTH;
        if bytes.len() != expected {
            return Err(CordError::Corrupt(format!(
                "node frame is {} bytes, expected {}",
                bytes.len(),
                expected
            )));
        }

        let key = KC::decode(&bytes[KEY_LEN_WIDTH..KEY_LEN_WIDTH + key_len])?;

        let mut addr = [0u8; ADDR_WIDTH];
        let value_off = KEY_LEN_WIDTH + key_len;
        addr.copy_from_slice(&bytes[value_off..value_off + ADDR_WIDTH]);
        let value_addr = Address::from_le_bytes(addr);
        addr.copy_from_slice(&bytes[value_off + ADDR_WIDTH..]);
        let next_addr = Address::from_le_bytes(addr);

        Ok(Self {
            key,
            value: ValueRef::from_address(value_addr),
            next: NodeRef::from_address(next_addr),
        })
    }
}

impl<KC: Codec, VC: Codec> std::fmt::Debug for Node<KC, VC> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Bincode;

    type StrNode = Node<Bincode<String>, Bincode<String>>;

    #[test]
    fn frame_layout_is_exact() {
        let node = StrNode::new("k".to_string(), ValueRef::null(), NodeRef::null());
        let frame = node.to_frame(7, 0).unwrap();

        // bincode String: u64 length prefix + bytes
        let key_bytes = Bincode::<String>::encode(&"k".to_string()).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&(key_bytes.len() as u32).to_le_bytes());
        expected.extend_from_slice(&key_bytes);
        expected.extend_from_slice(&7u64.to_le_bytes());
        expected.extend_from_slice(&0u64.to_le_bytes());
        assert_eq!(frame, expected);

        let back = StrNode::from_frame(&frame).unwrap();
        assert_eq!(back.key(), "k");
        assert_eq!(back.value().address(), Some(7));
        assert!(back.next().is_null());
    }

    #[test]
    fn truncated_frame_is_corrupt() {
        let node = StrNode::new("key".to_string(), ValueRef::null(), NodeRef::null());
        let frame = node.to_frame(0, 0).unwrap();
        let err = StrNode::from_frame(&frame[..frame.len() - 1]).unwrap_err();
        assert!(matches!(err, crate::CordError::Corrupt(_)));
    }
}
