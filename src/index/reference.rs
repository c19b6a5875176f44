//! Lazy references
//!
//! A reference decouples "a handle to data" from "data resident in
//! memory". It is a small state machine over four states:
//!
//! ```text
//!            resolve                    persist
//! Stored(a) ─────────▶ Cached(a, v)  ◀───────── Fresh(v)
//!
//! Empty: the null reference; resolves to nothing, persists to address 0
//! ```
//!
//! A reference is *dirty* iff it holds a materialized value and no address
//! (`Fresh`). Persisting a dirty reference appends its bytes and fixes its
//! address; persisting an addressed reference is a no-op, which is what
//! makes the commit cascade idempotent. Once resolved, the value is cached
//! so repeated reads never re-touch storage.
//!
//! Handles are cheap clones sharing one interior slot: a chain copy shares
//! unchanged suffixes with the prior version, and when any holder persists
//! the shared slot, the address is fixed for all of them.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::codec::Codec;
use crate::error::{CordError, Result};
use crate::log::{Address, AppendLog, NIL_ADDRESS};

use super::node::Node;

/// Interior state shared by all clones of one reference.
enum Slot<T> {
    /// The null reference: no address, no value.
    Empty,
    /// Address known, value not yet materialized.
    Stored(Address),
    /// Value built in memory, not yet persisted (dirty).
    Fresh(Rc<T>),
    /// Both sides known; reads and persists are free.
    Cached(Address, Rc<T>),
}

// =============================================================================
// Value references
// =============================================================================

/// Lazy handle to a value payload, encoded by `C`.
pub struct ValueRef<C: Codec> {
    slot: Rc<RefCell<Slot<C::Item>>>,
    _codec: PhantomData<C>,
}

impl<C: Codec> ValueRef<C> {
    /// The null reference. As a node's value it marks a deleted binding.
    pub fn null() -> Self {
        Self::with_slot(Slot::Empty)
    }

    /// A dirty reference around a freshly built value.
    pub fn new(value: C::Item) -> Self {
        Self::with_slot(Slot::Fresh(Rc::new(value)))
    }

    /// A reference by stored address; `NIL_ADDRESS` decodes to null.
    pub fn from_address(addr: Address) -> Self {
        if addr == NIL_ADDRESS {
            Self::null()
        } else {
            Self::with_slot(Slot::Stored(addr))
        }
    }

    fn with_slot(slot: Slot<C::Item>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(slot)),
            _codec: PhantomData,
        }
    }

    /// Whether this is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Empty)
    }

    /// Whether this reference still needs persisting.
    pub fn is_dirty(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Fresh(_))
    }

    /// The storage address, if one has been assigned.
    pub fn address(&self) -> Option<Address> {
        match &*self.slot.borrow() {
            Slot::Stored(addr) | Slot::Cached(addr, _) => Some(*addr),
            _ => None,
        }
    }

    /// Materialize the value, reading and caching on first touch.
    /// `None` for the null reference.
    pub fn resolve(&self, log: &mut AppendLog) -> Result<Option<Rc<C::Item>>> {
        let addr = {
            let slot = self.slot.borrow();
            match &*slot {
                Slot::Empty => return Ok(None),
                Slot::Fresh(value) | Slot::Cached(_, value) => {
                    return Ok(Some(Rc::clone(value)))
                }
                Slot::Stored(addr) => *addr,
            }
        };

        let bytes = log.read(addr)?.ok_or_else(|| {
            CordError::Corrupt(format!("dangling value reference to address {}", addr))
        })?;
        let value = Rc::new(C::decode(&bytes)?);
        *self.slot.borrow_mut() = Slot::Cached(addr, Rc::clone(&value));
        Ok(Some(value))
    }

    /// Write the value to the log if dirty and fix its address.
    /// Idempotent: an addressed reference returns its address unchanged;
    /// the null reference returns `NIL_ADDRESS`.
    pub fn persist(&self, log: &mut AppendLog) -> Result<Address> {
        let value = {
            let slot = self.slot.borrow();
            match &*slot {
                Slot::Empty => return Ok(NIL_ADDRESS),
                Slot::Stored(addr) | Slot::Cached(addr, _) => return Ok(*addr),
                Slot::Fresh(value) => Rc::clone(value),
            }
        };

        let bytes = C::encode(&value)?;
        let addr = log.append(&bytes)?;
        *self.slot.borrow_mut() = Slot::Cached(addr, value);
        Ok(addr)
    }
}

impl<C: Codec> Clone for ValueRef<C> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            _codec: PhantomData,
        }
    }
}

// =============================================================================
// Node references
// =============================================================================

/// Lazy handle to a chain node.
pub struct NodeRef<KC: Codec, VC: Codec> {
    slot: Rc<RefCell<Slot<Node<KC, VC>>>>,
}

impl<KC: Codec, VC: Codec> NodeRef<KC, VC> {
    /// The null reference: the empty chain.
    pub fn null() -> Self {
        Self::with_slot(Slot::Empty)
    }

    /// A dirty reference around a freshly built node.
    pub fn new(node: Node<KC, VC>) -> Self {
        Self::with_slot(Slot::Fresh(Rc::new(node)))
    }

    /// A reference by stored address; `NIL_ADDRESS` decodes to null.
    pub fn from_address(addr: Address) -> Self {
        if addr == NIL_ADDRESS {
            Self::null()
        } else {
            Self::with_slot(Slot::Stored(addr))
        }
    }

    fn with_slot(slot: Slot<Node<KC, VC>>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(slot)),
        }
    }

    /// Whether this is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Empty)
    }

    /// Whether this reference still needs persisting.
    pub fn is_dirty(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Fresh(_))
    }

    /// The storage address, if one has been assigned.
    pub fn address(&self) -> Option<Address> {
        match &*self.slot.borrow() {
            Slot::Stored(addr) | Slot::Cached(addr, _) => Some(*addr),
            _ => None,
        }
    }

    /// Materialize the node, reading and caching on first touch.
    /// `None` for the null reference (end of chain).
    pub fn resolve(&self, log: &mut AppendLog) -> Result<Option<Rc<Node<KC, VC>>>> {
        let addr = {
            let slot = self.slot.borrow();
            match &*slot {
                Slot::Empty => return Ok(None),
                Slot::Fresh(node) | Slot::Cached(_, node) => {
                    return Ok(Some(Rc::clone(node)))
                }
                Slot::Stored(addr) => *addr,
            }
        };

        let bytes = log.read(addr)?.ok_or_else(|| {
            CordError::Corrupt(format!("dangling node reference to address {}", addr))
        })?;
        let node = Rc::new(Node::from_frame(&bytes)?);
        *self.slot.borrow_mut() = Slot::Cached(addr, Rc::clone(&node));
        Ok(Some(node))
    }

    /// Write the node and everything it reaches to the log, children first.
    ///
    /// The node's frame embeds its children's addresses, so its value
    /// reference and next reference persist before its own bytes are
    /// framed: a post-order cascade down the dirty suffix of the chain.
    /// Already-addressed references short-circuit, so only records created
    /// since the last commit are written.
    pub fn persist(&self, log: &mut AppendLog) -> Result<Address> {
        let node = {
            let slot = self.slot.borrow();
            match &*slot {
                Slot::Empty => return Ok(NIL_ADDRESS),
                Slot::Stored(addr) | Slot::Cached(addr, _) => return Ok(*addr),
                Slot::Fresh(node) => Rc::clone(node),
            }
        };

        let value_addr = node.value().persist(log)?;
        let next_addr = node.next().persist(log)?;
        let bytes = node.to_frame(value_addr, next_addr)?;
        let addr = log.append(&bytes)?;
        *self.slot.borrow_mut() = Slot::Cached(addr, node);
        Ok(addr)
    }
}

impl<KC: Codec, VC: Codec> Clone for NodeRef<KC, VC> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Bincode;
    use crate::config::SyncStrategy;
    use tempfile::TempDir;

    type StrRef = ValueRef<Bincode<String>>;

    fn temp_log() -> (TempDir, AppendLog) {
        let dir = TempDir::new().unwrap();
        let log = AppendLog::open(&dir.path().join("test.log"), SyncStrategy::OnCommit).unwrap();
        (dir, log)
    }

    #[test]
    fn null_reference_resolves_to_nothing() {
        let (_dir, mut log) = temp_log();
        let r = StrRef::null();
        assert!(r.is_null());
        assert!(!r.is_dirty());
        assert!(r.resolve(&mut log).unwrap().is_none());
        assert_eq!(r.persist(&mut log).unwrap(), NIL_ADDRESS);
    }

    #[test]
    fn persist_fixes_address_and_is_idempotent() {
        let (_dir, mut log) = temp_log();
        let r = StrRef::new("hello".to_string());
        assert!(r.is_dirty());
        assert_eq!(r.address(), None);

        let addr = r.persist(&mut log).unwrap();
        assert!(!r.is_dirty());
        assert_eq!(r.address(), Some(addr));

        // Second persist is a no-op returning the same address
        let end_before = log.end();
        assert_eq!(r.persist(&mut log).unwrap(), addr);
        assert_eq!(log.end(), end_before);
    }

    #[test]
    fn resolve_reads_once_then_caches() {
        let (_dir, mut log) = temp_log();
        let addr = {
            let r = StrRef::new("cached".to_string());
            r.persist(&mut log).unwrap()
        };

        let r = StrRef::from_address(addr);
        assert!(!r.is_dirty());
        let v1 = r.resolve(&mut log).unwrap().unwrap();
        assert_eq!(*v1, "cached");

        // Cached now: the same allocation comes back
        let v2 = r.resolve(&mut log).unwrap().unwrap();
        assert!(Rc::ptr_eq(&v1, &v2));
    }

    #[test]
    fn clones_share_one_slot() {
        let (_dir, mut log) = temp_log();
        let a = StrRef::new("shared".to_string());
        let b = a.clone();

        let addr = a.persist(&mut log).unwrap();
        // The clone sees the address the original fixed
        assert_eq!(b.address(), Some(addr));
        assert!(!b.is_dirty());
    }
}
