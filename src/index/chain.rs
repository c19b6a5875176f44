//! PersistentIndex
//!
//! `get`/`set`/`pop` as walks over the chain, producing new nodes for any
//! change, plus the commit protocol that makes a batch of changes durable
//! and visible all at once.

use crate::codec::Codec;
use crate::error::{CordError, Result};
use crate::log::{AppendLog, RootPointer};

use super::node::Node;
use super::reference::{NodeRef, ValueRef};

/// The logical layer: a persistent chain of bindings under one root.
///
/// Holds no storage itself; every operation borrows the log it runs
/// against. The root reference is the single mutable cell: read from the
/// root pointer at bootstrap, replaced in memory by `set`/`pop`, written
/// back only at `commit`.
pub struct PersistentIndex<KC: Codec, VC: Codec> {
    root: NodeRef<KC, VC>,
    /// Whether `set`/`pop` changed the root since the last commit. Tracked
    /// explicitly because a `pop` can make the new root an
    /// already-persisted suffix (or the null reference), which still must
    /// be committed.
    dirty: bool,
}

impl<KC, VC> PersistentIndex<KC, VC>
where
    KC: Codec,
    VC: Codec,
    KC::Item: Clone + PartialEq,
    VC::Item: Clone,
{
    /// Reconstruct the index from the root pointer slot.
    ///
    /// Address 0 in the slot means an empty index with no committed data.
    /// Nothing else survives a restart.
    pub fn bootstrap(log: &mut AppendLog) -> Result<Self> {
        let addr = RootPointer::load(log)?;
        Ok(Self {
            root: NodeRef::from_address(addr),
            dirty: false,
        })
    }

    /// Look up the value bound to `key`.
    ///
    /// Walks the whole chain from the root and keeps overwriting the
    /// candidate on every match, so the last occurrence toward the tail
    /// decides. A winning binding that holds the null reference counts as
    /// deleted. Node order is what makes this policy correct; do not
    /// reorder the chain without re-verifying it.
    pub fn get(&self, log: &mut AppendLog, key: &KC::Item) -> Result<VC::Item> {
        let mut cursor = self.root.clone();
        let mut found: Option<ValueRef<VC>> = None;

        while let Some(node) = cursor.resolve(log)? {
            if node.key() == key {
                found = Some(node.value().clone());
            }
            cursor = node.next().clone();
        }

        let value_ref = found.ok_or(CordError::KeyNotFound)?;
        let value = value_ref.resolve(log)?.ok_or(CordError::KeyNotFound)?;
        Ok((*value).clone())
    }

    /// Bind `key` to `value`.
    ///
    /// Builds a new chain version in memory that shares every untouched
    /// node with the old one; nothing reaches the log until `commit`.
    pub fn set(&mut self, log: &mut AppendLog, key: KC::Item, value: VC::Item) -> Result<()> {
        self.root = Self::insert(log, &self.root, key, ValueRef::new(value))?;
        self.dirty = true;
        Ok(())
    }

    /// Recursive copy-on-write insert.
    ///
    /// Three shapes: an exhausted chain grows the new tail node; a matching
    /// head is rebuilt around the new value with its tail shared unchanged;
    /// any other head is copied to point at the recursion on the rest.
    fn insert(
        log: &mut AppendLog,
        node_ref: &NodeRef<KC, VC>,
        key: KC::Item,
        value: ValueRef<VC>,
    ) -> Result<NodeRef<KC, VC>> {
        let node = match node_ref.resolve(log)? {
            None => return Ok(NodeRef::new(Node::new(key, value, NodeRef::null()))),
            Some(node) => node,
        };

        if node.key() == &key {
            Ok(NodeRef::new(Node::new(key, value, node.next().clone())))
        } else {
            let next = Self::insert(log, node.next(), key, value)?;
            Ok(NodeRef::new(Node::new(
                node.key().clone(),
                node.value().clone(),
                next,
            )))
        }
    }

    /// Remove the binding for `key` and return its value.
    ///
    /// Fails with `KeyNotFound` (leaving the root untouched) when no node
    /// matches or the matched binding holds the null reference.
    pub fn pop(&mut self, log: &mut AppendLog, key: &KC::Item) -> Result<VC::Item> {
        let (new_root, removed) = Self::remove(log, &self.root, key)?;
        let value = removed.resolve(log)?.ok_or(CordError::KeyNotFound)?;
        self.root = new_root;
        self.dirty = true;
        Ok((*value).clone())
    }

    /// Recursive copy-on-write removal: the matched node is spliced out by
    /// returning its own next as the rebuilt suffix.
    fn remove(
        log: &mut AppendLog,
        node_ref: &NodeRef<KC, VC>,
        key: &KC::Item,
    ) -> Result<(NodeRef<KC, VC>, ValueRef<VC>)> {
        let node = node_ref.resolve(log)?.ok_or(CordError::KeyNotFound)?;

        if node.key() == key {
            if node.value().is_null() {
                // A persisted deletion marker: the key is already gone.
                return Err(CordError::KeyNotFound);
            }
            return Ok((node.next().clone(), node.value().clone()));
        }

        let (next, removed) = Self::remove(log, node.next(), key)?;
        Ok((
            NodeRef::new(Node::new(node.key().clone(), node.value().clone(), next)),
            removed,
        ))
    }

    /// Persist everything the root reaches, children first, then advance
    /// the root pointer. The only mutation visible across restarts; a
    /// no-op when nothing changed since the last commit.
    pub fn commit(&mut self, log: &mut AppendLog) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let addr = self.root.persist(log)?;
        // New frames must be durable before the root names them.
        log.sync()?;
        RootPointer::store(log, addr)?;

        self.dirty = false;
        tracing::debug!("committed root at address {}", addr);
        Ok(())
    }

    /// Whether uncommitted changes exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
