//! Per-node ownership of widget state
//!
//! Every widget keeps its state block in a [`WidgetRegistry`], a side table
//! keyed by the [`NodeId`] of the container node the widget created. The
//! registry is the sole owner of the state:
//!
//! 1. **`insert`** happens once, at the end of a successful `create`, at the
//!    same time the widget subscribes to the node's delete notification.
//! 2. **`get` / `get_mut`** resolve a handle to live state or `None`; stale
//!    handles from deleted nodes never resolve because node generations
//!    differ.
//! 3. **`release`** is called only from the delete notification. It moves
//!    the state out of the table, so a second release finds nothing and the
//!    state is dropped exactly once.
//!
//! A host may queue the delete notification. Between the deletion and the
//! release the state is still in the table, so widget operations look it up
//! with [`get_live`](WidgetRegistry::get_live), which also asks the host
//! whether the node still exists.

use alloc::collections::BTreeMap;
use log::{debug, warn};

use crate::error::{WidgetError, WidgetResult};
use crate::host::{NodeId, SceneHost};

/// Lifetime counters for one registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    /// State blocks ever inserted
    pub created: usize,
    /// State blocks released (and dropped)
    pub released: usize,
}

impl LifecycleStats {
    /// State blocks currently alive
    pub fn live(&self) -> usize {
        self.created - self.released
    }
}

/// Side table that owns one state block per host node
#[derive(Debug)]
pub struct WidgetRegistry<S> {
    entries: BTreeMap<NodeId, S>,
    stats: LifecycleStats,
    kind: &'static str,
}

impl<S> WidgetRegistry<S> {
    /// Create an empty registry. `kind` names the widget in log output.
    pub fn new(kind: &'static str) -> Self {
        Self {
            entries: BTreeMap::new(),
            stats: LifecycleStats::default(),
            kind,
        }
    }

    /// Bind `state` to `node`.
    ///
    /// Fails with [`WidgetError::AlreadyBound`] if the node already owns
    /// state; the rejected state is dropped.
    pub fn insert(&mut self, node: NodeId, state: S) -> WidgetResult<()> {
        if self.entries.contains_key(&node) {
            warn!("{}: node {:?} already owns state", self.kind, node);
            return Err(WidgetError::AlreadyBound);
        }

        self.entries.insert(node, state);
        self.stats.created += 1;
        debug!("{}: bound state to {:?} ({} live)", self.kind, node, self.len());
        Ok(())
    }

    pub fn get(&self, node: NodeId) -> Option<&S> {
        self.entries.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut S> {
        self.entries.get_mut(&node)
    }

    /// State of `node` if the host still has the node, even when its delete
    /// notification has not been handled yet
    pub fn get_live(&self, host: &dyn SceneHost, node: NodeId) -> Option<&S> {
        if !host.is_alive(node) {
            return None;
        }
        self.entries.get(&node)
    }

    pub fn get_live_mut(&mut self, host: &dyn SceneHost, node: NodeId) -> Option<&mut S> {
        if !host.is_alive(node) {
            return None;
        }
        self.entries.get_mut(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// Unbind and return the state of `node`. Returns `None` if the node owns
    /// nothing, including when it was already released.
    pub fn release(&mut self, node: NodeId) -> Option<S> {
        let state = self.entries.remove(&node);
        match state {
            Some(_) => {
                self.stats.released += 1;
                debug!("{}: released state of {:?} ({} live)", self.kind, node, self.len());
            }
            None => warn!("{}: no state to release for {:?}", self.kind, node),
        }
        state
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles of all nodes that currently own state
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut S)> + '_ {
        self.entries.iter_mut().map(|(node, state)| (*node, state))
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }
}
