//! Shared Inventory: the single mutable record of unclaimed order units

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{SharedError, SharedResult};
use crate::types::Order;

/// State guarded by the inventory lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryState {
    order_size: u32,
    remaining: u32,
    destroyed: bool,
}

impl InventoryState {
    pub fn new(order: Order) -> Self {
        Self {
            order_size: order.size,
            remaining: order.size,
            destroyed: false,
        }
    }

    /// Allocate `min(requested, remaining)` and subtract it.
    ///
    /// Returns 0 once the inventory is exhausted; that is the caller's signal to stop.
    pub fn claim(&mut self, requested: u32) -> u32 {
        let allocated = requested.min(self.remaining);
        self.remaining -= allocated;
        allocated
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn order_size(&self) -> u32 {
        self.order_size
    }
}

/// Cloneable handle to the lock-guarded inventory
#[derive(Debug, Clone)]
pub struct SharedInventory {
    name: Arc<str>,
    state: Arc<Mutex<InventoryState>>,
}

impl SharedInventory {
    pub fn create(name: impl Into<String>, order: Order) -> Self {
        let name: String = name.into();
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(InventoryState::new(order))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Claim up to `requested` units; the read of `remaining` and the decrement
    /// happen under one held lock.
    pub async fn claim(&self, requested: u32) -> SharedResult<u32> {
        if requested == 0 {
            return Err(SharedError::InvalidClaim { requested });
        }
        let mut state = self.state.lock().await;
        self.ensure_live(&state)?;
        Ok(state.claim(requested))
    }

    pub async fn remaining(&self) -> SharedResult<u32> {
        let state = self.state.lock().await;
        self.ensure_live(&state)?;
        Ok(state.remaining())
    }

    /// Original order size, read under the inventory lock
    pub async fn order_size(&self) -> SharedResult<u32> {
        let state = self.state.lock().await;
        self.ensure_live(&state)?;
        Ok(state.order_size())
    }

    /// Mark the inventory destroyed. Returns `false` if it already was.
    pub async fn destroy(&self) -> bool {
        let mut state = self.state.lock().await;
        !std::mem::replace(&mut state.destroyed, true)
    }

    pub async fn is_destroyed(&self) -> bool {
        self.state.lock().await.destroyed
    }

    fn ensure_live(&self, state: &InventoryState) -> SharedResult<()> {
        if state.destroyed {
            return Err(SharedError::ResourceDestroyed {
                resource: self.name.to_string(),
            });
        }
        Ok(())
    }
}
