//! Integer feature slots for the low-level create/evaluate/destroy path.
//!
//! Hosts that drive features directly reserve a slot here, then bind the
//! vendor handle to it once the create event has run on the render thread.

use std::collections::HashMap;

use parking_lot::Mutex;
use viewrecon_core::{ReconError, Result};

use crate::backend::VendorFeature;

/// Number of distinct slots before the counter wraps.
pub const HANDLE_CAPACITY: u32 = 1024;

/// A reserved integer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureSlot(pub u32);

#[derive(Debug, Default)]
struct TableInner {
    /// Reserved slots; `None` until a feature is bound.
    slots: HashMap<u32, Option<VendorFeature>>,
    counter: u64,
}

/// A capacity-bounded table of feature slots.
#[derive(Debug, Default)]
pub struct FeatureHandleTable {
    inner: Mutex<TableInner>,
}

impl FeatureHandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot.
    ///
    /// Slots are handed out round-robin. If the next slot is still in use the
    /// call fails and the counter stays put, so a later call retries the same
    /// slot.
    pub fn allocate(&self) -> Result<FeatureSlot> {
        let mut inner = self.inner.lock();
        let slot = (inner.counter % u64::from(HANDLE_CAPACITY)) as u32;
        if inner.slots.contains_key(&slot) {
            return Err(ReconError::ContextAlreadyExists);
        }
        inner.slots.insert(slot, None);
        inner.counter += 1;
        Ok(FeatureSlot(slot))
    }

    /// Attach a vendor feature to a reserved slot.
    ///
    /// Returns the feature previously bound there, if any.
    pub fn bind(&self, slot: FeatureSlot, feature: VendorFeature) -> Result<Option<VendorFeature>> {
        let mut inner = self.inner.lock();
        let entry = inner
            .slots
            .get_mut(&slot.0)
            .ok_or(ReconError::ContextNotFound)?;
        Ok(entry.replace(feature))
    }

    /// The feature bound to `slot`.
    pub fn lookup(&self, slot: FeatureSlot) -> Option<VendorFeature> {
        self.inner.lock().slots.get(&slot.0).copied().flatten()
    }

    /// Returns `true` if `slot` is reserved.
    pub fn contains(&self, slot: FeatureSlot) -> bool {
        self.inner.lock().slots.contains_key(&slot.0)
    }

    /// Release the reservation, returning any bound feature for release.
    pub fn free(&self, slot: FeatureSlot) -> Result<Option<VendorFeature>> {
        self.inner
            .lock()
            .slots
            .remove(&slot.0)
            .ok_or(ReconError::ContextNotFound)
    }

    /// Remove every slot and restart numbering at zero, returning the bound
    /// features.
    pub fn drain(&self) -> Vec<VendorFeature> {
        let mut inner = self.inner.lock();
        inner.counter = 0;
        inner.slots.drain().filter_map(|(_, feature)| feature).collect()
    }

    /// Number of reserved slots.
    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
