//! Render-thread event identifiers and payloads.

use crate::backend::{FeatureKind, ParamBlock};
use crate::handles::FeatureSlot;

/// Event ID that triggers evaluation of the current view (`'DLSS'`).
pub const RENDER_EVENT_ID: i32 = 0x444C_5353;

/// Identifiers for the low-level feature events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FeatureEventId {
    Create = 0,
    Evaluate = 1,
    Destroy = 2,
}

/// A low-level feature event issued from the host's render thread.
///
/// The parameter blocks are owned by the host and configured entirely
/// through the runtime's key-value interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureEvent {
    /// Create a feature of `kind` and bind it to `slot`.
    Create {
        slot: FeatureSlot,
        kind: FeatureKind,
        params: ParamBlock,
    },
    /// Evaluate the feature bound to `slot`.
    Evaluate { slot: FeatureSlot, params: ParamBlock },
    /// Release the feature bound to `slot` and free the slot.
    Destroy { slot: FeatureSlot },
}

impl FeatureEvent {
    pub fn id(&self) -> FeatureEventId {
        match self {
            Self::Create { .. } => FeatureEventId::Create,
            Self::Evaluate { .. } => FeatureEventId::Evaluate,
            Self::Destroy { .. } => FeatureEventId::Destroy,
        }
    }

    pub fn slot(&self) -> FeatureSlot {
        match *self {
            Self::Create { slot, .. } | Self::Evaluate { slot, .. } | Self::Destroy { slot } => {
                slot
            }
        }
    }
}
