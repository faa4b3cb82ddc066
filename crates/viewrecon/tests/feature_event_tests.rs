//! Integration tests for the low-level feature slot events.

mod common;

use std::sync::atomic::Ordering;

use common::{count, harness, initialized};
use viewrecon::backend::ParamBlock;
use viewrecon::{FeatureEvent, FeatureKind, FeatureSlot, InitOptions};
use viewrecon_core::{ReconError, VendorStatus};

fn block() -> ParamBlock {
    ParamBlock::from_raw(500).unwrap()
}

#[test]
fn test_create_evaluate_destroy() {
    let h = initialized();
    let slot = h.registry.allocate_feature_slot().unwrap();

    h.registry
        .on_feature_event(&FeatureEvent::Create {
            slot,
            kind: FeatureKind::SuperSampling,
            params: block(),
        })
        .unwrap();
    assert!(h.registry.feature_at(slot).is_some());
    assert!(h.sink.contains("created SuperSampling feature"));

    h.registry
        .on_feature_event(&FeatureEvent::Evaluate {
            slot,
            params: block(),
        })
        .unwrap();
    assert_eq!(count(&h.runtime.calls.evaluate_feature), 1);

    h.registry
        .on_feature_event(&FeatureEvent::Destroy { slot })
        .unwrap();
    assert_eq!(count(&h.runtime.calls.release), 1);
    assert_eq!(h.registry.feature_at(slot), None);
    assert_eq!(h.runtime.live_features(), 0);
}

#[test]
fn test_create_on_unreserved_slot() {
    let h = initialized();
    let result = h.registry.on_feature_event(&FeatureEvent::Create {
        slot: FeatureSlot(17),
        kind: FeatureKind::RayReconstruction,
        params: block(),
    });
    assert_eq!(result, Err(ReconError::ContextNotFound));
    assert_eq!(count(&h.runtime.calls.create_feature), 0);
}

#[test]
fn test_create_failure_leaves_slot_unbound() {
    let h = initialized();
    let slot = h.registry.allocate_feature_slot().unwrap();
    h.runtime.script(|f| f.create = Some(VendorStatus::FEATURE_NOT_SUPPORTED));

    let result = h.registry.on_feature_event(&FeatureEvent::Create {
        slot,
        kind: FeatureKind::SuperSampling,
        params: block(),
    });
    assert_eq!(result, Err(ReconError::FeatureNotSupported));
    assert_eq!(h.registry.feature_at(slot), None);
}

#[test]
fn test_evaluate_unknown_slot() {
    let h = initialized();
    let slot = h.registry.allocate_feature_slot().unwrap();
    let result = h.registry.on_feature_event(&FeatureEvent::Evaluate {
        slot,
        params: block(),
    });
    assert_eq!(result, Err(ReconError::ContextNotFound));
    assert_eq!(count(&h.runtime.calls.evaluate_feature), 0);
    assert!(h.sink.contains("not found"));
}

#[test]
fn test_destroy_unknown_slot() {
    let h = initialized();
    assert_eq!(
        h.registry
            .on_feature_event(&FeatureEvent::Destroy { slot: FeatureSlot(3) }),
        Err(ReconError::ContextNotFound)
    );
}

#[test]
fn test_events_need_command_list() {
    let h = initialized();
    h.host.recording.store(false, Ordering::SeqCst);
    let slot = h.registry.allocate_feature_slot().unwrap();
    assert_eq!(
        h.registry.on_feature_event(&FeatureEvent::Destroy { slot }),
        Err(ReconError::PlatformError)
    );
}

#[test]
fn test_events_need_initialization() {
    let h = harness();
    assert_eq!(
        h.registry
            .on_feature_event(&FeatureEvent::Destroy { slot: FeatureSlot(0) }),
        Err(ReconError::NotInitialized)
    );
}

#[test]
fn test_free_slot_releases_bound_feature() {
    let h = initialized();
    let slot = h.registry.allocate_feature_slot().unwrap();
    h.registry
        .on_feature_event(&FeatureEvent::Create {
            slot,
            kind: FeatureKind::SuperSampling,
            params: block(),
        })
        .unwrap();

    h.registry.free_feature_slot(slot).unwrap();
    assert_eq!(h.runtime.live_features(), 0);
    assert_eq!(
        h.registry.free_feature_slot(slot),
        Err(ReconError::ContextNotFound)
    );
}

#[test]
fn test_shutdown_releases_bound_slots() {
    let h = initialized();
    for _ in 0..2 {
        let slot = h.registry.allocate_feature_slot().unwrap();
        h.registry
            .on_feature_event(&FeatureEvent::Create {
                slot,
                kind: FeatureKind::SuperSampling,
                params: block(),
            })
            .unwrap();
    }

    h.registry.shutdown();
    assert_eq!(h.runtime.live_features(), 0);
    assert_eq!(count(&h.runtime.calls.release), 2);
}

#[test]
fn test_slot_allocation_wraps() {
    let h = harness();
    for _ in 0..viewrecon::HANDLE_CAPACITY {
        h.registry.allocate_feature_slot().unwrap();
    }
    assert_eq!(
        h.registry.allocate_feature_slot(),
        Err(ReconError::ContextAlreadyExists)
    );
    h.registry.free_feature_slot(FeatureSlot(0)).unwrap();
    assert_eq!(h.registry.allocate_feature_slot(), Ok(FeatureSlot(0)));
}

#[test]
fn test_slot_numbering_restarts_after_reinitialize() {
    let h = initialized();
    for _ in 0..3 {
        h.registry.allocate_feature_slot().unwrap();
    }

    h.registry.shutdown();
    h.registry.initialize(&InitOptions::with_app_id(1)).unwrap();
    assert_eq!(h.registry.allocate_feature_slot(), Ok(FeatureSlot(0)));
}
