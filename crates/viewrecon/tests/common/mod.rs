//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use viewrecon::backend::{
    CommandList, DeviceHandle, FeatureKind, GraphicsHost, ParamBlock, ParamKind, ParamValue,
    RecordingScope, RrCreateDesc, RrEvalDesc, RuntimeInit, SrCreateDesc, SrEvalDesc,
    VendorFeature, VendorRuntime, keys,
};
use viewrecon::{ContextRegistry, InitOptions, RegistryConfig};
use viewrecon_core::{
    CreateParams, Dimensions, FeatureStats, MemorySink, Mode, OptimalSettings,
    ReconError, Result, VendorStatus,
};

pub const CAPABILITY_BLOCK: u64 = 1;
pub const DEVICE: u64 = 0xD3D;
pub const HOST_LIST: u64 = 0xC0FFEE;

/// Scripted failure statuses, consumed by every matching call until cleared.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub init: Option<VendorStatus>,
    pub capability: Option<VendorStatus>,
    pub create: Option<VendorStatus>,
    pub evaluate: Option<VendorStatus>,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub init: AtomicUsize,
    pub shutdown: AtomicUsize,
    pub destroy_parameters: AtomicUsize,
    pub create_sr: AtomicUsize,
    pub create_rr: AtomicUsize,
    pub create_feature: AtomicUsize,
    pub evaluate_sr: AtomicUsize,
    pub evaluate_rr: AtomicUsize,
    pub evaluate_feature: AtomicUsize,
    pub release: AtomicUsize,
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// An in-memory vendor runtime.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    pub calls: Calls,
    pub failures: Mutex<Failures>,
    next_handle: AtomicU64,
    live: Mutex<HashSet<u64>>,
    /// Live feature count observed by each vendor shutdown.
    pub live_at_shutdown: Mutex<Vec<usize>>,
    values: Mutex<HashMap<(u64, String), ParamValue>>,
    pub last_init: Mutex<Option<RuntimeInit>>,
    pub last_sr_create: Mutex<Option<SrCreateDesc>>,
    pub last_rr_create: Mutex<Option<RrCreateDesc>>,
    pub last_sr_eval: Mutex<Option<(CommandList, SrEvalDesc)>>,
    pub last_rr_eval: Mutex<Option<(CommandList, RrEvalDesc)>>,
}

impl FakeRuntime {
    /// A runtime reporting super resolution as available.
    pub fn new() -> Arc<Self> {
        let runtime = Self {
            next_handle: AtomicU64::new(100),
            ..Default::default()
        };
        runtime.store(CAPABILITY_BLOCK, keys::SR_AVAILABLE, ParamValue::I32(1));
        runtime.store(CAPABILITY_BLOCK, keys::RR_AVAILABLE, ParamValue::I32(0));
        Arc::new(runtime)
    }

    pub fn store(&self, block: u64, key: &str, value: ParamValue) {
        self.values.lock().insert((block, key.to_owned()), value);
    }

    pub fn value(&self, block: u64, key: &str) -> Option<ParamValue> {
        self.values.lock().get(&(block, key.to_owned())).copied()
    }

    pub fn script(&self, update: impl FnOnce(&mut Failures)) {
        update(&mut self.failures.lock());
    }

    /// Number of feature handles created and not yet released.
    pub fn live_features(&self) -> usize {
        self.live.lock().len()
    }

    fn new_feature(&self) -> VendorFeature {
        let raw = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live.lock().insert(raw);
        VendorFeature::from_raw(raw).unwrap()
    }

    fn create(&self) -> std::result::Result<VendorFeature, VendorStatus> {
        match self.failures.lock().create {
            Some(status) => Err(status),
            None => Ok(self.new_feature()),
        }
    }

    fn evaluate(&self) -> VendorStatus {
        self.failures.lock().evaluate.unwrap_or(VendorStatus::SUCCESS)
    }
}

impl VendorRuntime for FakeRuntime {
    fn init(&self, init: &RuntimeInit, _device: DeviceHandle) -> VendorStatus {
        self.calls.init.fetch_add(1, Ordering::SeqCst);
        *self.last_init.lock() = Some(init.clone());
        self.failures.lock().init.unwrap_or(VendorStatus::SUCCESS)
    }

    fn shutdown(&self, _device: DeviceHandle) -> VendorStatus {
        self.calls.shutdown.fetch_add(1, Ordering::SeqCst);
        self.live_at_shutdown.lock().push(self.live_features());
        VendorStatus::SUCCESS
    }

    fn capability_parameters(&self) -> std::result::Result<ParamBlock, VendorStatus> {
        match self.failures.lock().capability {
            Some(status) => Err(status),
            None => Ok(ParamBlock::from_raw(CAPABILITY_BLOCK).unwrap()),
        }
    }

    fn destroy_parameters(&self, _block: ParamBlock) -> VendorStatus {
        self.calls.destroy_parameters.fetch_add(1, Ordering::SeqCst);
        VendorStatus::SUCCESS
    }

    fn set_parameter(&self, block: ParamBlock, key: &str, value: ParamValue) {
        self.store(block.raw(), key, value);
    }

    fn get_parameter(
        &self,
        block: ParamBlock,
        key: &str,
        _kind: ParamKind,
    ) -> std::result::Result<ParamValue, VendorStatus> {
        self.value(block.raw(), key)
            .ok_or(VendorStatus::INVALID_PARAMETER)
    }

    fn create_sr(
        &self,
        _cmd: CommandList,
        _block: ParamBlock,
        desc: &SrCreateDesc,
    ) -> std::result::Result<VendorFeature, VendorStatus> {
        self.calls.create_sr.fetch_add(1, Ordering::SeqCst);
        *self.last_sr_create.lock() = Some(*desc);
        self.create()
    }

    fn create_rr(
        &self,
        _cmd: CommandList,
        _block: ParamBlock,
        desc: &RrCreateDesc,
    ) -> std::result::Result<VendorFeature, VendorStatus> {
        self.calls.create_rr.fetch_add(1, Ordering::SeqCst);
        *self.last_rr_create.lock() = Some(*desc);
        self.create()
    }

    fn create_feature(
        &self,
        _cmd: CommandList,
        _kind: FeatureKind,
        _block: ParamBlock,
    ) -> std::result::Result<VendorFeature, VendorStatus> {
        self.calls.create_feature.fetch_add(1, Ordering::SeqCst);
        self.create()
    }

    fn evaluate_sr(
        &self,
        cmd: CommandList,
        _feature: VendorFeature,
        _block: ParamBlock,
        desc: &SrEvalDesc,
    ) -> VendorStatus {
        self.calls.evaluate_sr.fetch_add(1, Ordering::SeqCst);
        *self.last_sr_eval.lock() = Some((cmd, *desc));
        self.evaluate()
    }

    fn evaluate_rr(
        &self,
        cmd: CommandList,
        _feature: VendorFeature,
        _block: ParamBlock,
        desc: &RrEvalDesc,
    ) -> VendorStatus {
        self.calls.evaluate_rr.fetch_add(1, Ordering::SeqCst);
        *self.last_rr_eval.lock() = Some((cmd, *desc));
        self.evaluate()
    }

    fn evaluate_feature(
        &self,
        _cmd: CommandList,
        _feature: VendorFeature,
        _block: ParamBlock,
    ) -> VendorStatus {
        self.calls.evaluate_feature.fetch_add(1, Ordering::SeqCst);
        self.evaluate()
    }

    fn release_feature(&self, feature: VendorFeature) -> VendorStatus {
        self.calls.release.fetch_add(1, Ordering::SeqCst);
        if self.live.lock().remove(&feature.raw()) {
            VendorStatus::SUCCESS
        } else {
            VendorStatus::FEATURE_NOT_FOUND
        }
    }

    fn optimal_settings_sr(
        &self,
        _block: ParamBlock,
        output: Dimensions,
        _perf_quality: i32,
    ) -> std::result::Result<OptimalSettings, VendorStatus> {
        Ok(OptimalSettings {
            optimal: Dimensions::new(output.width / 2, output.height / 2),
            min: Dimensions::new(output.width / 3, output.height / 3),
            max: output,
            sharpness: 0.0,
        })
    }

    fn optimal_settings_rr(
        &self,
        _block: ParamBlock,
        _output: Dimensions,
        _perf_quality: i32,
    ) -> std::result::Result<OptimalSettings, VendorStatus> {
        Err(VendorStatus::FEATURE_NOT_SUPPORTED)
    }

    fn stats_sr(&self, _block: ParamBlock) -> std::result::Result<FeatureStats, VendorStatus> {
        Ok(FeatureStats {
            vram_allocated_bytes: 64 << 20,
            opt_level: 1,
            is_dev_branch: false,
        })
    }

    fn stats_rr(&self, _block: ParamBlock) -> std::result::Result<FeatureStats, VendorStatus> {
        Ok(FeatureStats {
            vram_allocated_bytes: 128 << 20,
            opt_level: 2,
            is_dev_branch: true,
        })
    }
}

/// A rendering host with a fixed device and a toggleable current list.
#[derive(Debug)]
pub struct FakeHost {
    pub device: Option<DeviceHandle>,
    pub recording: AtomicBool,
    pub fail_begin: AtomicBool,
    pub begun: AtomicUsize,
    pub ended: AtomicUsize,
    next_list: AtomicU64,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Self::with_device(DeviceHandle::from_raw(DEVICE))
    }

    pub fn with_device(device: Option<DeviceHandle>) -> Arc<Self> {
        Arc::new(Self {
            device,
            recording: AtomicBool::new(true),
            fail_begin: AtomicBool::new(false),
            begun: AtomicUsize::new(0),
            ended: AtomicUsize::new(0),
            next_list: AtomicU64::new(1),
        })
    }

    pub fn host_list() -> CommandList {
        CommandList::from_raw(HOST_LIST).unwrap()
    }
}

impl GraphicsHost for FakeHost {
    fn device(&self) -> Option<DeviceHandle> {
        self.device
    }

    fn begin_recording(&self) -> Result<RecordingScope> {
        if self.fail_begin.load(Ordering::SeqCst) {
            return Err(ReconError::PlatformError);
        }
        self.begun.fetch_add(1, Ordering::SeqCst);
        let raw = self.next_list.fetch_add(1, Ordering::SeqCst);
        Ok(RecordingScope {
            command_list: CommandList::from_raw(raw).unwrap(),
            allocator: raw,
        })
    }

    fn end_recording(&self, _scope: RecordingScope) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }

    fn current_command_list(&self) -> Option<CommandList> {
        self.recording
            .load(Ordering::SeqCst)
            .then(Self::host_list)
    }
}

pub struct Harness {
    pub registry: ContextRegistry,
    pub runtime: Arc<FakeRuntime>,
    pub host: Arc<FakeHost>,
    pub sink: Arc<MemorySink>,
}

/// An uninitialized registry wired to fresh fakes and a memory sink.
pub fn harness() -> Harness {
    let runtime = FakeRuntime::new();
    let host = FakeHost::new();
    let (logger, sink) = MemorySink::logger();
    let registry = ContextRegistry::with_logger(
        runtime.clone(),
        host.clone(),
        RegistryConfig::default(),
        Arc::new(logger),
    );
    Harness {
        registry,
        runtime,
        host,
        sink,
    }
}

/// An initialized registry.
pub fn initialized() -> Harness {
    let h = harness();
    h.registry
        .initialize(&InitOptions::with_app_id(1))
        .expect("initialize");
    h
}

pub fn sr_params(input: (u32, u32), output: (u32, u32)) -> CreateParams {
    CreateParams::new(
        Mode::SuperResolution,
        Dimensions::new(input.0, input.1),
        Dimensions::new(output.0, output.1),
    )
}

pub fn rr_params(input: (u32, u32), output: (u32, u32)) -> CreateParams {
    CreateParams::new(
        Mode::RayReconstruction,
        Dimensions::new(input.0, input.1),
        Dimensions::new(output.0, output.1),
    )
}
