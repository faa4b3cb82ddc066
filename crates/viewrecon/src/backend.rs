//! Contracts for the two external collaborators.
//!
//! [`VendorRuntime`] is the fixed call surface of the vendor reconstruction
//! runtime. [`GraphicsHost`] is the rendering host that owns the device and
//! the command recording machinery. Both are implemented outside this crate;
//! the registry only talks to them through these traits.

use std::num::NonZeroU64;
use std::path::PathBuf;

use viewrecon_core::{Dimensions, FeatureStats, OptimalSettings, Result, TextureRef, VendorStatus};

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub NonZeroU64);

        impl $name {
            /// Wrap a raw handle value; zero is rejected.
            pub const fn from_raw(raw: u64) -> Option<Self> {
                match NonZeroU64::new(raw) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// The raw handle value.
            pub const fn raw(self) -> u64 {
                self.0.get()
            }
        }
    };
}

opaque_handle!(
    /// The graphics device the runtime is bound to.
    DeviceHandle
);
opaque_handle!(
    /// A command list that GPU work is recorded into.
    CommandList
);
opaque_handle!(
    /// A vendor key-value parameter object.
    ParamBlock
);
opaque_handle!(
    /// A vendor feature instance.
    VendorFeature
);

/// How the application identifies itself to the vendor runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitIdentity {
    /// Project-ID based identity.
    ProjectId {
        project_id: String,
        engine_version: String,
    },
    /// Numeric application-ID identity.
    ApplicationId(u64),
}

/// Arguments for [`VendorRuntime::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInit {
    pub identity: InitIdentity,
    /// Directory the runtime writes its logs to.
    pub log_path: PathBuf,
}

/// A typed value stored in a [`ParamBlock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
    U64(u64),
    /// A GPU resource reference.
    Resource(TextureRef),
    /// An opaque host pointer, carried as an address.
    Pointer(u64),
}

/// The type requested by [`VendorRuntime::get_parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    I32,
    U32,
    F32,
    F64,
    U64,
    Resource,
    Pointer,
}

/// Which generic feature to create through [`VendorRuntime::create_feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FeatureKind {
    SuperSampling = 1,
    RayReconstruction = 13,
}

/// Fields shared by both creation descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureCreateCommon {
    pub input: Dimensions,
    pub target: Dimensions,
    pub perf_quality: i32,
    pub feature_flags: i32,
    pub enable_output_subrects: bool,
}

/// Super resolution creation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrCreateDesc {
    pub common: FeatureCreateCommon,
}

/// Ray reconstruction creation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RrCreateDesc {
    pub common: FeatureCreateCommon,
    pub denoise_mode: i32,
    pub roughness_mode: i32,
    pub use_hw_depth: i32,
}

/// Fields shared by both evaluation descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvalCommon {
    pub color: TextureRef,
    pub output: TextureRef,
    pub depth: TextureRef,
    pub motion_vectors: TextureRef,
    pub exposure_texture: TextureRef,
    pub bias_current_color_mask: TextureRef,
    pub transparency_mask: TextureRef,
    pub jitter_offset_x: f32,
    pub jitter_offset_y: f32,
    pub mv_scale_x: f32,
    pub mv_scale_y: f32,
    pub render_subrect: Dimensions,
    pub reset: bool,
    pub pre_exposure: f32,
    pub exposure_scale: f32,
    pub indicator_invert_x_axis: bool,
    pub indicator_invert_y_axis: bool,
    pub color_subrect_base: viewrecon_core::Coordinates,
    pub depth_subrect_base: viewrecon_core::Coordinates,
    pub mv_subrect_base: viewrecon_core::Coordinates,
    pub output_subrect_base: viewrecon_core::Coordinates,
    pub bias_current_color_subrect_base: viewrecon_core::Coordinates,
}

/// Super resolution evaluation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SrEvalDesc {
    pub common: EvalCommon,
}

/// Ray reconstruction evaluation descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RrEvalDesc {
    pub common: EvalCommon,
    pub gbuffer: viewrecon_core::GBufferTextures,
    pub rays: viewrecon_core::RayTextures,
    pub optional: viewrecon_core::RrOptionalTextures,
    /// Column-major.
    pub world_to_view: [f32; 16],
    /// Column-major.
    pub view_to_clip: [f32; 16],
    pub frame_time_delta_ms: f32,
}

/// The vendor reconstruction runtime.
///
/// Every method is synchronous and uncancellable; failures are reported as a
/// [`VendorStatus`].
pub trait VendorRuntime: Send + Sync {
    /// Initialize the runtime for `device`.
    fn init(&self, init: &RuntimeInit, device: DeviceHandle) -> VendorStatus;

    /// Shut the runtime down for `device`.
    fn shutdown(&self, device: DeviceHandle) -> VendorStatus;

    /// Fetch the shared capability/parameter object.
    fn capability_parameters(&self) -> std::result::Result<ParamBlock, VendorStatus>;

    /// Destroy a parameter object.
    fn destroy_parameters(&self, block: ParamBlock) -> VendorStatus;

    /// Store a typed value under `key`.
    fn set_parameter(&self, block: ParamBlock, key: &str, value: ParamValue);

    /// Read a typed value stored under `key`.
    fn get_parameter(
        &self,
        block: ParamBlock,
        key: &str,
        kind: ParamKind,
    ) -> std::result::Result<ParamValue, VendorStatus>;

    /// Create a super resolution feature.
    fn create_sr(
        &self,
        cmd: CommandList,
        block: ParamBlock,
        desc: &SrCreateDesc,
    ) -> std::result::Result<VendorFeature, VendorStatus>;

    /// Create a ray reconstruction feature.
    fn create_rr(
        &self,
        cmd: CommandList,
        block: ParamBlock,
        desc: &RrCreateDesc,
    ) -> std::result::Result<VendorFeature, VendorStatus>;

    /// Create a feature configured entirely through `block`.
    fn create_feature(
        &self,
        cmd: CommandList,
        kind: FeatureKind,
        block: ParamBlock,
    ) -> std::result::Result<VendorFeature, VendorStatus>;

    /// Evaluate a super resolution feature.
    fn evaluate_sr(
        &self,
        cmd: CommandList,
        feature: VendorFeature,
        block: ParamBlock,
        desc: &SrEvalDesc,
    ) -> VendorStatus;

    /// Evaluate a ray reconstruction feature.
    fn evaluate_rr(
        &self,
        cmd: CommandList,
        feature: VendorFeature,
        block: ParamBlock,
        desc: &RrEvalDesc,
    ) -> VendorStatus;

    /// Evaluate a feature configured entirely through `block`.
    fn evaluate_feature(
        &self,
        cmd: CommandList,
        feature: VendorFeature,
        block: ParamBlock,
    ) -> VendorStatus;

    /// Release a feature instance.
    fn release_feature(&self, feature: VendorFeature) -> VendorStatus;

    /// Optimal render settings for super resolution.
    fn optimal_settings_sr(
        &self,
        block: ParamBlock,
        output: Dimensions,
        perf_quality: i32,
    ) -> std::result::Result<OptimalSettings, VendorStatus>;

    /// Optimal render settings for ray reconstruction.
    fn optimal_settings_rr(
        &self,
        block: ParamBlock,
        output: Dimensions,
        perf_quality: i32,
    ) -> std::result::Result<OptimalSettings, VendorStatus>;

    /// Memory statistics for super resolution.
    fn stats_sr(&self, block: ParamBlock) -> std::result::Result<FeatureStats, VendorStatus>;

    /// Memory statistics for ray reconstruction.
    fn stats_rr(&self, block: ParamBlock) -> std::result::Result<FeatureStats, VendorStatus>;
}

impl dyn VendorRuntime + '_ {
    /// Read an `i32`, yielding `None` when absent or mistyped.
    pub fn get_i32(&self, block: ParamBlock, key: &str) -> Option<i32> {
        match self.get_parameter(block, key, ParamKind::I32) {
            Ok(ParamValue::I32(v)) => Some(v),
            _ => None,
        }
    }

    /// Read a `u32`, yielding `None` when absent or mistyped.
    pub fn get_u32(&self, block: ParamBlock, key: &str) -> Option<u32> {
        match self.get_parameter(block, key, ParamKind::U32) {
            Ok(ParamValue::U32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn set_i32(&self, block: ParamBlock, key: &str, value: i32) {
        self.set_parameter(block, key, ParamValue::I32(value));
    }
}

/// A short-lived command recording scope opened on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingScope {
    /// The command list open for recording.
    pub command_list: CommandList,
    /// Host-side token for the backing allocator.
    pub allocator: u64,
}

/// The rendering host that owns the device.
pub trait GraphicsHost: Send + Sync {
    /// The device to bind the runtime to, if one exists.
    fn device(&self) -> Option<DeviceHandle>;

    /// Open a private recording scope (allocator plus list).
    fn begin_recording(&self) -> Result<RecordingScope>;

    /// Close a scope opened by [`begin_recording`](Self::begin_recording).
    fn end_recording(&self, scope: RecordingScope);

    /// The command list the host is currently recording, if any.
    fn current_command_list(&self) -> Option<CommandList>;
}

/// Parameter keys understood by the vendor runtime.
pub mod keys {
    pub const SR_AVAILABLE: &str = "SuperSampling.Available";
    pub const RR_AVAILABLE: &str = "SuperSamplingDenoising.Available";
    pub const NEEDS_UPDATED_DRIVER: &str = "SuperSampling.NeedsUpdatedDriver";
    pub const MIN_DRIVER_VERSION_MAJOR: &str = "SuperSampling.MinDriverVersionMajor";
    pub const MIN_DRIVER_VERSION_MINOR: &str = "SuperSampling.MinDriverVersionMinor";

    pub const SR_PRESET_DLAA: &str = "DLSS.Hint.Render.Preset.DLAA";
    pub const SR_PRESET_QUALITY: &str = "DLSS.Hint.Render.Preset.Quality";
    pub const SR_PRESET_BALANCED: &str = "DLSS.Hint.Render.Preset.Balanced";
    pub const SR_PRESET_PERFORMANCE: &str = "DLSS.Hint.Render.Preset.Performance";
    pub const SR_PRESET_ULTRA_PERFORMANCE: &str = "DLSS.Hint.Render.Preset.UltraPerformance";
    pub const SR_PRESET_ULTRA_QUALITY: &str = "DLSS.Hint.Render.Preset.UltraQuality";

    pub const RR_PRESET_DLAA: &str = "RayReconstruction.Hint.Render.Preset.DLAA";
    pub const RR_PRESET_QUALITY: &str = "RayReconstruction.Hint.Render.Preset.Quality";
    pub const RR_PRESET_BALANCED: &str = "RayReconstruction.Hint.Render.Preset.Balanced";
    pub const RR_PRESET_PERFORMANCE: &str = "RayReconstruction.Hint.Render.Preset.Performance";
    pub const RR_PRESET_ULTRA_PERFORMANCE: &str =
        "RayReconstruction.Hint.Render.Preset.UltraPerformance";
    pub const RR_PRESET_ULTRA_QUALITY: &str = "RayReconstruction.Hint.Render.Preset.UltraQuality";
}
