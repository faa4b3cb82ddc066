//! Creation and execution parameter types.
//!
//! These are the application-level descriptions of a reconstruction context
//! and of one frame's evaluation. They are converted into vendor codes by
//! [`crate::mapping`].

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Reconstruction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Mode {
    /// No reconstruction.
    #[default]
    Off = 0,
    /// Upscaling plus anti-aliasing.
    SuperResolution = 1,
    /// Ray-traced denoising plus upscaling.
    RayReconstruction = 2,
}

impl Mode {
    /// Parse a raw mode value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::SuperResolution),
            2 => Some(Self::RayReconstruction),
            _ => None,
        }
    }

    /// Short label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::SuperResolution => "SR",
            Self::RayReconstruction => "RR",
        }
    }
}

/// Quality tier, controlling the resolution scaling factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Quality {
    /// Performance tier.
    MaxPerformance = 0,
    #[default]
    Balanced = 1,
    /// Quality tier.
    MaxQuality = 2,
    UltraPerformance = 3,
    UltraQuality = 4,
    /// Anti-aliasing only, no upscaling.
    Dlaa = 5,
}

impl Quality {
    /// Every defined tier.
    pub const ALL: [Quality; 6] = [
        Quality::MaxPerformance,
        Quality::Balanced,
        Quality::MaxQuality,
        Quality::UltraPerformance,
        Quality::UltraQuality,
        Quality::Dlaa,
    ];

    /// Parse a raw tier value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|q| *q as u32 == raw)
    }

    /// Human label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dlaa => "DLAA",
            Self::UltraQuality => "UltraQuality",
            Self::MaxQuality => "Quality",
            Self::Balanced => "Balanced",
            Self::MaxPerformance => "Performance",
            Self::UltraPerformance => "UltraPerformance",
        }
    }
}

/// Render presets for super resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum SrPreset {
    #[default]
    Default = 0,
    /// Deprecated.
    F = 6,
    /// Reverts to default.
    G = 7,
    /// Less ghosting, more flickering.
    J = 10,
    /// Transformer model.
    K = 11,
    L = 12,
    M = 13,
}

impl SrPreset {
    /// Parse a raw preset value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Default),
            6 => Some(Self::F),
            7 => Some(Self::G),
            10 => Some(Self::J),
            11 => Some(Self::K),
            12 => Some(Self::L),
            13 => Some(Self::M),
            _ => None,
        }
    }
}

/// Render presets for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum RrPreset {
    #[default]
    Default = 0,
    D = 4,
    /// Required for the depth-of-field guide.
    E = 5,
}

impl RrPreset {
    /// Parse a raw preset value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Default),
            4 => Some(Self::D),
            5 => Some(Self::E),
            _ => None,
        }
    }
}

/// Application feature flag bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureFlags(pub u32);

impl FeatureFlags {
    pub const NONE: Self = Self(0);
    /// Color input is HDR.
    pub const IS_HDR: Self = Self(1 << 0);
    /// Motion vectors are at render resolution.
    pub const MV_LOW_RES: Self = Self(1 << 1);
    /// Motion vectors include jitter.
    pub const MV_JITTERED: Self = Self(1 << 2);
    /// Reversed-Z depth.
    pub const DEPTH_INVERTED: Self = Self(1 << 3);
    pub const AUTO_EXPOSURE: Self = Self(1 << 6);
    pub const ALPHA_UPSCALING: Self = Self(1 << 7);

    /// The six defined flags.
    pub const ALL: [FeatureFlags; 6] = [
        Self::IS_HDR,
        Self::MV_LOW_RES,
        Self::MV_JITTERED,
        Self::DEPTH_INVERTED,
        Self::AUTO_EXPOSURE,
        Self::ALPHA_UPSCALING,
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for FeatureFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FeatureFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Depth buffer representation for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DepthType {
    #[default]
    Linear = 0,
    Hardware = 1,
}

/// Where roughness lives for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum RoughnessMode {
    /// Separate roughness texture.
    #[default]
    Unpacked = 0,
    /// Roughness in the normals' W channel.
    PackedInNormalsW = 1,
}

/// Denoiser selection for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DenoiseMode {
    Off = 0,
    /// Unified learned denoiser, required for ray reconstruction.
    #[default]
    DlUnified = 1,
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is smaller than in `other`.
    #[inline]
    pub const fn smaller_than(self, other: Self) -> bool {
        self.width < other.width || self.height < other.height
    }
}

/// Subrect base coordinates (atlas support).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Coordinates {
    pub x: u32,
    pub y: u32,
}

static_assertions::assert_eq_size!(Dimensions, [u32; 2]);
static_assertions::assert_eq_size!(Coordinates, [u32; 2]);

/// Per-quality-tier super resolution presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SrPresets {
    pub dlaa: SrPreset,
    pub quality: SrPreset,
    pub balanced: SrPreset,
    pub performance: SrPreset,
    pub ultra_performance: SrPreset,
    pub ultra_quality: SrPreset,
}

/// Per-quality-tier ray reconstruction presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RrPresets {
    pub dlaa: RrPreset,
    pub quality: RrPreset,
    pub balanced: RrPreset,
    pub performance: RrPreset,
    pub ultra_performance: RrPreset,
    pub ultra_quality: RrPreset,
}

/// Ray reconstruction creation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RrConfig {
    pub denoise_mode: DenoiseMode,
    pub depth_type: DepthType,
    pub roughness_mode: RoughnessMode,
    pub presets: RrPresets,
}

/// Parameters a reconstruction context is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CreateParams {
    pub mode: Mode,
    pub quality: Quality,
    /// Render (low-res input) resolution.
    pub input_resolution: Dimensions,
    /// Target (upscaled output) resolution.
    pub output_resolution: Dimensions,
    pub feature_flags: FeatureFlags,
    pub sr_presets: SrPresets,
    pub rr: RrConfig,
    /// Enable output subrects for atlas targets.
    pub enable_output_subrects: bool,
}

impl CreateParams {
    /// Parameters for `mode` with the given resolutions and defaults elsewhere.
    pub fn new(mode: Mode, input: Dimensions, output: Dimensions) -> Self {
        Self {
            mode,
            input_resolution: input,
            output_resolution: output,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.feature_flags = flags;
        self
    }

    #[must_use]
    pub fn with_rr(mut self, rr: RrConfig) -> Self {
        self.rr = rr;
        self
    }
}

/// An opaque GPU resource reference supplied by the graphics host.
///
/// `TextureRef::NONE` marks an absent optional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureRef(pub Option<NonZeroU64>);

impl TextureRef {
    pub const NONE: Self = Self(None);

    /// Wrap a raw resource token; zero maps to [`TextureRef::NONE`].
    pub const fn from_raw(raw: u64) -> Self {
        Self(NonZeroU64::new(raw))
    }

    /// The raw token, zero when absent.
    pub const fn raw(self) -> u64 {
        match self.0 {
            Some(v) => v.get(),
            None => 0,
        }
    }

    pub const fn is_some(self) -> bool {
        self.0.is_some()
    }
}

/// Textures shared by both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommonTextures {
    /// Required: low-res (and for ray reconstruction, noisy) color.
    pub color_input: TextureRef,
    /// Required: upscaled output.
    pub color_output: TextureRef,
    /// Required.
    pub depth: TextureRef,
    /// Required: screen-space motion vectors.
    pub motion_vectors: TextureRef,
    /// Optional 1x1 exposure texture.
    pub exposure: TextureRef,
    pub bias_color_mask: TextureRef,
    /// Reserved.
    pub transparency_mask: TextureRef,
}

/// Per-frame values shared by both modes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommonParams {
    /// Jitter in render pixel space.
    pub jitter_offset_x: f32,
    pub jitter_offset_y: f32,
    /// Motion vector scale. `0.0` means 1.0.
    pub mv_scale_x: f32,
    pub mv_scale_y: f32,
    pub render_subrect: Dimensions,
    /// Reset temporal history.
    pub reset: bool,
    /// `0.0` means 1.0.
    pub pre_exposure: f32,
    /// `0.0` means 1.0.
    pub exposure_scale: f32,
    pub invert_y_axis: bool,
    pub invert_x_axis: bool,
    pub color_subrect_base: Coordinates,
    pub depth_subrect_base: Coordinates,
    pub mv_subrect_base: Coordinates,
    pub output_subrect_base: Coordinates,
    pub bias_color_subrect_base: Coordinates,
}

/// G-buffer inputs for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GBufferTextures {
    pub diffuse_albedo: TextureRef,
    pub specular_albedo: TextureRef,
    /// World-space normals, optionally with roughness in W.
    pub normals: TextureRef,
    /// Optional when packed into the normals.
    pub roughness: TextureRef,
    pub emissive: TextureRef,
}

/// Ray direction and hit distance inputs for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RayTextures {
    pub diffuse_ray_direction: TextureRef,
    pub diffuse_hit_distance: TextureRef,
    pub specular_ray_direction: TextureRef,
    pub specular_hit_distance: TextureRef,
    /// Combined direction (xyz) and distance (w).
    pub diffuse_ray_direction_hit_distance: TextureRef,
    pub specular_ray_direction_hit_distance: TextureRef,
}

/// Optional guide textures for ray reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RrOptionalTextures {
    pub reflected_albedo: TextureRef,
    pub color_before_particles: TextureRef,
    pub color_after_particles: TextureRef,
    pub color_before_transparency: TextureRef,
    pub color_after_transparency: TextureRef,
    pub color_before_fog: TextureRef,
    pub color_after_fog: TextureRef,
    /// Requires [`RrPreset::E`].
    pub depth_of_field_guide: TextureRef,
    pub color_before_depth_of_field: TextureRef,
    pub color_after_depth_of_field: TextureRef,
    pub screen_space_subsurface_scattering_guide: TextureRef,
    pub color_before_screen_space_subsurface_scattering: TextureRef,
    pub color_after_screen_space_subsurface_scattering: TextureRef,
    pub screen_space_refraction_guide: TextureRef,
    pub color_before_screen_space_refraction: TextureRef,
    pub color_after_screen_space_refraction: TextureRef,
    pub motion_vectors_reflections: TextureRef,
    pub transparency_layer: TextureRef,
    pub transparency_layer_opacity: TextureRef,
    pub transparency_layer_mvecs: TextureRef,
    pub disocclusion_mask: TextureRef,
    pub alpha: TextureRef,
    pub output_alpha: TextureRef,
}

/// Ray reconstruction evaluation inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrParams {
    pub gbuffer: GBufferTextures,
    pub rays: RayTextures,
    pub optional: RrOptionalTextures,
    pub world_to_view: Mat4,
    pub view_to_clip: Mat4,
    pub frame_time_delta_ms: f32,
}

impl Default for RrParams {
    fn default() -> Self {
        Self {
            gbuffer: GBufferTextures::default(),
            rays: RayTextures::default(),
            optional: RrOptionalTextures::default(),
            world_to_view: Mat4::IDENTITY,
            view_to_clip: Mat4::IDENTITY,
            frame_time_delta_ms: 0.0,
        }
    }
}

/// Everything one evaluation needs.
///
/// The ray reconstruction block is always present and ignored unless `mode`
/// is [`Mode::RayReconstruction`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExecuteParams {
    pub mode: Mode,
    pub textures: CommonTextures,
    pub common: CommonParams,
    pub rr: RrParams,
}

/// Feature availability reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityInfo {
    pub sr_available: bool,
    pub rr_available: bool,
    pub needs_driver_update: bool,
    pub min_driver_version_major: u32,
    pub min_driver_version_minor: u32,
}

/// Render resolution recommendations for an output size and quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptimalSettings {
    pub optimal: Dimensions,
    pub min: Dimensions,
    pub max: Dimensions,
    /// Deprecated by the runtime, reported for compatibility.
    pub sharpness: f32,
}

/// Runtime memory statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureStats {
    pub vram_allocated_bytes: u64,
    pub opt_level: u32,
    pub is_dev_branch: bool,
}
