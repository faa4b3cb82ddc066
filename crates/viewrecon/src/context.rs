//! A single reconstruction feature instance bound to one view.
//!
//! [`FeatureContext`] owns at most one vendor feature handle. The handle is
//! released exactly once, when the context is destroyed, recreated, or
//! dropped. Moving a context moves the handle with it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use viewrecon_core::mapping::{
    to_vendor_denoise_mode, to_vendor_depth_type, to_vendor_feature_flags, to_vendor_perf_quality,
    to_vendor_roughness_mode, to_vendor_rr_preset, to_vendor_sr_preset,
};
use viewrecon_core::{
    CreateParams, ExecuteParams, Logger, Mode, ReconError, Result, VendorStatus, check_status,
    recon_debug, recon_error,
};

use crate::backend::{
    CommandList, EvalCommon, FeatureCreateCommon, ParamBlock, RrCreateDesc, RrEvalDesc,
    SrCreateDesc, SrEvalDesc, VendorFeature, VendorRuntime, keys,
};

/// Shared state a context needs to talk to the vendor runtime.
#[derive(Clone, Copy)]
pub struct FeatureEnv<'a> {
    pub runtime: &'a Arc<dyn VendorRuntime>,
    /// The shared capability/parameter block, absent when uninitialized.
    pub params: Option<ParamBlock>,
    /// Cell receiving the raw status of every vendor call.
    pub last_status: &'a AtomicU32,
    pub logger: &'a Logger,
}

impl FeatureEnv<'_> {
    fn record(&self, status: VendorStatus) {
        self.last_status.store(status.raw(), Ordering::Release);
    }
}

/// A live vendor feature handle, released on drop.
struct OwnedFeature {
    runtime: Arc<dyn VendorRuntime>,
    handle: VendorFeature,
}

impl Drop for OwnedFeature {
    fn drop(&mut self) {
        // Release failures leave nothing to recover.
        let _ = self.runtime.release_feature(self.handle);
    }
}

/// One view's reconstruction feature and the parameters it was created with.
#[derive(Default)]
pub struct FeatureContext {
    feature: Option<OwnedFeature>,
    params: CreateParams,
}

impl FeatureContext {
    /// An empty context holding no feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the vendor feature for `params`, replacing any existing one.
    ///
    /// On failure the context is left empty.
    pub fn create(
        &mut self,
        env: &FeatureEnv<'_>,
        cmd: CommandList,
        params: &CreateParams,
    ) -> Result<()> {
        if self.feature.is_some() {
            recon_debug!(env.logger, "destroying existing feature before recreating");
            self.destroy();
        }

        let Some(block) = env.params else {
            recon_error!(env.logger, "feature create failed: parameter block not available");
            return Err(ReconError::NotInitialized);
        };

        let created = match params.mode {
            Mode::RayReconstruction => {
                recon_debug!(env.logger, "creating ray reconstruction feature");
                push_rr_presets(env.runtime.as_ref(), block, params);
                env.runtime.create_rr(cmd, block, &rr_create_desc(params))
            }
            _ => {
                push_sr_presets(env.runtime.as_ref(), block, params);
                env.runtime.create_sr(cmd, block, &sr_create_desc(params))
            }
        };

        match created {
            Ok(handle) => {
                env.record(VendorStatus::SUCCESS);
                self.feature = Some(OwnedFeature {
                    runtime: Arc::clone(env.runtime),
                    handle,
                });
                self.params = *params;
                Ok(())
            }
            Err(status) => {
                env.record(status);
                check_status(env.logger, status)?;
                // A non-failure status without a handle is still a failed create.
                Err(ReconError::RuntimeError)
            }
        }
    }

    /// Release the feature, if any, and reset the stored parameters.
    pub fn destroy(&mut self) {
        self.feature = None;
        self.params = CreateParams::default();
    }

    /// Record one evaluation into `cmd`.
    pub fn execute(
        &self,
        env: &FeatureEnv<'_>,
        cmd: CommandList,
        params: &ExecuteParams,
    ) -> Result<()> {
        let Some(feature) = &self.feature else {
            return Err(ReconError::ContextNotFound);
        };
        let Some(block) = env.params else {
            return Err(ReconError::NotInitialized);
        };

        let status = match params.mode {
            Mode::RayReconstruction => {
                env.runtime
                    .evaluate_rr(cmd, feature.handle, block, &rr_eval_desc(params))
            }
            _ => env
                .runtime
                .evaluate_sr(cmd, feature.handle, block, &sr_eval_desc(params)),
        };

        env.record(status);
        check_status(env.logger, status)
    }

    /// Returns `true` if moving to `new` requires a fresh vendor feature.
    ///
    /// Preset changes never force recreation. Growing the input resolution
    /// within the existing allocation is allowed; shrinking it is not.
    pub fn needs_recreation(&self, new: &CreateParams) -> bool {
        let old = &self.params;
        if old.mode != new.mode
            || old.output_resolution != new.output_resolution
            || new.input_resolution.smaller_than(old.input_resolution)
            || old.quality != new.quality
            || old.feature_flags != new.feature_flags
        {
            return true;
        }

        new.mode == Mode::RayReconstruction
            && (old.rr.denoise_mode != new.rr.denoise_mode
                || old.rr.depth_type != new.rr.depth_type
                || old.rr.roughness_mode != new.rr.roughness_mode)
    }

    /// Returns `true` while a vendor feature is held.
    pub fn is_valid(&self) -> bool {
        self.feature.is_some()
    }

    /// The parameters of the live feature, or defaults when empty.
    pub fn params(&self) -> &CreateParams {
        &self.params
    }

    /// The vendor handle currently held.
    pub fn handle(&self) -> Option<VendorFeature> {
        self.feature.as_ref().map(|f| f.handle)
    }

    /// Move the feature out, leaving this context empty.
    pub fn take(&mut self) -> FeatureContext {
        std::mem::take(self)
    }
}

impl std::fmt::Debug for FeatureContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureContext")
            .field("handle", &self.handle())
            .field("params", &self.params)
            .finish()
    }
}

fn create_common(params: &CreateParams) -> FeatureCreateCommon {
    FeatureCreateCommon {
        input: params.input_resolution,
        target: params.output_resolution,
        perf_quality: to_vendor_perf_quality(params.quality),
        feature_flags: to_vendor_feature_flags(params.feature_flags),
        enable_output_subrects: params.enable_output_subrects,
    }
}

fn sr_create_desc(params: &CreateParams) -> SrCreateDesc {
    SrCreateDesc {
        common: create_common(params),
    }
}

fn rr_create_desc(params: &CreateParams) -> RrCreateDesc {
    RrCreateDesc {
        common: create_common(params),
        denoise_mode: to_vendor_denoise_mode(params.rr.denoise_mode),
        roughness_mode: to_vendor_roughness_mode(params.rr.roughness_mode),
        use_hw_depth: to_vendor_depth_type(params.rr.depth_type),
    }
}

fn push_sr_presets(runtime: &dyn VendorRuntime, block: ParamBlock, params: &CreateParams) {
    let p = &params.sr_presets;
    for (key, preset) in [
        (keys::SR_PRESET_DLAA, p.dlaa),
        (keys::SR_PRESET_QUALITY, p.quality),
        (keys::SR_PRESET_BALANCED, p.balanced),
        (keys::SR_PRESET_PERFORMANCE, p.performance),
        (keys::SR_PRESET_ULTRA_PERFORMANCE, p.ultra_performance),
        (keys::SR_PRESET_ULTRA_QUALITY, p.ultra_quality),
    ] {
        runtime.set_i32(block, key, to_vendor_sr_preset(preset));
    }
}

fn push_rr_presets(runtime: &dyn VendorRuntime, block: ParamBlock, params: &CreateParams) {
    let p = &params.rr.presets;
    for (key, preset) in [
        (keys::RR_PRESET_DLAA, p.dlaa),
        (keys::RR_PRESET_QUALITY, p.quality),
        (keys::RR_PRESET_BALANCED, p.balanced),
        (keys::RR_PRESET_PERFORMANCE, p.performance),
        (keys::RR_PRESET_ULTRA_PERFORMANCE, p.ultra_performance),
        (keys::RR_PRESET_ULTRA_QUALITY, p.ultra_quality),
    ] {
        runtime.set_i32(block, key, to_vendor_rr_preset(preset));
    }
}

/// `0.0` is the "unset" sentinel for scale factors.
#[inline]
fn or_one(value: f32) -> f32 {
    if value == 0.0 { 1.0 } else { value }
}

fn eval_common(params: &ExecuteParams) -> EvalCommon {
    let t = &params.textures;
    let c = &params.common;
    EvalCommon {
        color: t.color_input,
        output: t.color_output,
        depth: t.depth,
        motion_vectors: t.motion_vectors,
        exposure_texture: t.exposure,
        bias_current_color_mask: t.bias_color_mask,
        transparency_mask: t.transparency_mask,
        jitter_offset_x: c.jitter_offset_x,
        jitter_offset_y: c.jitter_offset_y,
        mv_scale_x: or_one(c.mv_scale_x),
        mv_scale_y: or_one(c.mv_scale_y),
        render_subrect: c.render_subrect,
        reset: c.reset,
        pre_exposure: or_one(c.pre_exposure),
        exposure_scale: or_one(c.exposure_scale),
        indicator_invert_x_axis: c.invert_x_axis,
        indicator_invert_y_axis: c.invert_y_axis,
        color_subrect_base: c.color_subrect_base,
        depth_subrect_base: c.depth_subrect_base,
        mv_subrect_base: c.mv_subrect_base,
        output_subrect_base: c.output_subrect_base,
        bias_current_color_subrect_base: c.bias_color_subrect_base,
    }
}

fn sr_eval_desc(params: &ExecuteParams) -> SrEvalDesc {
    SrEvalDesc {
        common: eval_common(params),
    }
}

fn rr_eval_desc(params: &ExecuteParams) -> RrEvalDesc {
    RrEvalDesc {
        common: eval_common(params),
        gbuffer: params.rr.gbuffer,
        rays: params.rr.rays,
        optional: params.rr.optional,
        world_to_view: params.rr.world_to_view.to_cols_array(),
        view_to_clip: params.rr.view_to_clip.to_cols_array(),
        frame_time_delta_ms: params.rr.frame_time_delta_ms,
    }
}
