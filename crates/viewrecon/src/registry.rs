//! The per-view context registry.
//!
//! [`ContextRegistry`] owns the vendor runtime binding and a table of
//! [`FeatureContext`]s keyed by [`ViewId`]. It is safe to share across the
//! application thread and the host's render thread.
//!
//! # Locking
//!
//! The context table mutex serializes every operation that touches the
//! shared capability block (create, execute, queries). The runtime state is
//! only ever locked after the table, never before. Shutdown holds both for
//! the whole teardown; initialize takes only the state lock. The per-frame
//! execute snapshot has its own mutex so that updating it never waits on GPU
//! work.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::{Mutex, RwLock};
use viewrecon_core::{
    CapabilityInfo, CreateParams, Dimensions, ExecuteParams, FeatureStats, Logger, Mode,
    OptimalSettings, Quality, ReconError, Result, VendorStatus, check_status,
    mapping::to_vendor_perf_quality, recon_debug, recon_error, recon_info, recon_warn,
};

use crate::backend::{
    CommandList, DeviceHandle, GraphicsHost, ParamBlock, VendorFeature, VendorRuntime, keys,
};
use crate::config::{InitOptions, RegistryConfig};
use crate::context::{FeatureContext, FeatureEnv};
use crate::event::{FeatureEvent, RENDER_EVENT_ID};
use crate::handles::{FeatureHandleTable, FeatureSlot};

/// Identifies a logical view (camera, viewport, eye).
pub type ViewId = u32;

/// Runtime binding established by a successful initialize.
#[derive(Debug, Clone, Copy)]
struct RuntimeState {
    device: DeviceHandle,
    params: ParamBlock,
}

/// Registry of reconstruction contexts, one per view.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use viewrecon::{ContextRegistry, InitOptions, RegistryConfig};
/// use viewrecon_core::{CreateParams, Dimensions, Mode};
///
/// let registry = ContextRegistry::new(runtime, host, RegistryConfig::default());
/// registry.initialize(&InitOptions::with_app_id(1))?;
///
/// let params = CreateParams::new(
///     Mode::SuperResolution,
///     Dimensions::new(1280, 720),
///     Dimensions::new(2560, 1440),
/// );
/// registry.create_context(0, &params)?;
/// ```
pub struct ContextRegistry {
    runtime: Arc<dyn VendorRuntime>,
    host: Arc<dyn GraphicsHost>,
    config: RegistryConfig,
    logger: Arc<Logger>,

    contexts: Mutex<HashMap<ViewId, FeatureContext>>,
    state: RwLock<Option<RuntimeState>>,
    slots: FeatureHandleTable,

    initialized: AtomicBool,
    sr_available: AtomicBool,
    rr_available: AtomicBool,
    last_status: AtomicU32,

    current_view: AtomicU32,
    execute_params: Mutex<ExecuteParams>,
}

static_assertions::assert_impl_all!(ContextRegistry: Send, Sync);

impl ContextRegistry {
    /// Create an uninitialized registry with its own logger.
    pub fn new(
        runtime: Arc<dyn VendorRuntime>,
        host: Arc<dyn GraphicsHost>,
        config: RegistryConfig,
    ) -> Self {
        let logger = Arc::new(Logger::with_level(config.log_level));
        Self::with_logger(runtime, host, config, logger)
    }

    /// Create an uninitialized registry reporting through `logger`.
    pub fn with_logger(
        runtime: Arc<dyn VendorRuntime>,
        host: Arc<dyn GraphicsHost>,
        config: RegistryConfig,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            runtime,
            host,
            config,
            logger,
            contexts: Mutex::new(HashMap::new()),
            state: RwLock::new(None),
            slots: FeatureHandleTable::new(),
            initialized: AtomicBool::new(false),
            sr_available: AtomicBool::new(false),
            rr_available: AtomicBool::new(false),
            last_status: AtomicU32::new(VendorStatus::SUCCESS.raw()),
            current_view: AtomicU32::new(0),
            execute_params: Mutex::new(ExecuteParams::default()),
        }
    }

    /// The logger this registry reports through.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Bind the runtime to the host's device.
    pub fn initialize(&self, options: &InitOptions) -> Result<()> {
        self.initialize_with_device(self.host.device(), options)
    }

    /// Bind the runtime to `device`.
    ///
    /// Succeeds without doing anything when already initialized.
    pub fn initialize_with_device(
        &self,
        device: Option<DeviceHandle>,
        options: &InitOptions,
    ) -> Result<()> {
        if self.is_initialized() {
            recon_debug!(self.logger, "already initialized, skipping");
            return Ok(());
        }

        let Some(device) = device else {
            recon_error!(self.logger, "initialize failed: device is absent");
            return Err(ReconError::InvalidParameter);
        };

        let mut state = self.state.write();
        if self.is_initialized() {
            return Ok(());
        }

        let init = options.resolve(&self.config);
        recon_info!(
            self.logger,
            "initializing (app_id={}, project_id={}, engine_version={})",
            options.app_id,
            options.project_id.as_deref().unwrap_or("(none)"),
            options.engine_version.as_deref().unwrap_or("(none)")
        );

        let status = self.runtime.init(&init, device);
        self.record(status);
        if status.is_failure() {
            recon_error!(self.logger, "runtime init failed with status {}", status);
            return Err(self.vendor_error(status));
        }

        recon_debug!(self.logger, "runtime initialized, querying capabilities");
        let block = match self.runtime.capability_parameters() {
            Ok(block) => block,
            Err(status) => {
                recon_error!(self.logger, "failed to get capability parameters: {}", status);
                let _ = self.runtime.shutdown(device);
                self.record(status);
                return Err(self.vendor_error(status));
            }
        };

        let runtime = self.runtime.as_ref();
        let sr = runtime.get_i32(block, keys::SR_AVAILABLE).unwrap_or(0) != 0;
        let rr = runtime.get_i32(block, keys::RR_AVAILABLE).unwrap_or(0) != 0;
        self.sr_available.store(sr, Ordering::Release);
        self.rr_available.store(rr, Ordering::Release);

        *state = Some(RuntimeState {
            device,
            params: block,
        });
        self.initialized.store(true, Ordering::Release);

        recon_info!(
            self.logger,
            "initialized - SR: {}, RR: {}",
            availability(sr),
            availability(rr)
        );
        Ok(())
    }

    /// Tear everything down.
    ///
    /// Only the first of any number of concurrent calls does the work. The
    /// table and state locks are held throughout, so initialize and create
    /// calls racing with teardown wait for it to finish.
    pub fn shutdown(&self) {
        let mut contexts = self.contexts.lock();
        let mut state = self.state.write();
        if !self.initialized.swap(false, Ordering::AcqRel) {
            return;
        }

        recon_info!(self.logger, "shutting down");

        let destroyed = contexts.len();
        contexts.clear();
        if destroyed > 0 {
            recon_info!(self.logger, "destroyed {} context(s) during shutdown", destroyed);
        }

        for feature in self.slots.drain() {
            let _ = self.runtime.release_feature(feature);
        }

        if let Some(state) = state.take() {
            let _ = self.runtime.destroy_parameters(state.params);
            let _ = self.runtime.shutdown(state.device);
        }

        self.sr_available.store(false, Ordering::Release);
        self.rr_available.store(false, Ordering::Release);

        recon_info!(self.logger, "shutdown complete");
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Feature availability and driver requirements.
    pub fn capabilities(&self) -> Result<CapabilityInfo> {
        if !self.is_initialized() {
            return Err(ReconError::NotInitialized);
        }

        let _contexts = self.contexts.lock();
        let block = self.params_block().ok_or(ReconError::NotInitialized)?;
        let runtime = self.runtime.as_ref();

        Ok(CapabilityInfo {
            sr_available: self.sr_available.load(Ordering::Acquire),
            rr_available: self.rr_available.load(Ordering::Acquire),
            needs_driver_update: runtime
                .get_i32(block, keys::NEEDS_UPDATED_DRIVER)
                .unwrap_or(0)
                != 0,
            min_driver_version_major: runtime
                .get_u32(block, keys::MIN_DRIVER_VERSION_MAJOR)
                .unwrap_or(0),
            min_driver_version_minor: runtime
                .get_u32(block, keys::MIN_DRIVER_VERSION_MINOR)
                .unwrap_or(0),
        })
    }

    /// Recommended render resolutions for `output` at `quality`.
    pub fn optimal_settings(
        &self,
        mode: Mode,
        quality: Quality,
        output: Dimensions,
    ) -> Result<OptimalSettings> {
        if !self.is_initialized() {
            return Err(ReconError::NotInitialized);
        }

        let _contexts = self.contexts.lock();
        let block = self.params_block().ok_or(ReconError::NotInitialized)?;
        let perf_quality = to_vendor_perf_quality(quality);

        let settings = match mode {
            Mode::RayReconstruction => {
                self.runtime.optimal_settings_rr(block, output, perf_quality)
            }
            _ => self.runtime.optimal_settings_sr(block, output, perf_quality),
        };
        self.vendor_result(settings)
    }

    /// Runtime memory statistics for `mode`.
    pub fn stats(&self, mode: Mode) -> Result<FeatureStats> {
        if !self.is_initialized() {
            return Err(ReconError::NotInitialized);
        }

        let _contexts = self.contexts.lock();
        let block = self.params_block().ok_or(ReconError::NotInitialized)?;

        let stats = match mode {
            Mode::RayReconstruction => self.runtime.stats_rr(block),
            _ => self.runtime.stats_sr(block),
        };
        self.vendor_result(stats)
    }

    /// The raw status of the most recent vendor call.
    pub fn last_vendor_status(&self) -> VendorStatus {
        VendorStatus(self.last_status.load(Ordering::Acquire))
    }

    // -------------------------------------------------------------------------
    // Context management
    // -------------------------------------------------------------------------

    /// Create the context for `view`.
    ///
    /// The table is only modified on success.
    pub fn create_context(&self, view: ViewId, params: &CreateParams) -> Result<()> {
        if !self.is_initialized() {
            recon_error!(self.logger, "create context failed: not initialized");
            return Err(ReconError::NotInitialized);
        }

        if params.mode == Mode::Off {
            recon_error!(self.logger, "create context failed: mode is off for view {}", view);
            return Err(ReconError::InvalidParameter);
        }

        let mut contexts = self.contexts.lock();
        // Shutdown clears the flag under the table lock.
        if !self.is_initialized() {
            recon_error!(self.logger, "create context failed: not initialized");
            return Err(ReconError::NotInitialized);
        }
        if contexts.contains_key(&view) {
            recon_warn!(
                self.logger,
                "create context failed: context already exists for view {}",
                view
            );
            return Err(ReconError::ContextAlreadyExists);
        }

        recon_info!(
            self.logger,
            "creating context (view={}, mode={}, quality={}, input={}x{}, output={}x{})",
            view,
            params.mode.label(),
            params.quality.label(),
            params.input_resolution.width,
            params.input_resolution.height,
            params.output_resolution.width,
            params.output_resolution.height
        );

        let scope = self.host.begin_recording().map_err(|err| {
            recon_error!(self.logger, "failed to open a command recording scope: {}", err);
            ReconError::PlatformError
        })?;

        let mut context = FeatureContext::new();
        let created = context.create(&self.env(), scope.command_list, params);
        self.host.end_recording(scope);

        if let Err(err) = created {
            recon_error!(
                self.logger,
                "failed to create context for view {}: {}",
                view,
                err.code().as_str()
            );
            return Err(err);
        }

        contexts.insert(view, context);
        recon_info!(self.logger, "context created for view {}", view);
        Ok(())
    }

    /// Destroy the context for `view`. Missing views are not an error.
    pub fn destroy_context(&self, view: ViewId) -> Result<()> {
        let removed = self.contexts.lock().remove(&view);
        match removed {
            Some(_) => recon_info!(self.logger, "destroyed context for view {}", view),
            None => recon_debug!(
                self.logger,
                "destroy context: no context for view {} (already destroyed)",
                view
            ),
        }
        Ok(())
    }

    /// Destroy every context.
    pub fn destroy_all_contexts(&self) {
        self.clear_contexts();
    }

    /// Recreate the context for `view` if `params` demand it.
    ///
    /// Between removing the old context and creating the new one the table
    /// lock is released; other threads can observe the view as absent. If
    /// the recreate fails the view stays absent.
    pub fn update_context(&self, view: ViewId, params: &CreateParams) -> Result<()> {
        {
            let mut contexts = self.contexts.lock();
            let Some(context) = contexts.get(&view) else {
                recon_error!(self.logger, "update context failed: no context for view {}", view);
                return Err(ReconError::ContextNotFound);
            };

            if !context.needs_recreation(params) {
                recon_debug!(self.logger, "update context: no recreation needed for view {}", view);
                return Ok(());
            }

            recon_info!(
                self.logger,
                "update context: recreating context for view {} due to parameter changes",
                view
            );
            contexts.remove(&view);
        }

        self.create_context(view, params)
    }

    pub fn has_context(&self, view: ViewId) -> bool {
        self.contexts.lock().contains_key(&view)
    }

    pub fn context_count(&self) -> usize {
        self.contexts.lock().len()
    }

    /// The parameters the context for `view` was created with.
    pub fn context_params(&self, view: ViewId) -> Option<CreateParams> {
        self.contexts.lock().get(&view).map(|ctx| *ctx.params())
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Record an evaluation of `view`'s context into `cmd`.
    pub fn execute(
        &self,
        view: ViewId,
        cmd: Option<CommandList>,
        params: &ExecuteParams,
    ) -> Result<()> {
        if !self.is_initialized() {
            recon_error!(self.logger, "execute failed: not initialized");
            return Err(ReconError::NotInitialized);
        }

        let Some(cmd) = cmd else {
            recon_error!(self.logger, "execute failed: command list is absent");
            return Err(ReconError::InvalidParameter);
        };

        let contexts = self.contexts.lock();
        let Some(context) = contexts.get(&view) else {
            recon_error!(self.logger, "execute failed: no context for view {}", view);
            return Err(ReconError::ContextNotFound);
        };

        recon_debug!(
            self.logger,
            "executing view {} (mode={}, reset={})",
            view,
            params.mode.label(),
            params.common.reset
        );

        context.execute(&self.env(), cmd, params).inspect_err(|err| {
            recon_error!(
                self.logger,
                "execute failed for view {}: {}",
                view,
                err.code().as_str()
            );
        })
    }

    /// Record an evaluation into the host's current command list.
    pub fn execute_current(&self, view: ViewId, params: &ExecuteParams) -> Result<()> {
        if !self.is_initialized() {
            return Err(ReconError::NotInitialized);
        }

        let Some(cmd) = self.host.current_command_list() else {
            recon_error!(self.logger, "execute failed: host has no command list recording");
            return Err(ReconError::PlatformError);
        };
        self.execute(view, Some(cmd), params)
    }

    /// Select the view evaluated by [`on_render_event`](Self::on_render_event).
    pub fn set_current_view(&self, view: ViewId) {
        self.current_view.store(view, Ordering::Release);
    }

    pub fn current_view(&self) -> ViewId {
        self.current_view.load(Ordering::Acquire)
    }

    /// Replace the parameters used by [`on_render_event`](Self::on_render_event).
    pub fn set_execute_params(&self, params: &ExecuteParams) {
        *self.execute_params.lock() = *params;
    }

    pub fn execute_params(&self) -> ExecuteParams {
        *self.execute_params.lock()
    }

    /// Render-thread callback.
    ///
    /// Evaluates the current view with the stored parameters. Other event
    /// IDs are ignored, as is everything while uninitialized or when the host
    /// is not recording.
    pub fn on_render_event(&self, event_id: i32) {
        if event_id != RENDER_EVENT_ID || !self.is_initialized() {
            return;
        }

        let Some(cmd) = self.host.current_command_list() else {
            return;
        };

        let view = self.current_view();
        let params = self.execute_params();
        // Failures are already logged.
        let _ = self.execute(view, Some(cmd), &params);
    }

    // -------------------------------------------------------------------------
    // Low-level feature slots
    // -------------------------------------------------------------------------

    /// Reserve a slot for a feature created through
    /// [`on_feature_event`](Self::on_feature_event).
    pub fn allocate_feature_slot(&self) -> Result<FeatureSlot> {
        self.slots.allocate().inspect_err(|_| {
            recon_error!(self.logger, "allocate feature slot: next slot is still in use");
        })
    }

    /// Free a slot, releasing any feature still bound to it.
    pub fn free_feature_slot(&self, slot: FeatureSlot) -> Result<()> {
        match self.slots.free(slot) {
            Ok(feature) => {
                if let Some(feature) = feature {
                    let _ = self.runtime.release_feature(feature);
                }
                Ok(())
            }
            Err(err) => {
                recon_error!(self.logger, "free feature slot: slot {} does not exist", slot.0);
                Err(err)
            }
        }
    }

    /// The feature bound to `slot`.
    pub fn feature_at(&self, slot: FeatureSlot) -> Option<VendorFeature> {
        self.slots.lookup(slot)
    }

    /// Render-thread callback for the low-level create, evaluate and destroy
    /// events.
    pub fn on_feature_event(&self, event: &FeatureEvent) -> Result<()> {
        if !self.is_initialized() {
            recon_error!(self.logger, "feature event {:?}: not initialized", event.id());
            return Err(ReconError::NotInitialized);
        }

        let Some(cmd) = self.host.current_command_list() else {
            recon_error!(self.logger, "feature event {:?}: failed to get command list", event.id());
            return Err(ReconError::PlatformError);
        };

        match *event {
            FeatureEvent::Create { slot, kind, params } => {
                if !self.slots.contains(slot) {
                    recon_error!(self.logger, "create feature: slot {} not reserved", slot.0);
                    return Err(ReconError::ContextNotFound);
                }

                let feature = match self.runtime.create_feature(cmd, kind, params) {
                    Ok(feature) => feature,
                    Err(status) => {
                        self.record(status);
                        return Err(self.vendor_error(status));
                    }
                };
                self.record(VendorStatus::SUCCESS);

                match self.slots.bind(slot, feature) {
                    Ok(previous) => {
                        if let Some(previous) = previous {
                            let _ = self.runtime.release_feature(previous);
                        }
                        recon_info!(self.logger, "created {:?} feature, slot={}", kind, slot.0);
                        Ok(())
                    }
                    Err(err) => {
                        // Freed concurrently; nothing owns the new feature.
                        let _ = self.runtime.release_feature(feature);
                        Err(err)
                    }
                }
            }
            FeatureEvent::Evaluate { slot, params } => {
                let Some(feature) = self.slots.lookup(slot) else {
                    recon_error!(self.logger, "evaluate feature: slot {} not found", slot.0);
                    return Err(ReconError::ContextNotFound);
                };

                let status = self.runtime.evaluate_feature(cmd, feature, params);
                self.record(status);
                check_status(&self.logger, status)
            }
            FeatureEvent::Destroy { slot } => {
                let Ok(feature) = self.slots.free(slot) else {
                    recon_error!(self.logger, "destroy feature: slot {} not found", slot.0);
                    return Err(ReconError::ContextNotFound);
                };

                if let Some(feature) = feature {
                    let status = self.runtime.release_feature(feature);
                    self.record(status);
                    check_status(&self.logger, status)?;
                    recon_info!(self.logger, "destroyed feature, slot={}", slot.0);
                }
                Ok(())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn env(&self) -> FeatureEnv<'_> {
        FeatureEnv {
            runtime: &self.runtime,
            params: self.params_block(),
            last_status: &self.last_status,
            logger: &self.logger,
        }
    }

    fn params_block(&self) -> Option<ParamBlock> {
        self.state.read().as_ref().map(|state| state.params)
    }

    fn clear_contexts(&self) -> usize {
        let drained: Vec<_> = {
            let mut contexts = self.contexts.lock();
            contexts.drain().collect()
        };
        drained.len()
    }

    fn record(&self, status: VendorStatus) {
        self.last_status.store(status.raw(), Ordering::Release);
    }

    /// Translate a status reported alongside a failed vendor call.
    fn vendor_error(&self, status: VendorStatus) -> ReconError {
        match check_status(&self.logger, status) {
            Err(err) => err,
            Ok(()) => ReconError::RuntimeError,
        }
    }

    fn vendor_result<T>(&self, result: std::result::Result<T, VendorStatus>) -> Result<T> {
        match result {
            Ok(value) => {
                self.record(VendorStatus::SUCCESS);
                Ok(value)
            }
            Err(status) => {
                self.record(status);
                Err(self.vendor_error(status))
            }
        }
    }
}

impl Drop for ContextRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("initialized", &self.is_initialized())
            .field("contexts", &self.context_count())
            .field("feature_slots", &self.slots.len())
            .field("last_status", &self.last_vendor_status())
            .finish_non_exhaustive()
    }
}

fn availability(available: bool) -> &'static str {
    if available { "available" } else { "unavailable" }
}
