//! Per-view lifecycle management for GPU reconstruction features.
//!
//! This crate multiplexes vendor reconstruction features (super resolution
//! and ray reconstruction) across logical views. The vendor runtime and the
//! rendering host are reached through the [`VendorRuntime`] and
//! [`GraphicsHost`] traits; everything else lives here.
//!
//! # Getting Started
//!
//! Build a [`ContextRegistry`] around the two collaborators, initialize it,
//! then create one context per view:
//!
//! ```ignore
//! use std::sync::Arc;
//! use viewrecon::{ContextRegistry, InitOptions, RegistryConfig};
//! use viewrecon_core::{CreateParams, Dimensions, ExecuteParams, Mode, Quality};
//!
//! let registry = Arc::new(ContextRegistry::new(runtime, host, RegistryConfig::default()));
//! registry.initialize(&InitOptions::with_app_id(1).project_id("my-project"))?;
//!
//! let params = CreateParams::new(
//!     Mode::SuperResolution,
//!     Dimensions::new(1280, 720),
//!     Dimensions::new(2560, 1440),
//! )
//! .with_quality(Quality::MaxQuality);
//! registry.create_context(0, &params)?;
//! ```
//!
//! # Per-Frame Evaluation
//!
//! Evaluation can be recorded directly into a command list with
//! [`ContextRegistry::execute`], or deferred to the host's render thread:
//!
//! ```ignore
//! registry.set_current_view(0);
//! registry.set_execute_params(&frame_params);
//! // Later, on the render thread:
//! registry.on_render_event(viewrecon::RENDER_EVENT_ID);
//! ```
//!
//! # Resizing
//!
//! [`ContextRegistry::update_context`] recreates a view's feature only when
//! the new parameters are incompatible with the live one. Growing the render
//! resolution reuses the existing feature; shrinking it does not.

pub mod backend;
mod config;
mod context;
mod event;
mod handles;
mod registry;

pub use backend::{
    CommandList, DeviceHandle, FeatureKind, GraphicsHost, InitIdentity, ParamBlock, ParamKind,
    ParamValue, RecordingScope, RuntimeInit, VendorFeature, VendorRuntime,
};
pub use config::{InitOptions, RegistryConfig};
pub use context::{FeatureContext, FeatureEnv};
pub use event::{FeatureEvent, FeatureEventId, RENDER_EVENT_ID};
pub use handles::{FeatureHandleTable, FeatureSlot, HANDLE_CAPACITY};
pub use registry::{ContextRegistry, ViewId};

pub use viewrecon_core::{ReconError, Result, ResultCode};
