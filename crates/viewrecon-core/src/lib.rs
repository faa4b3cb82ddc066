//! Core types for viewrecon.
//!
//! This crate holds the stateless pieces of the reconstruction context
//! manager:
//!
//! - **Result codes**: the closed application-facing [`ResultCode`] and the
//!   matching [`ReconError`]
//! - **Vendor status**: raw [`VendorStatus`] codes and their classification
//!   via [`translate`]
//! - **Parameter mapping**: application enums to vendor codes
//! - **Parameters**: creation and per-frame execution descriptions
//! - **Logging**: a level-filtered [`Logger`] over `tracing` with an optional
//!   sink override
//!
//! # Example
//!
//! ```
//! use viewrecon_core::{classify, ResultCode, VendorStatus};
//!
//! let t = classify(VendorStatus::OUT_OF_GPU_MEMORY);
//! assert_eq!(t.result, ResultCode::OutOfMemory);
//! assert_eq!(t.result.as_str(), "Out of memory");
//! ```

mod error;
pub mod logging;
pub mod mapping;
pub mod params;
mod status;
mod translate;

pub use error::{ReconError, Result, ResultCode};
pub use logging::{LogLevel, LogSink, Logger, LoggingConfig, MemorySink, init_logging};
pub use params::{
    CapabilityInfo, CommonParams, CommonTextures, Coordinates, CreateParams, DenoiseMode,
    DepthType, Dimensions, ExecuteParams, FeatureFlags, FeatureStats, GBufferTextures, Mode,
    OptimalSettings, Quality, RayTextures, RoughnessMode, RrConfig, RrOptionalTextures, RrParams,
    RrPreset, RrPresets, SrPreset, SrPresets, TextureRef,
};
pub use status::VendorStatus;
pub use translate::{Translation, check_status, classify, translate, translate_with};
