//! Vendor status classification.
//!
//! [`translate`] maps every [`VendorStatus`] onto exactly one [`ResultCode`].
//! The mapping is a fixed table; codes outside the table become
//! [`ResultCode::RuntimeError`]. Each failure translation is logged at error
//! level together with a remediation hint.

use crate::error::{ReconError, ResultCode};
use crate::logging::{LogLevel, Logger};
use crate::status::VendorStatus;

/// The outcome of classifying a vendor status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    /// The application-facing result.
    pub result: ResultCode,
    /// Short description of the vendor failure. Empty for success.
    pub description: &'static str,
    /// Suggested remediation, when one is known.
    pub suggestion: Option<&'static str>,
}

impl Translation {
    const SUCCESS: Self = Self {
        result: ResultCode::Success,
        description: "",
        suggestion: None,
    };

    /// Convert into a `Result`, mapping success to `Ok(())`.
    pub fn into_result(self) -> crate::Result<()> {
        self.result.into_result()
    }
}

/// One row of the classification table.
struct Entry {
    status: VendorStatus,
    result: ResultCode,
    description: &'static str,
    suggestion: &'static str,
}

const TABLE: &[Entry] = &[
    Entry {
        status: VendorStatus::FEATURE_NOT_SUPPORTED,
        result: ResultCode::FeatureNotSupported,
        description: "Feature not supported",
        suggestion: "Check GPU compatibility and driver version",
    },
    Entry {
        status: VendorStatus::PLATFORM_ERROR,
        result: ResultCode::PlatformError,
        description: "Platform error",
        suggestion: "Ensure the graphics device is valid and properly initialized",
    },
    Entry {
        status: VendorStatus::FEATURE_ALREADY_EXISTS,
        result: ResultCode::ContextAlreadyExists,
        description: "Feature already exists",
        suggestion: "Destroy the existing context before creating a new one for the same view",
    },
    Entry {
        status: VendorStatus::FEATURE_NOT_FOUND,
        result: ResultCode::ContextNotFound,
        description: "Feature not found",
        suggestion: "Ensure the context was created before executing",
    },
    Entry {
        status: VendorStatus::INVALID_PARAMETER,
        result: ResultCode::InvalidParameter,
        description: "Invalid parameter",
        suggestion: "Check input textures, resolutions, and parameter values",
    },
    Entry {
        status: VendorStatus::SCRATCH_BUFFER_TOO_SMALL,
        result: ResultCode::InvalidParameter,
        description: "Scratch buffer too small",
        suggestion: "Internal buffer allocation issue, try recreating the context",
    },
    Entry {
        status: VendorStatus::NOT_INITIALIZED,
        result: ResultCode::NotInitialized,
        description: "Vendor runtime not initialized",
        suggestion: "Initialize the registry before using reconstruction features",
    },
    Entry {
        status: VendorStatus::UNSUPPORTED_INPUT_FORMAT,
        result: ResultCode::InvalidParameter,
        description: "Unsupported input format",
        suggestion: "Check texture formats, color input usually needs RGBA16F",
    },
    Entry {
        status: VendorStatus::RW_FLAG_MISSING,
        result: ResultCode::InvalidParameter,
        description: "Read/write flag missing on resource",
        suggestion: "Ensure the output texture allows unordered access",
    },
    Entry {
        status: VendorStatus::MISSING_INPUT,
        result: ResultCode::InvalidParameter,
        description: "Required input missing",
        suggestion: "Provide color, depth, motion vector and output textures",
    },
    Entry {
        status: VendorStatus::UNABLE_TO_INITIALIZE_FEATURE,
        result: ResultCode::RuntimeError,
        description: "Unable to initialize feature",
        suggestion: "Runtime model files may be missing or corrupted, reinstall the runtime libraries",
    },
    Entry {
        status: VendorStatus::OUT_OF_DATE,
        result: ResultCode::DriverOutOfDate,
        description: "Driver or runtime out of date",
        suggestion: "Update the GPU driver to the latest version",
    },
    Entry {
        status: VendorStatus::OUT_OF_GPU_MEMORY,
        result: ResultCode::OutOfMemory,
        description: "Out of GPU memory",
        suggestion: "Reduce resolution or quality, or free GPU memory",
    },
    Entry {
        status: VendorStatus::UNSUPPORTED_FORMAT,
        result: ResultCode::InvalidParameter,
        description: "Unsupported texture format",
        suggestion: "Use RGBA16F/RGBA32F for color and R32F/D32F for depth",
    },
    Entry {
        status: VendorStatus::UNABLE_TO_WRITE_TO_APP_DATA_PATH,
        result: ResultCode::PlatformError,
        description: "Unable to write to app data path",
        suggestion: "Check write permissions for the runtime log directory",
    },
    Entry {
        status: VendorStatus::UNSUPPORTED_PARAMETER,
        result: ResultCode::InvalidParameter,
        description: "Unsupported parameter value",
        suggestion: "Check quality, feature flags, and mode settings",
    },
    Entry {
        status: VendorStatus::DENIED,
        result: ResultCode::FeatureNotSupported,
        description: "Feature access denied",
        suggestion: "The feature may be disabled by driver settings or the application profile",
    },
    Entry {
        status: VendorStatus::NOT_IMPLEMENTED,
        result: ResultCode::FeatureNotSupported,
        description: "Feature not implemented",
        suggestion: "The feature may not be available in the current runtime or driver",
    },
];

const UNKNOWN: Entry = Entry {
    status: VendorStatus::FAIL,
    result: ResultCode::RuntimeError,
    description: "Unknown vendor error",
    suggestion: "Check the vendor status code for details",
};

/// Classify `status` without logging.
pub fn classify(status: VendorStatus) -> Translation {
    if status == VendorStatus::SUCCESS {
        return Translation::SUCCESS;
    }

    let entry = TABLE
        .iter()
        .find(|entry| entry.status == status)
        .unwrap_or(&UNKNOWN);

    Translation {
        result: entry.result,
        description: entry.description,
        suggestion: Some(entry.suggestion),
    }
}

/// Classify `status`, logging failures through `logger`.
pub fn translate_with(logger: &Logger, status: VendorStatus) -> Translation {
    if status == VendorStatus::SUCCESS {
        return Translation::SUCCESS;
    }

    let translation = classify(status);
    logger.log(
        LogLevel::Error,
        format_args!("vendor error {}: {}", status, translation.description),
    );
    if let Some(suggestion) = translation.suggestion {
        logger.log(LogLevel::Error, format_args!("  suggestion: {suggestion}"));
    }
    translation
}

/// Classify `status`, logging failures through the process-wide logger.
pub fn translate(status: VendorStatus) -> Translation {
    translate_with(Logger::global(), status)
}

/// Turn a vendor status into a `Result`.
///
/// Statuses without the failure prefix are `Ok`; failures are translated and
/// logged through `logger`.
pub fn check_status(logger: &Logger, status: VendorStatus) -> Result<(), ReconError> {
    if status.is_success() {
        return Ok(());
    }
    translate_with(logger, status).into_result()
}
