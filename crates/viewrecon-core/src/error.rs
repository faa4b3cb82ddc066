//! Result codes and error types shared by every viewrecon entry point.
//!
//! [`ResultCode`] is the closed, application-facing enumeration with stable
//! numeric values. [`ReconError`] carries the same taxonomy minus `Success` and
//! is what internal plumbing propagates with `?`.

use std::fmt;

use thiserror::Error;

/// Application-facing result of a viewrecon operation.
///
/// The numeric values are stable and cross the host boundary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// The operation completed.
    Success = 0,
    /// The registry (or the vendor runtime behind it) is not initialized.
    NotInitialized = -1,
    /// The hardware, driver or runtime does not support the requested feature.
    FeatureNotSupported = -2,
    /// A parameter, texture format or resource flag was rejected.
    InvalidParameter = -3,
    /// The vendor runtime ran out of GPU memory.
    OutOfMemory = -4,
    /// No context exists for the requested view.
    ContextNotFound = -5,
    /// A context already exists for the requested view.
    ContextAlreadyExists = -6,
    /// The installed driver is older than the runtime requires.
    DriverOutOfDate = -7,
    /// The graphics host or platform layer failed.
    PlatformError = -8,
    /// Any vendor runtime failure without a more specific mapping.
    RuntimeError = -9,
}

impl ResultCode {
    /// Every defined result code, in numeric order from `Success` downwards.
    pub const ALL: [ResultCode; 10] = [
        ResultCode::Success,
        ResultCode::NotInitialized,
        ResultCode::FeatureNotSupported,
        ResultCode::InvalidParameter,
        ResultCode::OutOfMemory,
        ResultCode::ContextNotFound,
        ResultCode::ContextAlreadyExists,
        ResultCode::DriverOutOfDate,
        ResultCode::PlatformError,
        ResultCode::RuntimeError,
    ];

    /// Static human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::NotInitialized => "Not initialized",
            Self::FeatureNotSupported => "Feature not supported",
            Self::InvalidParameter => "Invalid parameter",
            Self::OutOfMemory => "Out of memory",
            Self::ContextNotFound => "Context not found",
            Self::ContextAlreadyExists => "Context already exists",
            Self::DriverOutOfDate => "Driver out of date",
            Self::PlatformError => "Platform error",
            Self::RuntimeError => "Runtime error",
        }
    }

    /// The raw numeric code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Parse a raw numeric code. Unknown values yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Returns `true` for [`ResultCode::Success`].
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Convert into a `Result`, mapping `Success` to `Ok(())`.
    pub fn into_result(self) -> Result<()> {
        match ReconError::from_code(self) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> From<&Result<T>> for ResultCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(err) => err.code(),
        }
    }
}

impl From<ReconError> for ResultCode {
    fn from(err: ReconError) -> Self {
        err.code()
    }
}

/// Errors returned by viewrecon operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconError {
    /// The registry has not been initialized.
    #[error("not initialized")]
    NotInitialized,

    /// The requested feature is not supported.
    #[error("feature not supported")]
    FeatureNotSupported,

    /// A parameter was rejected.
    #[error("invalid parameter")]
    InvalidParameter,

    /// GPU memory was exhausted.
    #[error("out of memory")]
    OutOfMemory,

    /// No context exists for the view.
    #[error("context not found")]
    ContextNotFound,

    /// A context already exists for the view.
    #[error("context already exists")]
    ContextAlreadyExists,

    /// The driver is too old.
    #[error("driver out of date")]
    DriverOutOfDate,

    /// The platform layer failed.
    #[error("platform error")]
    PlatformError,

    /// Unclassified vendor runtime failure.
    #[error("runtime error")]
    RuntimeError,
}

impl ReconError {
    /// The matching application result code.
    pub const fn code(self) -> ResultCode {
        match self {
            Self::NotInitialized => ResultCode::NotInitialized,
            Self::FeatureNotSupported => ResultCode::FeatureNotSupported,
            Self::InvalidParameter => ResultCode::InvalidParameter,
            Self::OutOfMemory => ResultCode::OutOfMemory,
            Self::ContextNotFound => ResultCode::ContextNotFound,
            Self::ContextAlreadyExists => ResultCode::ContextAlreadyExists,
            Self::DriverOutOfDate => ResultCode::DriverOutOfDate,
            Self::PlatformError => ResultCode::PlatformError,
            Self::RuntimeError => ResultCode::RuntimeError,
        }
    }

    /// The error carried by a non-success result code.
    pub const fn from_code(code: ResultCode) -> Option<Self> {
        match code {
            ResultCode::Success => None,
            ResultCode::NotInitialized => Some(Self::NotInitialized),
            ResultCode::FeatureNotSupported => Some(Self::FeatureNotSupported),
            ResultCode::InvalidParameter => Some(Self::InvalidParameter),
            ResultCode::OutOfMemory => Some(Self::OutOfMemory),
            ResultCode::ContextNotFound => Some(Self::ContextNotFound),
            ResultCode::ContextAlreadyExists => Some(Self::ContextAlreadyExists),
            ResultCode::DriverOutOfDate => Some(Self::DriverOutOfDate),
            ResultCode::PlatformError => Some(Self::PlatformError),
            ResultCode::RuntimeError => Some(Self::RuntimeError),
        }
    }
}

/// Result type for viewrecon operations.
pub type Result<T, E = ReconError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ResultCode::Success.code(), 0);
        assert_eq!(ResultCode::NotInitialized.code(), -1);
        assert_eq!(ResultCode::ContextAlreadyExists.code(), -6);
        assert_eq!(ResultCode::RuntimeError.code(), -9);
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert_eq!(ResultCode::from_code(-5), Some(ResultCode::ContextNotFound));
        assert_eq!(ResultCode::from_code(1), None);
        assert_eq!(ResultCode::from_code(-10), None);
    }

    #[test]
    fn test_error_code_round_trip() {
        for code in ResultCode::ALL {
            match ReconError::from_code(code) {
                None => assert!(code.is_success()),
                Some(err) => assert_eq!(err.code(), code),
            }
        }
    }

    #[test]
    fn test_result_conversion() {
        let ok: Result<u32> = Ok(3);
        let err: Result<u32> = Err(ReconError::PlatformError);
        assert_eq!(ResultCode::from(&ok), ResultCode::Success);
        assert_eq!(ResultCode::from(&err), ResultCode::PlatformError);
        assert_eq!(ResultCode::InvalidParameter.into_result(), Err(ReconError::InvalidParameter));
        assert_eq!(ResultCode::Success.into_result(), Ok(()));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(ResultCode::Success.to_string(), "Success");
        assert_eq!(ResultCode::DriverOutOfDate.as_str(), "Driver out of date");
    }
}
