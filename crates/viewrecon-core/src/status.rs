//! Raw status codes returned by the vendor reconstruction runtime.

use std::fmt;

/// A raw vendor runtime status code.
///
/// Success is `0x1`. Every failure shares the `0xBAD0_0000` prefix in its
/// upper twelve bits; the low bits select the failure reason.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VendorStatus(pub u32);

const FAIL_MASK: u32 = 0xFFF0_0000;
const FAIL_PREFIX: u32 = 0xBAD0_0000;

impl VendorStatus {
    pub const SUCCESS: Self = Self(0x1);
    pub const FAIL: Self = Self(FAIL_PREFIX);

    pub const FEATURE_NOT_SUPPORTED: Self = Self(FAIL_PREFIX | 1);
    pub const PLATFORM_ERROR: Self = Self(FAIL_PREFIX | 2);
    pub const FEATURE_ALREADY_EXISTS: Self = Self(FAIL_PREFIX | 3);
    pub const FEATURE_NOT_FOUND: Self = Self(FAIL_PREFIX | 4);
    pub const INVALID_PARAMETER: Self = Self(FAIL_PREFIX | 5);
    pub const SCRATCH_BUFFER_TOO_SMALL: Self = Self(FAIL_PREFIX | 6);
    pub const NOT_INITIALIZED: Self = Self(FAIL_PREFIX | 7);
    pub const UNSUPPORTED_INPUT_FORMAT: Self = Self(FAIL_PREFIX | 8);
    pub const RW_FLAG_MISSING: Self = Self(FAIL_PREFIX | 9);
    pub const MISSING_INPUT: Self = Self(FAIL_PREFIX | 10);
    pub const UNABLE_TO_INITIALIZE_FEATURE: Self = Self(FAIL_PREFIX | 11);
    pub const OUT_OF_DATE: Self = Self(FAIL_PREFIX | 12);
    pub const OUT_OF_GPU_MEMORY: Self = Self(FAIL_PREFIX | 13);
    pub const UNSUPPORTED_FORMAT: Self = Self(FAIL_PREFIX | 14);
    pub const UNABLE_TO_WRITE_TO_APP_DATA_PATH: Self = Self(FAIL_PREFIX | 15);
    pub const UNSUPPORTED_PARAMETER: Self = Self(FAIL_PREFIX | 16);
    pub const DENIED: Self = Self(FAIL_PREFIX | 17);
    pub const NOT_IMPLEMENTED: Self = Self(FAIL_PREFIX | 18);

    /// Every named failure code.
    pub const KNOWN_FAILURES: [Self; 18] = [
        Self::FEATURE_NOT_SUPPORTED,
        Self::PLATFORM_ERROR,
        Self::FEATURE_ALREADY_EXISTS,
        Self::FEATURE_NOT_FOUND,
        Self::INVALID_PARAMETER,
        Self::SCRATCH_BUFFER_TOO_SMALL,
        Self::NOT_INITIALIZED,
        Self::UNSUPPORTED_INPUT_FORMAT,
        Self::RW_FLAG_MISSING,
        Self::MISSING_INPUT,
        Self::UNABLE_TO_INITIALIZE_FEATURE,
        Self::OUT_OF_DATE,
        Self::OUT_OF_GPU_MEMORY,
        Self::UNSUPPORTED_FORMAT,
        Self::UNABLE_TO_WRITE_TO_APP_DATA_PATH,
        Self::UNSUPPORTED_PARAMETER,
        Self::DENIED,
        Self::NOT_IMPLEMENTED,
    ];

    /// The raw code.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` when the code carries the failure prefix.
    #[inline]
    pub const fn is_failure(self) -> bool {
        (self.0 & FAIL_MASK) == FAIL_PREFIX
    }

    /// Returns `true` when the code is not a failure.
    #[inline]
    pub const fn is_success(self) -> bool {
        !self.is_failure()
    }
}

impl Default for VendorStatus {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl fmt::Debug for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VendorStatus({:#010X})", self.0)
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl From<u32> for VendorStatus {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
