//! Conversion of application enums into vendor runtime codes.
//!
//! Every function is total. Raw values that do not name a known application
//! variant fall back to the vendor's balanced/default value.

use crate::params::{
    DenoiseMode, DepthType, FeatureFlags, Quality, RoughnessMode, RrPreset, SrPreset,
};

/// Vendor performance/quality codes.
pub mod perf_quality {
    pub const MAX_PERF: i32 = 0;
    pub const BALANCED: i32 = 1;
    pub const MAX_QUALITY: i32 = 2;
    pub const ULTRA_PERFORMANCE: i32 = 3;
    pub const ULTRA_QUALITY: i32 = 4;
    pub const DLAA: i32 = 5;
}

/// Vendor super resolution render preset codes.
pub mod sr_preset {
    pub const DEFAULT: i32 = 0;
    pub const F: i32 = 6;
    pub const G: i32 = 7;
    pub const J: i32 = 10;
    pub const K: i32 = 11;
    pub const L: i32 = 12;
    pub const M: i32 = 13;
}

/// Vendor ray reconstruction render preset codes.
pub mod rr_preset {
    pub const DEFAULT: i32 = 0;
    pub const D: i32 = 4;
    pub const E: i32 = 5;
}

/// Vendor feature creation flag bits.
pub mod feature_flags {
    pub const NONE: i32 = 0;
    pub const IS_HDR: i32 = 1 << 0;
    pub const MV_LOW_RES: i32 = 1 << 1;
    pub const MV_JITTERED: i32 = 1 << 2;
    pub const DEPTH_INVERTED: i32 = 1 << 3;
    pub const AUTO_EXPOSURE: i32 = 1 << 6;
    pub const ALPHA_UPSCALING: i32 = 1 << 7;
}

/// Vendor code for a quality tier.
pub const fn to_vendor_perf_quality(quality: Quality) -> i32 {
    match quality {
        Quality::MaxPerformance => perf_quality::MAX_PERF,
        Quality::Balanced => perf_quality::BALANCED,
        Quality::MaxQuality => perf_quality::MAX_QUALITY,
        Quality::UltraPerformance => perf_quality::ULTRA_PERFORMANCE,
        Quality::UltraQuality => perf_quality::ULTRA_QUALITY,
        Quality::Dlaa => perf_quality::DLAA,
    }
}

/// Vendor code for a raw quality value; unknown values are balanced.
pub fn vendor_perf_quality_from_raw(raw: u32) -> i32 {
    Quality::from_raw(raw)
        .map(to_vendor_perf_quality)
        .unwrap_or(perf_quality::BALANCED)
}

/// Vendor code for a super resolution preset.
pub const fn to_vendor_sr_preset(preset: SrPreset) -> i32 {
    match preset {
        SrPreset::Default => sr_preset::DEFAULT,
        SrPreset::F => sr_preset::F,
        SrPreset::G => sr_preset::G,
        SrPreset::J => sr_preset::J,
        SrPreset::K => sr_preset::K,
        SrPreset::L => sr_preset::L,
        SrPreset::M => sr_preset::M,
    }
}

/// Vendor code for a raw super resolution preset; unknown values are default.
pub fn vendor_sr_preset_from_raw(raw: u32) -> i32 {
    SrPreset::from_raw(raw)
        .map(to_vendor_sr_preset)
        .unwrap_or(sr_preset::DEFAULT)
}

/// Vendor code for a ray reconstruction preset.
pub const fn to_vendor_rr_preset(preset: RrPreset) -> i32 {
    match preset {
        RrPreset::Default => rr_preset::DEFAULT,
        RrPreset::D => rr_preset::D,
        RrPreset::E => rr_preset::E,
    }
}

/// Vendor code for a raw ray reconstruction preset; unknown values are default.
pub fn vendor_rr_preset_from_raw(raw: u32) -> i32 {
    RrPreset::from_raw(raw)
        .map(to_vendor_rr_preset)
        .unwrap_or(rr_preset::DEFAULT)
}

/// Vendor bitmask for an application flag set.
///
/// Each application bit maps to one vendor bit. Undefined application bits
/// are dropped.
pub const fn to_vendor_feature_flags(flags: FeatureFlags) -> i32 {
    let mut out = feature_flags::NONE;
    if flags.contains(FeatureFlags::IS_HDR) {
        out |= feature_flags::IS_HDR;
    }
    if flags.contains(FeatureFlags::MV_LOW_RES) {
        out |= feature_flags::MV_LOW_RES;
    }
    if flags.contains(FeatureFlags::MV_JITTERED) {
        out |= feature_flags::MV_JITTERED;
    }
    if flags.contains(FeatureFlags::DEPTH_INVERTED) {
        out |= feature_flags::DEPTH_INVERTED;
    }
    if flags.contains(FeatureFlags::AUTO_EXPOSURE) {
        out |= feature_flags::AUTO_EXPOSURE;
    }
    if flags.contains(FeatureFlags::ALPHA_UPSCALING) {
        out |= feature_flags::ALPHA_UPSCALING;
    }
    out
}

pub const fn to_vendor_depth_type(depth: DepthType) -> i32 {
    match depth {
        DepthType::Linear => 0,
        DepthType::Hardware => 1,
    }
}

pub const fn to_vendor_roughness_mode(mode: RoughnessMode) -> i32 {
    match mode {
        RoughnessMode::Unpacked => 0,
        RoughnessMode::PackedInNormalsW => 1,
    }
}

pub const fn to_vendor_denoise_mode(mode: DenoiseMode) -> i32 {
    match mode {
        DenoiseMode::Off => 0,
        DenoiseMode::DlUnified => 1,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_quality_tiers_do_not_collide() {
        let codes: HashSet<i32> = Quality::ALL.into_iter().map(to_vendor_perf_quality).collect();
        assert_eq!(codes.len(), Quality::ALL.len());
        assert_ne!(
            to_vendor_perf_quality(Quality::MaxPerformance),
            to_vendor_perf_quality(Quality::UltraPerformance)
        );
    }

    #[test]
    fn test_unknown_raw_values_fall_back() {
        assert_eq!(vendor_perf_quality_from_raw(99), perf_quality::BALANCED);
        assert_eq!(vendor_perf_quality_from_raw(5), perf_quality::DLAA);
        assert_eq!(vendor_sr_preset_from_raw(8), sr_preset::DEFAULT);
        assert_eq!(vendor_sr_preset_from_raw(13), sr_preset::M);
        assert_eq!(vendor_rr_preset_from_raw(2), rr_preset::DEFAULT);
        assert_eq!(vendor_rr_preset_from_raw(5), rr_preset::E);
    }

    #[test]
    fn test_each_flag_maps_independently() {
        let expected = [
            feature_flags::IS_HDR,
            feature_flags::MV_LOW_RES,
            feature_flags::MV_JITTERED,
            feature_flags::DEPTH_INVERTED,
            feature_flags::AUTO_EXPOSURE,
            feature_flags::ALPHA_UPSCALING,
        ];
        for (flag, vendor) in FeatureFlags::ALL.into_iter().zip(expected) {
            assert_eq!(to_vendor_feature_flags(flag), vendor);
        }

        let all = FeatureFlags::ALL.into_iter().fold(FeatureFlags::NONE, |acc, f| acc | f);
        assert_eq!(to_vendor_feature_flags(all), expected.iter().fold(0, |acc, v| acc | v));
    }

    #[test]
    fn test_undefined_flag_bits_are_dropped() {
        assert_eq!(to_vendor_feature_flags(FeatureFlags(1 << 4 | 1 << 5 | 1 << 20)), 0);
        assert_eq!(to_vendor_feature_flags(FeatureFlags::NONE), feature_flags::NONE);
    }

    #[test]
    fn test_rr_enums() {
        assert_eq!(to_vendor_depth_type(DepthType::Hardware), 1);
        assert_eq!(to_vendor_roughness_mode(RoughnessMode::PackedInNormalsW), 1);
        assert_eq!(to_vendor_denoise_mode(DenoiseMode::Off), 0);
    }
}
