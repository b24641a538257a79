//! Duct profile and thermal zones
//!
//! The core duct narrows through the compressor, holds its minimum through the
//! combustor and opens up again through the turbine. Units are scene units,
//! not physical ones.

use crate::consts::*;

/// Axial section of the core duct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxialZone {
    /// x > 2.5: wide intake
    Fan,
    /// 0.5 < x <= 2.5: linear contraction
    Compressor,
    /// -0.5 < x <= 0.5: narrowest section
    Combustor,
    /// -3.0 < x <= -0.5: linear expansion
    Turbine,
    /// x <= -3.0
    Exhaust,
}

impl AxialZone {
    pub const ALL: [AxialZone; 5] = [
        AxialZone::Fan,
        AxialZone::Compressor,
        AxialZone::Combustor,
        AxialZone::Turbine,
        AxialZone::Exhaust,
    ];

    /// Zone containing axial station `x`. NaN falls through to Exhaust.
    #[inline]
    pub fn at(x: f32) -> Self {
        if x > FAN_START_X {
            AxialZone::Fan
        } else if x > COMPRESSOR_START_X {
            AxialZone::Compressor
        } else if x > COMBUSTOR_START_X {
            AxialZone::Combustor
        } else if x > TURBINE_START_X {
            AxialZone::Turbine
        } else {
            AxialZone::Exhaust
        }
    }

    /// Duct radius of this zone at station `x`
    #[inline]
    pub fn radius(self, x: f32) -> f32 {
        match self {
            AxialZone::Fan => FAN_RADIUS,
            AxialZone::Compressor => COMPRESSOR_EXIT_RADIUS - (FAN_START_X - x) * COMPRESSOR_SLOPE,
            AxialZone::Combustor => COMBUSTOR_RADIUS,
            AxialZone::Turbine => COMBUSTOR_RADIUS + (x - COMBUSTOR_START_X).abs() * TURBINE_SLOPE,
            AxialZone::Exhaust => EXHAUST_RADIUS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AxialZone::Fan => "fan",
            AxialZone::Compressor => "compressor",
            AxialZone::Combustor => "combustor",
            AxialZone::Turbine => "turbine",
            AxialZone::Exhaust => "exhaust",
        }
    }
}

/// Desired distance from the centerline at axial station `x`
#[inline]
pub fn target_radius(x: f32) -> f32 {
    AxialZone::at(x).radius(x)
}

/// Cold (upstream of the combustor) or hot (combustor and downstream)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalZone {
    Cold,
    Hot,
}

impl ThermalZone {
    #[inline]
    pub fn at(x: f32) -> Self {
        if x > 0.0 {
            ThermalZone::Cold
        } else {
            ThermalZone::Hot
        }
    }
}

/// Particle color at axial station `x`.
///
/// Cold air is a fixed pale blue. Hot gas is red-orange at the combustor and
/// loses its green channel linearly over the next `HOT_FADE_LENGTH` units.
#[inline]
pub fn thermal_color(x: f32) -> [f32; 3] {
    match ThermalZone::at(x) {
        ThermalZone::Cold => COLD_COLOR,
        ThermalZone::Hot => {
            let progress = (x.abs() / HOT_FADE_LENGTH).min(1.0);
            [1.0, HOT_GREEN * (1.0 - progress), HOT_BLUE]
        }
    }
}
