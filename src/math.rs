//! Numeric helpers shared by the calculators.

#![allow(clippy::many_single_char_names)]

use core::f64::consts::{PI, TAU};

/// Radians per minute of time (2π / 1440).
pub const RADIANS_PER_MINUTE: f64 = TAU / 1440.0;

/// Normalizes an angle in radians to the range [0, 2π).
pub fn normalize_radians_0_to_tau(radians: f64) -> f64 {
    let normalized = radians % TAU;
    if normalized >= 0.0 {
        return normalized;
    }
    let shifted = normalized + TAU;
    // tiny negative inputs round up to 2π
    if shifted < TAU { shifted } else { 0.0 }
}

/// Wraps an angle in radians to the range (-π, π].
pub fn wrap_radians_pi(radians: f64) -> f64 {
    let wrapped = normalize_radians_0_to_tau(radians);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Evaluates `c₀ + c₁x + c₂x² + ...` by Horner's rule.
pub fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    let Some(&last) = coeffs.last() else {
        return 0.0;
    };

    let mut result = last;
    for &coeff in coeffs.iter().rev().skip(1) {
        result = result.mul_add(x, coeff);
    }
    result
}

/// Limits `x` to [`lower`, `upper`], passing NaN through.
#[inline]
pub fn clip(x: f64, lower: f64, upper: f64) -> f64 {
    if x < lower {
        lower
    } else if x > upper {
        upper
    } else {
        x
    }
}

/// Converts minutes of time to an angle in radians.
#[inline]
pub fn minutes_to_radians(minutes: f64) -> f64 {
    minutes * RADIANS_PER_MINUTE
}

/// Converts an angle in radians to minutes of time.
#[inline]
pub fn radians_to_minutes(radians: f64) -> f64 {
    radians / RADIANS_PER_MINUTE
}
