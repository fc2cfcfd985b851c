//! Ground-reflected irradiance.

/// Irradiance reflected by the ground onto a surface of `tilt`, W/m².
///
/// `R = G_h · albedo · (1 − cos β) / 2` with `G_h` the global horizontal
/// irradiance.
#[must_use]
pub fn ground_reflected(global_horizontal: f64, albedo: f64, tilt: f64) -> f64 {
    global_horizontal * albedo * (1.0 - tilt.cos()) / 2.0
}
