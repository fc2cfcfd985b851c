//! Physical constants and model defaults.

#![allow(clippy::unreadable_literal)]

/// Lowest accepted site elevation in meters.
pub const ELEVATION_MINIMUM: f64 = 0.0;
/// Highest accepted site elevation in meters.
pub const ELEVATION_MAXIMUM: f64 = 8848.0;

/// Default surface tilt in degrees.
pub const SURFACE_TILT_DEFAULT: f64 = 45.0;
/// Default surface orientation in degrees, clockwise from North (due south).
pub const SURFACE_ORIENTATION_DEFAULT: f64 = 180.0;
/// Tilts at or below this many radians are treated as a horizontal surface.
pub const SURFACE_TILT_HORIZONTALLY_FLAT_PANEL_THRESHOLD: f64 = 0.0001;

/// Solar constant in W/m².
pub const SOLAR_CONSTANT: f64 = 1360.8;
/// Orbital perigee offset of the day angle, in radians.
pub const PERIGEE_OFFSET: f64 = 0.048869;
/// Amplitude of the orbital eccentricity correction.
pub const ECCENTRICITY_CORRECTION_FACTOR: f64 = 0.03344;

/// Lowest accepted Linke turbidity factor.
pub const LINKE_TURBIDITY_MINIMUM: f64 = 0.0;
/// Highest accepted Linke turbidity factor.
pub const LINKE_TURBIDITY_MAXIMUM: f64 = 8.0;
/// Default Linke turbidity factor.
pub const LINKE_TURBIDITY_DEFAULT: f64 = 2.0;

/// Zenith of the sun's center at sunrise and sunset (90.833°), in radians.
pub const REFRACTED_SOLAR_ZENITH_ANGLE_DEFAULT: f64 = 1.5853349194640094;
/// Tolerance added above π for a refracted zenith, in radians.
pub const ZENITH_REFRACTION_TOLERANCE: f64 = 0.0146;

/// Mean ground albedo.
pub const ALBEDO_DEFAULT: f64 = 0.2;

/// Default horizon sampling interval in degrees.
pub const HORIZON_INTERVAL_DEFAULT: f64 = 15.0;

/// Air temperature at standard test conditions, °C.
pub const TEMPERATURE_DEFAULT: f64 = 25.0;
/// Default wind speed, m/s.
pub const WIND_SPEED_DEFAULT: f64 = 0.0;
/// Irradiance at standard test conditions, W/m².
pub const STANDARD_TEST_IRRADIANCE: f64 = 1000.0;

/// Fixed system efficiency (cabling, inverter and mismatch losses).
pub const SYSTEM_EFFICIENCY_DEFAULT: f64 = 0.86;
/// Spectral mismatch factor applied when no spectral data is available.
pub const SPECTRAL_FACTOR_DEFAULT: f64 = 1.0;
/// Relative irradiance (G/1000) below which module efficiency is zero.
pub const RADIATION_CUTOFF_THRESHOLD: f64 = 0.0;

/// Martin and Ruiz angular loss coefficients `[c2, a_r]`.
pub const AOI_CONSTANTS: [f64; 2] = [-0.074, 0.155];
/// Angular loss coefficient `a_r`.
pub const ANGULAR_LOSS_COEFFICIENT: f64 = AOI_CONSTANTS[1];

/// Solar altitude below which the diffuse sky uses the low-sun regime, in radians.
pub const LOW_SUN_ALTITUDE: f64 = 0.1;
/// Solar altitude below which direct irradiance on a surface is neglected, in radians.
pub const LOW_ANGLE_DIRECT_THRESHOLD: f64 = 0.04;

/// Diffuse anisotropy term of a surface in shade.
pub const TERM_N_IN_SHADE: f64 = 0.252_271;

/// Installed peak power, kWp.
pub const PEAK_POWER_DEFAULT: f64 = 1.0;

/// Huld (2011) coefficients `k0..k6` of crystalline silicon, free-standing.
pub const HULD_CSI_FREE_STANDING: [f64; 7] = [
    1.0, -0.017162, -0.040289, -0.004681, 0.000148, 0.000169, 0.000005,
];
/// Faiman heat loss coefficients `[U0, U1]` of free-standing modules, W/(m²K) and Ws/(m³K).
pub const FAIMAN_FREE_STANDING: [f64; 2] = [26.9, 6.2];

/// Module current at standard test conditions, A.
pub const CURRENT_AT_STANDARD_TEST_CONDITIONS: f64 = 9.0;
/// Temperature coefficient of the current, A/K.
pub const CURRENT_TEMPERATURE_COEFFICIENT: f64 = 0.0045;
/// Module voltage at standard test conditions, V.
pub const VOLTAGE_AT_STANDARD_TEST_CONDITIONS: f64 = 36.0;
/// Voltage response to `ln(G/1000)` and its square, V.
pub const VOLTAGE_IRRADIANCE_COEFFICIENTS: [f64; 2] = [1.1, -0.15];
/// Temperature coefficient of the voltage, V/K.
pub const VOLTAGE_TEMPERATURE_COEFFICIENT: f64 = -0.12;
/// Module power at standard test conditions, W.
pub const POWER_AT_STANDARD_TEST_CONDITIONS: f64 =
    CURRENT_AT_STANDARD_TEST_CONDITIONS * VOLTAGE_AT_STANDARD_TEST_CONDITIONS;
