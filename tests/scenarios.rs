//! End-to-end scenarios for a site at 8.628°E 45.812°N.

use approx::assert_abs_diff_eq;
use chrono::{DateTime, Duration, FixedOffset, Timelike};
use pvgis_core::constants::ANGULAR_LOSS_COEFFICIENT;
use pvgis_core::irradiance::loss::{diffuse_angular_factor, isotropic_transmission};
use pvgis_core::irradiance::{IrradianceOptions, SolarGeometry, decompose};
use pvgis_core::pipeline::{PositionRequest, Session};
use pvgis_core::{
    Algorithm, AlgorithmSelection, AzimuthOrigin, Location, Quantity, SurfaceGeometry, TimeSeries,
};

fn site() -> Location {
    Location::from_degrees(8.628, 45.812, 214.0).unwrap()
}

fn at(timestamp: &str) -> TimeSeries {
    TimeSeries::new(vec![timestamp.parse().unwrap()]).unwrap()
}

fn hourly(start: &str, hours: i64) -> TimeSeries {
    let start: DateTime<FixedOffset> = start.parse().unwrap();
    TimeSeries::range(start, start + Duration::hours(hours), Duration::hours(1)).unwrap()
}

#[test]
fn noaa_azimuth_over_two_winter_days() {
    let timestamps = hourly("2010-01-27T00:00:00Z", 48);
    let request = PositionRequest::new(site(), timestamps)
        .with_quantities([Quantity::Azimuth])
        .with_events(true);
    let overview = Session::new().overview(&request).unwrap();

    let azimuth = overview.azimuth.as_ref().unwrap();
    assert_eq!(azimuth.origin(), Some(AzimuthOrigin::North));
    assert_eq!(azimuth.algorithm(), Some(Algorithm::Noaa));
    let degrees = azimuth.degrees();
    assert_eq!(degrees.len(), 48);

    // shortly after midnight the sun is just east of north
    assert_abs_diff_eq!(degrees[0], 12.0, epsilon = 1.5);
    assert_abs_diff_eq!(degrees[24], 12.0, epsilon = 1.5);

    // south is crossed between 11:00 and 12:00 UTC on both days
    for day in 0..2 {
        let morning = degrees[day * 24 + 11];
        let afternoon = degrees[day * 24 + 12];
        assert!(morning < 180.0 && afternoon > 180.0, "{morning} {afternoon}");
    }
    // the azimuth grows through the day
    assert!(degrees[1..24].windows(2).all(|w| w[1] > w[0]));

    let events = overview.events.as_ref().unwrap();
    let noon = events[12].transit();
    assert_eq!(noon.hour(), 11);
    assert!((30..45).contains(&noon.minute()), "{noon}");
}

#[test]
fn noaa_declination_at_summer_solstice() {
    let request =
        PositionRequest::new(site(), at("2023-06-21T12:00:00Z")).with_quantities([Quantity::Declination]);
    let overview = Session::new().overview(&request).unwrap();
    let declination = overview.declination.unwrap().radians()[0];
    assert_abs_diff_eq!(declination, 0.4090, epsilon = 0.001);
}

#[test]
fn milne_equation_of_time_on_new_year() {
    let selection = AlgorithmSelection::default().with_timing(Algorithm::Milne1921);
    let request = PositionRequest::new(site(), at("2023-01-01T12:00:00Z"))
        .with_selection(selection)
        .with_quantities([Quantity::EquationOfTime]);
    let overview = Session::new().overview(&request).unwrap();
    let eot = overview.equation_of_time.unwrap();
    assert_eq!(eot.algorithm(), Some(Algorithm::Milne1921));
    assert_abs_diff_eq!(eot.minutes()[0], -3.71, epsilon = 0.01);
    assert_abs_diff_eq!(eot.minutes()[0], -3.99, epsilon = 0.5);
}

#[test]
fn default_equation_of_time_on_new_year() {
    let request = PositionRequest::new(site(), at("2023-01-01T12:00:00Z"))
        .with_quantities([Quantity::EquationOfTime]);
    let overview = Session::new().overview(&request).unwrap();
    let eot = overview.equation_of_time.unwrap();
    assert_eq!(eot.algorithm(), Some(Algorithm::Noaa));
    // about a minute above the tabulated value
    assert_abs_diff_eq!(eot.minutes()[0], -2.904, epsilon = 0.01);
    assert_abs_diff_eq!(eot.minutes()[0], -3.99, epsilon = 1.2);
}

#[test]
fn horizontal_surface_keeps_diffuse_horizontal() {
    let surface = SurfaceGeometry::from_degrees(180.0, 0.0).unwrap();
    let request = PositionRequest::new(site(), hourly("2023-06-21T04:00:00Z", 16)).with_surface(surface);
    let geometry = SolarGeometry::compute(&mut Session::new(), &request, None, None).unwrap();
    let options = IrradianceOptions {
        apply_angular_loss: false,
        ..IrradianceOptions::default()
    };
    let components = decompose(&site(), &surface, &geometry, &options, None).unwrap();

    for (inclined, horizontal) in components.diffuse().iter().zip(components.diffuse_horizontal()) {
        assert_abs_diff_eq!(*inclined, *horizontal, epsilon = 1e-9);
    }
    assert!(components.diffuse().iter().any(|&d| d > 0.0));
    assert!(components.reflected().iter().all(|&r| r == 0.0));
}

#[test]
fn horizontal_surface_diffuse_with_default_losses() {
    let surface = SurfaceGeometry::from_degrees(180.0, 0.0).unwrap();
    let request = PositionRequest::new(site(), hourly("2023-06-21T04:00:00Z", 16)).with_surface(surface);
    let geometry = SolarGeometry::compute(&mut Session::new(), &request, None, None).unwrap();
    let components =
        decompose(&site(), &surface, &geometry, &IrradianceOptions::default(), None).unwrap();

    // a flat cover still reflects part of the isotropic sky
    let transmission =
        isotropic_transmission(diffuse_angular_factor(0.0), ANGULAR_LOSS_COEFFICIENT).unwrap();
    assert_abs_diff_eq!(transmission, 0.956, epsilon = 1e-3);
    for (inclined, horizontal) in components.diffuse().iter().zip(components.diffuse_horizontal()) {
        assert_abs_diff_eq!(*inclined, *horizontal * transmission, epsilon = 1e-9);
    }
    assert!(components.diffuse().iter().any(|&d| d > 0.0));
    assert!(components.reflected().iter().all(|&r| r == 0.0));
}

#[test]
fn shaded_sun_loses_direct_but_keeps_diffuse() {
    let surface = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
    let request = PositionRequest::new(site(), hourly("2023-06-21T09:00:00Z", 3)).with_surface(surface);
    let shadow = [false, true, false];
    let geometry = SolarGeometry::compute(&mut Session::new(), &request, None, Some(&shadow[..])).unwrap();
    assert!(geometry.altitude().iter().all(|&a| a > 0.0));
    assert_eq!(geometry.in_shade(), &shadow);

    let components =
        decompose(&site(), &surface, &geometry, &IrradianceOptions::default(), None).unwrap();
    assert_eq!(components.direct()[1], 0.0);
    assert!(components.diffuse()[1] > 0.0);
    assert!(components.direct()[0] > 0.0 && components.direct()[2] > 0.0);
}
