use necsim_core::{
    cogs::Habitat,
    landscape::{Location, WrappedLocation},
};
use necsim_core_bond::{ClosedUnitF64, NonNegativeF64, PositiveF64};

use crate::simulation::{
    CoarseMapConfig, HistoricalMapConfig, LandscapeConfig, MapOffset, SetupError,
};

use super::{LandscapeGrid, LandscapeMap, LandscapeType};

fn config(fine: LandscapeMap, deme: f64) -> LandscapeConfig {
    LandscapeConfig {
        fine,
        fine_offset: MapOffset::default(),
        coarse: None,
        landscape_type: LandscapeType::Closed,
        historical: Vec::new(),
        deme: PositiveF64::new(deme).unwrap(),
    }
}

fn generation(value: f64) -> NonNegativeF64 {
    NonNegativeF64::new(value).unwrap()
}

fn at(x: u32, y: u32) -> WrappedLocation {
    WrappedLocation::unwrapped(Location::new(x, y))
}

#[test]
fn closed_null_landscape() {
    let landscape = LandscapeGrid::new(&config(LandscapeMap::null(4, 3).unwrap(), 2.5)).unwrap();

    assert_eq!(landscape.get_extent().width(), 4);
    assert_eq!(landscape.get_extent().height(), 3);
    assert_eq!(landscape.get_individuals_at(&at(3, 2), generation(0.0)), 2);
    assert_eq!(landscape.get_total_individuals(generation(0.0)), 24);

    assert_eq!(landscape.wrap_absolute(-1, 0), None);
    assert_eq!(landscape.wrap_absolute(0, 3), None);
    assert_eq!(landscape.wrap_absolute(1, 1), Some(at(1, 1)));
}

#[test]
fn densities_are_floored() {
    let fine = LandscapeMap::from_rows(&[vec![0.0, 0.4, 0.5, 1.99]]).unwrap();
    let landscape = LandscapeGrid::new(&config(fine, 2.0)).unwrap();

    assert_eq!(landscape.get_individuals_at(&at(0, 0), generation(0.0)), 0);
    assert_eq!(landscape.get_individuals_at(&at(1, 0), generation(0.0)), 0);
    assert_eq!(landscape.get_individuals_at(&at(2, 0), generation(0.0)), 1);
    assert_eq!(landscape.get_individuals_at(&at(3, 0), generation(0.0)), 3);
    assert!((landscape.max_density() - 3.98).abs() < 1e-12);
}

#[test]
fn infinite_landscape_outside_is_uniform() {
    let fine = LandscapeMap::from_rows(&[vec![0.0, 3.0], vec![2.0, 0.0]]).unwrap();

    let mut infinite = config(fine, 4.0);
    infinite.landscape_type = LandscapeType::Infinite;

    let landscape = LandscapeGrid::new(&infinite).unwrap();

    let wrapped = landscape.wrap_absolute(-2, 7).unwrap();
    assert_eq!(wrapped, WrappedLocation::new(Location::new(0, 1), -1, 3));

    assert_eq!(landscape.get_individuals_at(&wrapped, generation(0.0)), 4);
    assert_eq!(landscape.get_individuals_at(&at(0, 1), generation(0.0)), 8);
}

#[test]
fn tiled_fine_landscape_repeats_and_ignores_coarse() {
    let fine = LandscapeMap::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

    let mut tiled = config(fine, 1.0);
    tiled.landscape_type = LandscapeType::TiledFine;
    tiled.coarse = Some(CoarseMapConfig {
        map: LandscapeMap::null(3, 3).unwrap(),
        scale: 2,
    });

    let landscape = LandscapeGrid::new(&tiled).unwrap();

    assert_eq!(landscape.get_extent().width(), 2);
    assert!(!landscape.has_coarse_map());

    let wrapped = landscape.wrap_absolute(3, -1).unwrap();
    assert!(wrapped.is_wrapped());
    assert_eq!(landscape.get_individuals_at(&wrapped, generation(0.0)), 4);
}

#[test]
fn coarse_map_surrounds_fine_map() {
    let fine = LandscapeMap::from_rows(&[vec![9.0, 9.0], vec![9.0, 9.0]]).unwrap();

    let mut nested = config(fine, 1.0);
    nested.fine_offset = MapOffset { x: 2, y: 0 };
    nested.coarse = Some(CoarseMapConfig {
        map: LandscapeMap::from_rows(&[vec![1.0, 0.0, 2.0]]).unwrap(),
        scale: 2,
    });

    let landscape = LandscapeGrid::new(&nested).unwrap();

    assert_eq!(landscape.get_extent().width(), 6);
    assert_eq!(landscape.get_extent().height(), 2);
    assert_eq!(landscape.get_individuals_at(&at(1, 1), generation(0.0)), 1);
    assert_eq!(landscape.get_individuals_at(&at(3, 1), generation(0.0)), 9);
    assert_eq!(landscape.get_individuals_at(&at(5, 0), generation(0.0)), 2);
}

#[test]
fn fine_map_outside_coarse_extent() {
    let mut nested = config(LandscapeMap::null(2, 2).unwrap(), 1.0);
    nested.fine_offset = MapOffset { x: 3, y: 0 };
    nested.coarse = Some(CoarseMapConfig {
        map: LandscapeMap::null(2, 1).unwrap(),
        scale: 2,
    });

    assert!(matches!(
        LandscapeGrid::new(&nested),
        Err(SetupError::OutOfBounds { ref field, .. }) if field == "landscape.fine"
    ));
}

#[test]
fn historical_maps_switch_abruptly() {
    let mut historical = config(LandscapeMap::null(2, 2).unwrap(), 10.0);
    historical.historical.push(HistoricalMapConfig {
        fine: LandscapeMap::from_rows(&[vec![0.5, 0.5], vec![0.5, 0.0]]).unwrap(),
        coarse: None,
        generation: generation(100.0),
        rate: ClosedUnitF64::zero(),
    });

    let landscape = LandscapeGrid::new(&historical).unwrap();

    assert_eq!(landscape.get_individuals_at(&at(1, 1), generation(99.9)), 10);
    assert_eq!(landscape.get_individuals_at(&at(1, 1), generation(100.0)), 0);
    assert_eq!(landscape.get_individuals_at(&at(0, 0), generation(250.0)), 5);
}

#[test]
fn historical_maps_blend_linearly() {
    let mut historical = config(LandscapeMap::null(1, 1).unwrap(), 100.0);
    historical.historical.push(HistoricalMapConfig {
        fine: LandscapeMap::from_rows(&[vec![0.0]]).unwrap(),
        coarse: None,
        generation: generation(10.0),
        rate: ClosedUnitF64::new(0.25).unwrap(),
    });

    // A historical map set without individuals is rejected
    assert!(matches!(
        LandscapeGrid::new(&historical),
        Err(SetupError::EmptyLandscape { ref field }) if field == "landscape.historical[0]"
    ));

    historical.historical[0].fine = LandscapeMap::from_rows(&[vec![0.5]]).unwrap();

    let landscape = LandscapeGrid::new(&historical).unwrap();

    assert!((landscape.density_at(&at(0, 0), generation(0.0)) - 100.0).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(2.0)) - 75.0).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(4.0)) - 50.0).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(8.0)) - 50.0).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(12.0)) - 50.0).abs() < 1e-9);
}

#[test]
fn historical_dimension_mismatch() {
    let mut historical = config(LandscapeMap::null(2, 2).unwrap(), 1.0);
    historical.historical.push(HistoricalMapConfig {
        fine: LandscapeMap::null(2, 3).unwrap(),
        coarse: None,
        generation: generation(1.0),
        rate: ClosedUnitF64::zero(),
    });

    assert!(matches!(
        LandscapeGrid::new(&historical),
        Err(SetupError::DimensionMismatch { ref field, found_height: 3, .. })
            if field == "landscape.historical[0].fine"
    ));
}

#[test]
fn historical_maps_must_be_ordered() {
    let mut historical = config(LandscapeMap::null(2, 2).unwrap(), 1.0);

    for generation_ago in [5.0, 5.0] {
        historical.historical.push(HistoricalMapConfig {
            fine: LandscapeMap::null(2, 2).unwrap(),
            coarse: None,
            generation: generation(generation_ago),
            rate: ClosedUnitF64::zero(),
        });
    }

    assert!(matches!(
        LandscapeGrid::new(&historical),
        Err(SetupError::UnorderedHistoricalMaps { ref field, .. })
            if field == "landscape.historical[1].generation"
    ));
}

#[test]
fn empty_landscape_is_rejected() {
    let fine = LandscapeMap::from_rows(&[vec![0.2, 0.3]]).unwrap();

    assert!(matches!(
        LandscapeGrid::new(&config(fine, 1.0)),
        Err(SetupError::EmptyLandscape { .. })
    ));
}

#[test]
fn slow_blends_complete_by_the_adoption() {
    let mut historical = config(LandscapeMap::null(1, 1).unwrap(), 100.0);
    historical.historical.push(HistoricalMapConfig {
        fine: LandscapeMap::from_rows(&[vec![0.5]]).unwrap(),
        coarse: None,
        generation: generation(10.0),
        rate: ClosedUnitF64::new(0.05).unwrap(),
    });

    let landscape = LandscapeGrid::new(&historical).unwrap();

    // The weight grows by 0.1 per generation instead of 0.05
    assert!((landscape.density_at(&at(0, 0), generation(5.0)) - 75.0).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(9.99)) - 50.05).abs() < 1e-9);
    assert!((landscape.density_at(&at(0, 0), generation(10.0)) - 50.0).abs() < 1e-9);
}

#[test]
fn blends_must_not_empty_the_landscape() {
    let mut shifting = config(LandscapeMap::from_rows(&[vec![1.0, 0.0]]).unwrap(), 1.0);
    shifting.historical.push(HistoricalMapConfig {
        fine: LandscapeMap::from_rows(&[vec![0.0, 1.0]]).unwrap(),
        coarse: None,
        generation: generation(10.0),
        rate: ClosedUnitF64::new(0.1).unwrap(),
    });

    // Halfway through the blend both cells hold half an individual
    assert!(matches!(
        LandscapeGrid::new(&shifting),
        Err(SetupError::NoDispersalTarget { ref field, generation: at_generation })
            if field == "landscape.historical[0]" && (at_generation - 5.0).abs() < 1e-9
    ));

    // With two individuals per deme, one cell is always inhabited
    shifting.deme = PositiveF64::new(2.0).unwrap();

    let landscape = LandscapeGrid::new(&shifting).unwrap();

    assert_eq!(landscape.find_generation_without(|_| true), None);

    // The right cell is only inhabited once its density reaches one
    assert!(matches!(
        landscape.find_generation_without(|location| location.x() == 1),
        Some(at_generation) if (at_generation.get() - 2.5).abs() < 1e-9
    ));
}
