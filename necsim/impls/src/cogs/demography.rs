use necsim_core::{
    cogs::Habitat,
    landscape::{Location, WrappedLocation},
};
use necsim_core_bond::{ClosedUnitF64, NonNegativeF64, PositiveF64};

use crate::{
    cogs::habitat::{LandscapeGrid, LandscapeType, MapGeometry, MapLayers},
    simulation::{RateMapConfig, SetupError},
};

/// Spatially varying reproduction or death weights, normalised by their
///  landscape-wide maximum for rejection sampling.
///
/// Cells that are not covered by the rate maps have rate 1.0.
#[derive(Clone, Debug)]
pub struct DemographicRateMap {
    layers: MapLayers,
    geometry: MapGeometry,
    landscape_type: LandscapeType,
    max: PositiveF64,
}

impl DemographicRateMap {
    /// # Errors
    ///
    /// Returns a `SetupError` if the rate maps do not match the landscape's
    ///  map dimensions, or if the maximum rate is zero.
    pub fn new(
        field: &str,
        config: &RateMapConfig,
        landscape: &LandscapeGrid,
    ) -> Result<Self, SetupError> {
        let present = landscape.present_layers();

        if !config.fine.has_dimensions(present.fine()) {
            return Err(SetupError::DimensionMismatch {
                field: format!("{}.fine", field),
                expected_width: present.fine().width(),
                expected_height: present.fine().height(),
                found_width: config.fine.width(),
                found_height: config.fine.height(),
            });
        }

        let covers_grid = match (present.coarse(), &config.coarse) {
            (Some(landscape_coarse), Some(coarse)) => {
                if !coarse.has_dimensions(landscape_coarse) {
                    return Err(SetupError::DimensionMismatch {
                        field: format!("{}.coarse", field),
                        expected_width: landscape_coarse.width(),
                        expected_height: landscape_coarse.height(),
                        found_width: coarse.width(),
                        found_height: coarse.height(),
                    });
                }

                true
            },
            (Some(_), None) => false,
            (None, Some(_)) => {
                return Err(SetupError::UnexpectedMap {
                    field: format!("{}.coarse", field),
                })
            },
            (None, None) => true,
        };

        let layers = MapLayers::new(config.fine.clone(), config.coarse.clone());

        let mut max = layers.max();

        if !covers_grid || landscape.landscape_type() == LandscapeType::Infinite {
            max = max.max(1.0);
        }

        let max = PositiveF64::new(max).map_err(|_| SetupError::ZeroMaximumRate {
            field: String::from(field),
        })?;

        Ok(Self {
            layers,
            geometry: landscape.geometry().clone(),
            landscape_type: landscape.landscape_type(),
            max,
        })
    }

    /// Finds a cell that holds individuals in some map set but has a zero
    ///  rate.
    ///
    /// Blending between two map sets never inhabits a cell that is barren
    ///  in both of them, so checking every map set covers every generation.
    #[must_use]
    pub fn find_zero_rate_habitat(&self, habitat: &LandscapeGrid) -> Option<Location> {
        let extent = habitat.get_extent();

        (extent.y()..(extent.y() + extent.height()))
            .flat_map(|y| {
                (extent.x()..(extent.x() + extent.width())).map(move |x| Location::new(x, y))
            })
            .find(|location| {
                let location = WrappedLocation::unwrapped(*location);

                self.rate_at(&location) <= 0.0
                    && habitat
                        .map_epoch_generations()
                        .any(|generation| habitat.get_individuals_at(&location, generation) > 0)
            })
    }

    /// Finds a generation at which every inhabited cell has a zero rate
    #[must_use]
    pub fn find_generation_without_rate(&self, habitat: &LandscapeGrid) -> Option<NonNegativeF64> {
        habitat.find_generation_without(|location| self.rate_at(location) > 0.0)
    }

    #[must_use]
    pub fn max(&self) -> PositiveF64 {
        self.max
    }

    #[must_use]
    pub fn rate_at(&self, location: &WrappedLocation) -> f64 {
        if location.is_wrapped() {
            match self.landscape_type {
                LandscapeType::Closed => 0.0,
                LandscapeType::Infinite => 1.0,
                LandscapeType::TiledFine | LandscapeType::TiledCoarse => {
                    self.layers
                        .value_at(&self.geometry, location.location(), 1.0)
                },
            }
        } else {
            self.layers
                .value_at(&self.geometry, location.location(), 1.0)
        }
    }

    /// Acceptance probability `rate / max` of a proposal at `location`
    #[must_use]
    pub fn relative_rate_at(&self, location: &WrappedLocation) -> ClosedUnitF64 {
        let relative = (self.rate_at(location) / self.max.get()).clamp(0.0, 1.0);

        // Safety: clamped to [0.0, 1.0] above, the rate maps contain no NaNs
        unsafe { ClosedUnitF64::new_unchecked(relative) }
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::landscape::{Location, WrappedLocation};
    use necsim_core_bond::{ClosedUnitF64, NonNegativeF64, PositiveF64};

    use crate::{
        cogs::habitat::{LandscapeGrid, LandscapeMap, LandscapeType},
        simulation::{
            CoarseMapConfig, HistoricalMapConfig, LandscapeConfig, MapOffset, RateMapConfig,
            SetupError,
        },
    };

    use super::DemographicRateMap;

    fn landscape(coarse: bool) -> LandscapeGrid {
        LandscapeGrid::new(&LandscapeConfig {
            fine: LandscapeMap::null(2, 2).unwrap(),
            fine_offset: MapOffset::default(),
            coarse: if coarse {
                Some(CoarseMapConfig {
                    map: LandscapeMap::null(2, 1).unwrap(),
                    scale: 2,
                })
            } else {
                None
            },
            landscape_type: LandscapeType::Closed,
            historical: Vec::new(),
            deme: PositiveF64::new(1.0).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn rates_are_normalised_by_maximum() {
        let death = DemographicRateMap::new(
            "death",
            &RateMapConfig {
                fine: LandscapeMap::from_rows(&[vec![4.0, 2.0], vec![1.0, 0.0]]).unwrap(),
                coarse: None,
            },
            &landscape(false),
        )
        .unwrap();

        let at = |x, y| WrappedLocation::unwrapped(Location::new(x, y));

        assert!((death.max().get() - 4.0).abs() < f64::EPSILON);
        assert!((death.relative_rate_at(&at(0, 0)).get() - 1.0).abs() < f64::EPSILON);
        assert!((death.relative_rate_at(&at(1, 0)).get() - 0.5).abs() < f64::EPSILON);
        assert!((death.relative_rate_at(&at(0, 1)).get() - 0.25).abs() < f64::EPSILON);
        assert!(death.relative_rate_at(&at(1, 1)).get() < f64::EPSILON);

        assert_eq!(
            death.find_zero_rate_habitat(&landscape(false)),
            Some(Location::new(1, 1))
        );
    }

    #[test]
    fn zero_rates_are_found_in_historical_map_sets() {
        let mut config = LandscapeConfig {
            fine: LandscapeMap::from_rows(&[vec![1.0, 0.0]]).unwrap(),
            fine_offset: MapOffset::default(),
            coarse: None,
            landscape_type: LandscapeType::Closed,
            historical: Vec::new(),
            deme: PositiveF64::new(1.0).unwrap(),
        };

        let rates = RateMapConfig {
            fine: LandscapeMap::from_rows(&[vec![1.0, 0.0]]).unwrap(),
            coarse: None,
        };

        let present = LandscapeGrid::new(&config).unwrap();
        let death = DemographicRateMap::new("death", &rates, &present).unwrap();

        assert_eq!(death.find_zero_rate_habitat(&present), None);
        assert_eq!(death.find_generation_without_rate(&present), None);

        // The right cell is settled 10 generations ago, the left is abandoned
        config.historical.push(HistoricalMapConfig {
            fine: LandscapeMap::from_rows(&[vec![0.0, 1.0]]).unwrap(),
            coarse: None,
            generation: NonNegativeF64::new(10.0).unwrap(),
            rate: ClosedUnitF64::zero(),
        });

        let shifting = LandscapeGrid::new(&config).unwrap();
        let death = DemographicRateMap::new("death", &rates, &shifting).unwrap();

        assert_eq!(death.find_zero_rate_habitat(&shifting), Some(Location::new(1, 0)));
        assert_eq!(
            death.find_generation_without_rate(&shifting),
            Some(NonNegativeF64::new(10.0).unwrap())
        );
    }

    #[test]
    fn uncovered_cells_have_unit_rate() {
        let reproduction = DemographicRateMap::new(
            "reproduction",
            &RateMapConfig {
                fine: LandscapeMap::from_rows(&[vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap(),
                coarse: None,
            },
            &landscape(true),
        )
        .unwrap();

        let outside = WrappedLocation::unwrapped(Location::new(3, 1));

        assert!((reproduction.rate_at(&outside) - 1.0).abs() < f64::EPSILON);
        assert!((reproduction.max().get() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_maximum_is_fatal() {
        let result = DemographicRateMap::new(
            "death",
            &RateMapConfig {
                fine: LandscapeMap::from_rows(&[vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap(),
                coarse: None,
            },
            &landscape(false),
        );

        assert!(matches!(
            result,
            Err(SetupError::ZeroMaximumRate { ref field }) if field == "death"
        ));
    }

    #[test]
    fn mismatching_rate_map_is_rejected() {
        let result = DemographicRateMap::new(
            "reproduction",
            &RateMapConfig {
                fine: LandscapeMap::null(3, 2).unwrap(),
                coarse: None,
            },
            &landscape(false),
        );

        assert!(matches!(
            result,
            Err(SetupError::DimensionMismatch { ref field, .. }) if field == "reproduction.fine"
        ));
    }
}
