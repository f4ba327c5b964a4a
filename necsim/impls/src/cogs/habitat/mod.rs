use serde::{Deserialize, Serialize};

use necsim_core::{
    cogs::Habitat,
    landscape::{LandscapeExtent, Location, WrappedLocation},
};
use necsim_core_bond::{ClosedUnitF64, NonNegativeF64, PositiveF64};

use crate::simulation::{LandscapeConfig, SetupError};

mod map;

pub use map::{LandscapeMap, MapConfig, MapGeometry, MapLayers};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandscapeType {
    /// Nothing exists outside the grid
    Closed,
    /// Outside the grid, every cell holds exactly one deme
    Infinite,
    /// The fine map repeats periodically, the coarse map is ignored
    TiledFine,
    /// The coarse extent, with the fine map embedded, repeats periodically
    TiledCoarse,
}

impl Default for LandscapeType {
    fn default() -> Self {
        Self::Closed
    }
}

/// A set of maps that is adopted `generation` generations ago, blending
///  linearly towards it at `blend_rate` per generation from the previous
///  adoption onwards, but never slower than to complete by `generation`
#[derive(Clone, Debug)]
struct MapEpoch {
    generation: NonNegativeF64,
    blend_rate: ClosedUnitF64,
    layers: MapLayers,
}

/// Multi-resolution, time-varying population density on a finite grid with
///  wrap-around positions for unbounded landscapes
#[derive(Clone, Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct LandscapeGrid {
    geometry: MapGeometry,
    landscape_type: LandscapeType,
    deme: PositiveF64,
    epochs: Vec<MapEpoch>,
    max_density: f64,
}

impl LandscapeGrid {
    /// # Errors
    ///
    /// Returns a `SetupError` naming the offending `landscape` field if the
    ///  maps are inconsistent, or if any map set contains no individuals.
    #[allow(clippy::too_many_lines)]
    pub fn new(config: &LandscapeConfig) -> Result<Self, SetupError> {
        let fine = &config.fine;

        let coarse = match (&config.coarse, config.landscape_type) {
            (Some(_), LandscapeType::TiledFine) => {
                warn!("The coarse map is ignored in a TiledFine landscape.");
                None
            },
            (coarse, _) => coarse.as_ref(),
        };

        let (grid, fine_extent, coarse_scale) = if let Some(coarse) = coarse {
            if coarse.scale == 0 {
                return Err(SetupError::NonPositive {
                    field: String::from("landscape.coarse.scale"),
                });
            }

            let (width, height) = match (
                coarse.map.width().checked_mul(coarse.scale),
                coarse.map.height().checked_mul(coarse.scale),
            ) {
                (Some(width), Some(height)) => (width, height),
                _ => {
                    return Err(SetupError::MalformedMap {
                        field: String::from("landscape.coarse"),
                        source: crate::simulation::MapError::TooLarge,
                    })
                },
            };

            let grid = LandscapeExtent::new(0, 0, width, height);
            let fine_extent = LandscapeExtent::new(
                config.fine_offset.x,
                config.fine_offset.y,
                fine.width(),
                fine.height(),
            );

            if !grid.encloses(&fine_extent) {
                return Err(SetupError::OutOfBounds {
                    field: String::from("landscape.fine"),
                    container: "the coarse map's extent",
                    x: config.fine_offset.x,
                    y: config.fine_offset.y,
                    width: fine.width(),
                    height: fine.height(),
                });
            }

            (grid, fine_extent, coarse.scale)
        } else {
            if config.fine_offset.x != 0 || config.fine_offset.y != 0 {
                warn!("The fine map offset is ignored without a coarse map.");
            }

            let grid = LandscapeExtent::new(0, 0, fine.width(), fine.height());

            (grid.clone(), grid, 1)
        };

        let geometry = MapGeometry::new(grid, fine_extent, coarse_scale);

        let mut epochs = vec![MapEpoch {
            generation: NonNegativeF64::zero(),
            blend_rate: ClosedUnitF64::zero(),
            layers: MapLayers::new(fine.clone(), coarse.map(|coarse| coarse.map.clone())),
        }];

        for (i, historical) in config.historical.iter().enumerate() {
            if !historical.fine.has_dimensions(fine) {
                return Err(SetupError::DimensionMismatch {
                    field: format!("landscape.historical[{}].fine", i),
                    expected_width: fine.width(),
                    expected_height: fine.height(),
                    found_width: historical.fine.width(),
                    found_height: historical.fine.height(),
                });
            }

            let previous = &epochs[epochs.len() - 1];

            if historical.generation <= previous.generation {
                return Err(SetupError::UnorderedHistoricalMaps {
                    field: format!("landscape.historical[{}].generation", i),
                    generation: historical.generation.get(),
                });
            }

            let historical_coarse = match (coarse, &historical.coarse) {
                (Some(coarse), Some(historical_coarse)) => {
                    if !historical_coarse.has_dimensions(&coarse.map) {
                        return Err(SetupError::DimensionMismatch {
                            field: format!("landscape.historical[{}].coarse", i),
                            expected_width: coarse.map.width(),
                            expected_height: coarse.map.height(),
                            found_width: historical_coarse.width(),
                            found_height: historical_coarse.height(),
                        });
                    }

                    Some(historical_coarse.clone())
                },
                // The previous coarse map stays in place
                (Some(_), None) => previous.layers.coarse().cloned(),
                (None, Some(_)) => {
                    return Err(SetupError::UnexpectedMap {
                        field: format!("landscape.historical[{}].coarse", i),
                    })
                },
                (None, None) => None,
            };

            epochs.push(MapEpoch {
                generation: historical.generation,
                blend_rate: historical.rate,
                layers: MapLayers::new(historical.fine.clone(), historical_coarse),
            });
        }

        let mut max_value = epochs
            .iter()
            .map(|epoch| epoch.layers.max())
            .fold(0.0_f64, f64::max);

        if config.landscape_type == LandscapeType::Infinite {
            max_value = max_value.max(1.0);
        }

        let landscape = Self {
            geometry,
            landscape_type: config.landscape_type,
            deme: config.deme,
            epochs,
            max_density: max_value * config.deme.get(),
        };

        for (i, epoch) in landscape.epochs.iter().enumerate() {
            if landscape.total_individuals_of(&epoch.layers) == 0 {
                return Err(SetupError::EmptyLandscape {
                    field: if i == 0 {
                        String::from("landscape")
                    } else {
                        format!("landscape.historical[{}]", i - 1)
                    },
                });
            }
        }

        // Blending between two inhabited map sets can still empty the grid
        if let Some(generation) = landscape.find_generation_without(|_| true) {
            let blended = landscape
                .epochs
                .partition_point(|epoch| epoch.generation <= generation);

            return Err(SetupError::NoDispersalTarget {
                field: format!("landscape.historical[{}]", blended.saturating_sub(1)),
                generation: generation.get(),
            });
        }

        debug!(
            "Constructed a {:?} landscape grid of {}x{} cells with {} map epoch(s).",
            landscape.landscape_type,
            landscape.geometry.grid().width(),
            landscape.geometry.grid().height(),
            landscape.epochs.len(),
        );

        Ok(landscape)
    }

    #[must_use]
    pub fn geometry(&self) -> &MapGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn landscape_type(&self) -> LandscapeType {
        self.landscape_type
    }

    /// The fine and coarse maps of the present day
    #[must_use]
    pub fn present_layers(&self) -> &MapLayers {
        &self.epochs[0].layers
    }

    #[must_use]
    pub fn has_coarse_map(&self) -> bool {
        self.epochs[0].layers.coarse().is_some()
    }

    #[must_use]
    pub fn deme(&self) -> PositiveF64 {
        self.deme
    }

    /// Upper bound of the density over all cells and generations
    #[must_use]
    pub fn max_density(&self) -> f64 {
        self.max_density
    }

    /// Density (individuals per cell before flooring) at `generation`
    #[must_use]
    pub fn density_at(&self, location: &WrappedLocation, generation: NonNegativeF64) -> f64 {
        let value = if location.is_wrapped() {
            match self.landscape_type {
                LandscapeType::Closed => 0.0,
                LandscapeType::Infinite => 1.0,
                LandscapeType::TiledFine | LandscapeType::TiledCoarse => {
                    self.value_at(location.location(), generation)
                },
            }
        } else {
            self.value_at(location.location(), generation)
        };

        value * self.deme.get()
    }

    fn value_at(&self, location: &Location, generation: NonNegativeF64) -> f64 {
        // epochs[0] is adopted at generation zero, so the index is positive
        let current = self
            .epochs
            .partition_point(|epoch| epoch.generation <= generation)
            .saturating_sub(1);

        let epoch = &self.epochs[current];
        let value = epoch.layers.value_at(&self.geometry, location, 0.0);

        match self.blend_slope(current) {
            Some(slope) => {
                let weight = (slope * (generation.get() - epoch.generation.get())).min(1.0);

                (1.0 - weight) * value
                    + weight * self.epochs[current + 1].layers.value_at(&self.geometry, location, 0.0)
            },
            None => value,
        }
    }

    /// Blending weight per generation from epoch `index` towards its
    ///  successor, steep enough to complete by the successor's adoption
    fn blend_slope(&self, index: usize) -> Option<f64> {
        let epoch = self.epochs.get(index)?;
        let next = self.epochs.get(index + 1)?;

        if next.blend_rate > 0.0 {
            let span = next.generation.get() - epoch.generation.get();

            Some(next.blend_rate.get().max(span.recip()))
        } else {
            None
        }
    }

    /// Generations at which each map set is fully in place, starting with
    ///  the present
    #[must_use]
    pub fn map_epoch_generations(&self) -> impl Iterator<Item = NonNegativeF64> + '_ {
        self.epochs.iter().map(|epoch| epoch.generation)
    }

    /// Finds a generation at which none of the cells that satisfy
    ///  `predicate` holds any individuals, including the generations at
    ///  which two map sets are blended
    #[must_use]
    pub fn find_generation_without<P: Fn(&WrappedLocation) -> bool>(
        &self,
        predicate: P,
    ) -> Option<NonNegativeF64> {
        if self.landscape_type == LandscapeType::Infinite && self.deme.get() >= 1.0 {
            // Outside the grid, every cell holds one deme at all generations
            if predicate(&self.geometry.grid().wrap(-1, -1)) {
                return None;
            }
        }

        let grid = self.geometry.grid();
        let deme = self.deme.get();

        let cells: Vec<Location> = (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| Location::new(x, y)))
            .filter(|location| predicate(&WrappedLocation::unwrapped(*location)))
            .collect();

        for (index, epoch) in self.epochs.iter().enumerate() {
            let density = |layers: &MapLayers, location: &Location| {
                layers.value_at(&self.geometry, location, 0.0) * deme
            };

            let slope = match self.blend_slope(index) {
                Some(slope) => slope,
                None => {
                    if cells.iter().all(|location| density(&epoch.layers, location) < 1.0) {
                        return Some(epoch.generation);
                    }

                    continue;
                },
            };

            let next = &self.epochs[index + 1].layers;

            // Each cell is inhabited over a closed interval of blending
            //  weights that touches either 0.0 or 1.0
            let mut inhabited_until = f64::NEG_INFINITY;
            let mut inhabited_from = f64::INFINITY;

            for location in &cells {
                let (before, after) = (density(&epoch.layers, location), density(next, location));

                match (before >= 1.0, after >= 1.0) {
                    (true, true) => inhabited_until = 1.0,
                    (true, false) => {
                        inhabited_until = inhabited_until.max((before - 1.0) / (before - after));
                    },
                    (false, true) => {
                        inhabited_from = inhabited_from.min((1.0 - before) / (after - before));
                    },
                    (false, false) => (),
                }
            }

            if inhabited_until < 1.0 && inhabited_until < inhabited_from {
                let weight = 0.5 * (inhabited_until.max(0.0) + inhabited_from.min(1.0));

                // Safety: the weight and the slope are both positive
                return Some(unsafe {
                    NonNegativeF64::new_unchecked(epoch.generation.get() + weight / slope)
                });
            }
        }

        None
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn total_individuals_of(&self, layers: &MapLayers) -> u64 {
        let grid = self.geometry.grid();

        (0..grid.height())
            .flat_map(|y| (0..grid.width()).map(move |x| Location::new(x, y)))
            .map(|location| {
                (layers.value_at(&self.geometry, &location, 0.0) * self.deme.get()).floor() as u64
            })
            .sum()
    }
}

impl Habitat for LandscapeGrid {
    fn get_extent(&self) -> &LandscapeExtent {
        self.geometry.grid()
    }

    fn wrap_absolute(&self, x: i64, y: i64) -> Option<WrappedLocation> {
        let location = self.geometry.grid().wrap(x, y);

        if location.is_wrapped() && self.landscape_type == LandscapeType::Closed {
            None
        } else {
            Some(location)
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn get_individuals_at(&self, location: &WrappedLocation, generation: NonNegativeF64) -> u32 {
        // Saturating float to integer cast
        self.density_at(location, generation).floor() as u32
    }
}

#[cfg(test)]
mod test;
