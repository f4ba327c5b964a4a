use necsim_core::{
    cogs::{DispersalSampler, Habitat, RngCore, RngSampler},
    landscape::{Location, WrappedLocation},
};
use necsim_core_bond::NonNegativeF64;

use crate::{
    cogs::{
        demography::DemographicRateMap,
        habitat::{LandscapeGrid, LandscapeMap, LandscapeType},
    },
    simulation::SetupError,
};

use super::is_habitable;

/// Rejected draws after which a row is scanned for any habitable target
const DEAD_END_CHECK_INTERVAL: u32 = 256;

/// Inverse-CDF sampling from the rows of a dispersal matrix over the fine
///  map cells, with the reproduction weights folded into the columns
#[derive(Debug)]
pub struct CumulativeDispersalSampler {
    cumulative_dispersal: Box<[f64]>,
    num_cells: usize,
    width: u32,
}

impl CumulativeDispersalSampler {
    /// # Errors
    ///
    /// Returns a `SetupError` if the landscape is not closed or has a coarse
    ///  map, if the matrix dimensions do not match the number of fine map
    ///  cells, or if a cell that is habitable in some map set cannot disperse
    ///  to any cell that is habitable in the same map set.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(
        matrix: &LandscapeMap,
        habitat: &LandscapeGrid,
        reproduction: Option<&DemographicRateMap>,
    ) -> Result<Self, SetupError> {
        if habitat.landscape_type() != LandscapeType::Closed || habitat.has_coarse_map() {
            return Err(SetupError::IncompatibleLandscapeType {
                landscape_type: habitat.landscape_type(),
                has_coarse: habitat.has_coarse_map(),
            });
        }

        let extent = habitat.get_extent();
        let num_cells_u64 = extent.area();

        if u64::from(matrix.width()) != num_cells_u64 || u64::from(matrix.height()) != num_cells_u64 {
            return Err(SetupError::DispersalMatrixDimension {
                expected: num_cells_u64,
                found_width: matrix.width(),
                found_height: matrix.height(),
            });
        }

        let num_cells = num_cells_u64 as usize;
        let width = extent.width();

        let cell = |index: usize| {
            let index = index as u32;

            WrappedLocation::unwrapped(Location::new(index % width, index / width))
        };

        let column_weights: Vec<f64> = (0..num_cells)
            .map(|target| reproduction.map_or(1.0, |reproduction| reproduction.rate_at(&cell(target))))
            .collect();

        let epochs: Vec<(NonNegativeF64, Vec<bool>)> = habitat
            .map_epoch_generations()
            .map(|generation| {
                let habitable = (0..num_cells)
                    .map(|target| is_habitable(habitat, &cell(target), generation))
                    .collect();

                (generation, habitable)
            })
            .collect();

        let mut cumulative_dispersal = vec![0.0_f64; num_cells * num_cells].into_boxed_slice();

        for origin in 0..num_cells {
            let row = &mut cumulative_dispersal[(origin * num_cells)..((origin + 1) * num_cells)];

            let mut total = 0.0_f64;
            let mut last_positive = None;

            for (target, cumulative) in row.iter_mut().enumerate() {
                let weight = matrix.get(target as u32, origin as u32) * column_weights[target];

                if weight > 0.0 {
                    last_positive = Some(target);
                }

                total += weight;
                *cumulative = total;
            }

            for (generation, habitable) in &epochs {
                let reaches_habitat = habitable.iter().enumerate().any(|(target, is_target_habitable)| {
                    *is_target_habitable
                        && matrix.get(target as u32, origin as u32) * column_weights[target] > 0.0
                });

                if habitable[origin] && !reaches_habitat {
                    return Err(SetupError::DispersalMatrixDeadEnd {
                        row: origin,
                        generation: generation.get(),
                    });
                }
            }

            if let Some(last_positive) = last_positive {
                for (target, cumulative) in row.iter_mut().enumerate() {
                    *cumulative = if target >= last_positive {
                        1.0
                    } else {
                        *cumulative / total
                    };
                }
            }
        }

        Ok(Self {
            cumulative_dispersal,
            num_cells,
            width,
        })
    }
}

#[contract_trait]
impl<G: RngCore> DispersalSampler<LandscapeGrid, G> for CumulativeDispersalSampler {
    #[must_use]
    fn sample_dispersal_from_location(
        &self,
        location: &WrappedLocation,
        habitat: &LandscapeGrid,
        generation: NonNegativeF64,
        rng: &mut G,
    ) -> WrappedLocation {
        let origin = (location.y() as usize) * (self.width as usize) + (location.x() as usize);

        let cumulative_dispersal =
            &self.cumulative_dispersal[(origin * self.num_cells)..((origin + 1) * self.num_cells)];

        // An all-zero row keeps the lineage in place
        if cumulative_dispersal[self.num_cells - 1] <= 0.0 {
            return *location;
        }

        let mut rejections = 0_u32;

        loop {
            let u = rng.sample_uniform_closed_open().get();

            // The row ends at 1.0 > u, so a target always exists
            let target = self.cell(cumulative_dispersal.partition_point(|cumulative| *cumulative <= u));

            // Historical maps may have made a setup-time habitable cell barren
            if is_habitable(habitat, &target, generation) {
                return target;
            }

            rejections = rejections.wrapping_add(1);

            // A lineage left on a cell that has since become barren, or a
            //  blend between map sets, can leave a row without any currently
            //  habitable target. The lineage then stays where it is.
            if rejections % DEAD_END_CHECK_INTERVAL == 0
                && !self.reaches_habitat(cumulative_dispersal, habitat, generation)
            {
                return *location;
            }
        }
    }
}

impl CumulativeDispersalSampler {
    fn cell(&self, index: usize) -> WrappedLocation {
        #[allow(clippy::cast_possible_truncation)]
        let index = index as u32;

        WrappedLocation::unwrapped(Location::new(index % self.width, index / self.width))
    }

    /// Checks whether some target with positive weight in the cumulative
    ///  `row` is habitable at `generation`
    fn reaches_habitat(
        &self,
        row: &[f64],
        habitat: &LandscapeGrid,
        generation: NonNegativeF64,
    ) -> bool {
        let mut previous = 0.0_f64;

        row.iter().enumerate().any(|(target, cumulative)| {
            let has_weight = *cumulative > previous;
            previous = *cumulative;

            has_weight && is_habitable(habitat, &self.cell(target), generation)
        })
    }
}
