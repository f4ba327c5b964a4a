use serde::{Deserialize, Serialize};

use necsim_core::{
    cogs::{DispersalSampler, Habitat, RngCore, RngSampler},
    landscape::WrappedLocation,
};
use necsim_core_bond::{ClosedUnitF64, NonNegativeF64, PositiveF64};

use crate::cogs::{demography::DemographicRateMap, habitat::LandscapeGrid};

use super::is_habitable;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum DispersalKernel {
    /// Independent normal displacement along each axis
    Normal { sigma: PositiveF64 },
    /// Clark's 2Dt kernel with scale `sigma` and tail parameter `tau`
    FatTailed { sigma: PositiveF64, tau: PositiveF64 },
    /// Normal kernel, but with probability `m_probability` a uniform jump
    ///  within `cutoff` cells along each axis
    NormalUniform {
        sigma: PositiveF64,
        m_probability: ClosedUnitF64,
        cutoff: u32,
    },
}

impl DispersalKernel {
    /// Samples an integer displacement `(dx, dy)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn sample_displacement<G: RngCore>(&self, rng: &mut G) -> (i64, i64) {
        let (dx, dy) = match self {
            Self::Normal { sigma } => rng.sample_2d_normal(0.0, sigma.get()),
            Self::FatTailed { sigma, tau } => {
                let jump = clark2dt::cdf_inverse(
                    rng.sample_uniform_closed_open().get(),
                    sigma.get() * sigma.get(),
                    tau.get(),
                );
                let theta = rng.sample_uniform_open_closed() * 2.0 * std::f64::consts::PI;

                (theta.cos() * jump, theta.sin() * jump)
            },
            Self::NormalUniform {
                sigma,
                m_probability,
                cutoff,
            } => {
                if rng.sample_event(*m_probability) {
                    let width = 2 * u64::from(*cutoff) + 1;

                    return (
                        rng.sample_index_u64(width) as i64 - i64::from(*cutoff),
                        rng.sample_index_u64(width) as i64 - i64::from(*cutoff),
                    );
                }

                rng.sample_2d_normal(0.0, sigma.get())
            },
        };

        // Saturating float to integer casts
        (dx.round() as i64, dy.round() as i64)
    }
}

/// Kernel-based destinations, rejecting uninhabitable cells and, if a
///  reproduction map is given, accepting with probability
///  `reproduction / max_reproduction`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct KernelDispersalSampler {
    kernel: DispersalKernel,
    reproduction: Option<DemographicRateMap>,
}

impl KernelDispersalSampler {
    #[must_use]
    pub fn new(kernel: DispersalKernel, reproduction: Option<DemographicRateMap>) -> Self {
        Self {
            kernel,
            reproduction,
        }
    }

    #[must_use]
    pub fn kernel(&self) -> &DispersalKernel {
        &self.kernel
    }
}

#[contract_trait]
impl<G: RngCore> DispersalSampler<LandscapeGrid, G> for KernelDispersalSampler {
    #[must_use]
    fn sample_dispersal_from_location(
        &self,
        location: &WrappedLocation,
        habitat: &LandscapeGrid,
        generation: NonNegativeF64,
        rng: &mut G,
    ) -> WrappedLocation {
        let (origin_x, origin_y) = habitat.get_extent().absolute(location);

        loop {
            let (dx, dy) = self.kernel.sample_displacement(rng);

            let target = match habitat
                .wrap_absolute(origin_x.saturating_add(dx), origin_y.saturating_add(dy))
            {
                Some(target) if is_habitable(habitat, &target, generation) => target,
                _ => continue,
            };

            match &self.reproduction {
                None => return target,
                Some(reproduction) => {
                    if rng.sample_event(reproduction.relative_rate_at(&target)) {
                        return target;
                    }
                },
            }
        }
    }
}

mod clark2dt {
    /// Inverse of the radial CDF of Clark's 2Dt kernel with shape `u` and
    ///  tail `p`
    pub fn cdf_inverse(u01: f64, shape_u: f64, tail_p: f64) -> f64 {
        (shape_u * (pow_fast_one(1.0 / (1.0 - u01), 1.0 / tail_p) - 1.0)).sqrt()
    }

    #[allow(clippy::float_cmp)]
    fn pow_fast_one(x: f64, exp: f64) -> f64 {
        if exp == 1.0 {
            return x;
        }

        x.powf(exp)
    }
}
