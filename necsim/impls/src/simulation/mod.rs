use std::time::Instant;

use necsim_core::{
    cogs::{DispersalSampler, Habitat, PrimeableRng, RngSampler, SeedableRng},
    event::Event,
    lineage::LineageId,
    reporter::Reporter,
};
use necsim_core_bond::{NonNegativeF64, PositiveF64};

use crate::{
    cogs::{
        demography::DemographicRateMap, dispersal_sampler::LandscapeDispersalSampler,
        habitat::LandscapeGrid, lineage_store::LineagePool, origin_sampler::sample_origins,
        rng::wyhash::WyHash,
    },
    record::{SimulationMetadata, SimulationRecord},
    tree::CoalescenceTreeBuilder,
};

mod config;
mod error;

pub use config::{
    CoarseMapConfig, DispersalConfig, HistoricalMapConfig, LandscapeConfig, MapOffset,
    ProtractedBounds, RateMapConfig, SampleConfig, SimulationBudget, SimulationConfig,
    SpeciationConfig,
};
pub use error::{MapError, SetupError};

/// Per-individual turnover rate at a cell with unit death rate
const TURNOVER_RATE: f64 = 0.5;

/// Steps between wall-time budget checks
const WALL_TIME_CHECK_INTERVAL: u64 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SimulationStatus {
    /// At most one lineage remains active
    Done,
    /// The budget ran out, calling `simulate` again resumes the run
    Paused,
}

/// One backward-time coalescence run for a fixed `(seed, task)` pair
#[derive(Debug)]
pub struct Simulation<G: PrimeableRng = WyHash> {
    metadata: SimulationMetadata,
    habitat: LandscapeGrid,
    dispersal: LandscapeDispersalSampler,
    death: Option<DemographicRateMap>,
    pool: LineagePool,
    tree: CoalescenceTreeBuilder,
    rng: G,
    generation: NonNegativeF64,
    steps: u64,
}

impl<G: PrimeableRng> Simulation<G> {
    /// # Errors
    ///
    /// Returns a `SetupError` naming the offending configuration field if
    ///  the configuration is invalid.
    pub fn initialise(config: &SimulationConfig, seed: u64, task: u64) -> Result<Self, SetupError> {
        let protracted = config.speciation.protracted.unwrap_or_default();

        if let (false, Some(max)) = (protracted.is_consistent(), protracted.max_generations) {
            return Err(SetupError::InconsistentProtractedBounds {
                min: protracted.min_generations,
                max,
            });
        }

        let habitat = LandscapeGrid::new(&config.landscape)?;

        let reproduction = config
            .reproduction
            .as_ref()
            .map(|reproduction| DemographicRateMap::new("reproduction", reproduction, &habitat))
            .transpose()?;

        if let Some(generation) = reproduction
            .as_ref()
            .and_then(|reproduction| reproduction.find_generation_without_rate(&habitat))
        {
            return Err(SetupError::NoDispersalTarget {
                field: String::from("reproduction"),
                generation: generation.get(),
            });
        }

        let death = config
            .death
            .as_ref()
            .map(|death| DemographicRateMap::new("death", death, &habitat))
            .transpose()?;

        if let Some(location) = death
            .as_ref()
            .and_then(|death| death.find_zero_rate_habitat(&habitat))
        {
            return Err(SetupError::ZeroRateHabitat {
                field: String::from("death"),
                x: location.x(),
                y: location.y(),
            });
        }

        let dispersal = LandscapeDispersalSampler::new(&config.dispersal, &habitat, reproduction)?;

        let origins = sample_origins(&habitat, &config.sample)?;

        let mut rng = G::seed_from_u64(seed);
        rng.prime_with(task, 0);

        info!(
            "Initialised the simulation of seed {} task {} with {} lineages on {} individuals.",
            seed,
            task,
            origins.len(),
            habitat.get_total_individuals(NonNegativeF64::zero()),
        );

        Ok(Self {
            metadata: SimulationMetadata {
                seed,
                task,
                min_speciation_rate: config.speciation.min_rate,
                protracted,
            },
            habitat,
            dispersal,
            death,
            pool: LineagePool::new(&origins),
            tree: CoalescenceTreeBuilder::new(&origins),
            rng,
            generation: NonNegativeF64::zero(),
            steps: 0,
        })
    }

    #[must_use]
    pub fn metadata(&self) -> &SimulationMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn habitat(&self) -> &LandscapeGrid {
        &self.habitat
    }

    #[must_use]
    pub fn generation(&self) -> NonNegativeF64 {
        self.generation
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn number_active(&self) -> usize {
        self.pool.number_active()
    }

    /// Runs backward events until at most one lineage is active, or until
    ///  the `budget` is exhausted.
    pub fn simulate<R: Reporter>(
        &mut self,
        budget: SimulationBudget,
        reporter: &mut R,
    ) -> SimulationStatus {
        let start = Instant::now();
        let mut budget_steps = 0_u64;

        let status = loop {
            if self.pool.number_active() <= 1 {
                break SimulationStatus::Done;
            }

            if budget.max_steps.map_or(false, |max| budget_steps >= max) {
                break SimulationStatus::Paused;
            }

            if budget_steps % WALL_TIME_CHECK_INTERVAL == 0
                && budget
                    .max_wall_time
                    .map_or(false, |max| budget_steps > 0 && start.elapsed() >= max)
            {
                break SimulationStatus::Paused;
            }

            self.step(reporter);

            budget_steps += 1;
        };

        reporter.report_progress(self.pool.number_active() as u64);

        debug!(
            "Simulation {:?} after {} steps at generation {}.",
            status, self.steps, self.generation,
        );

        status
    }

    fn step<R: Reporter>(&mut self, reporter: &mut R) {
        let lineage = self.propose_death_lineage();
        let (age, origin) = {
            let lineage = self.pool.lineage(lineage);
            (lineage.age(), *lineage.location())
        };

        let draw = self.rng.sample_uniform_closed_open();

        self.emit(
            reporter,
            &Event::SpeciationDraw {
                generation: self.generation,
                lineage,
                age,
                draw,
            },
        );

        self.steps += 1;

        if self
            .metadata
            .protracted
            .speciates(self.metadata.min_speciation_rate, age, draw)
        {
            self.pool.speciate(lineage);
        } else {
            let target = self.dispersal.sample_dispersal_from_location(
                &origin,
                &self.habitat,
                self.generation,
                &mut self.rng,
            );

            self.pool.move_lineage(lineage, target);

            self.emit(
                reporter,
                &Event::Dispersal {
                    generation: self.generation,
                    lineage,
                    origin,
                    target,
                },
            );

            self.sample_coalescence(lineage, reporter);
        }

        reporter.report_progress(self.pool.number_active() as u64);
    }

    /// Picks the lineage of the next event, advancing the clock by the
    ///  waiting time of every (possibly rejected) proposal.
    ///
    /// Proposals arrive at the rate of a landscape where every cell has the
    ///  maximal death rate, and are thinned down to the local death rate.
    #[allow(clippy::cast_precision_loss)]
    fn propose_death_lineage(&mut self) -> LineageId {
        let max_death = self.death.as_ref().map_or(1.0, |death| death.max().get());

        let lambda = TURNOVER_RATE * max_death * (self.pool.number_active() as f64);

        // Safety: at least two lineages are active and the maximum is positive
        let lambda = unsafe { PositiveF64::new_unchecked(lambda) };

        loop {
            // Safety: exponential waiting times are non-negative
            self.generation += unsafe {
                NonNegativeF64::new_unchecked(self.rng.sample_exponential(lambda))
            };

            let candidate = self.pool.sample_active(&mut self.rng);

            match &self.death {
                None => return candidate,
                Some(death) => {
                    let acceptance =
                        death.relative_rate_at(self.pool.lineage(candidate).location());

                    if self.rng.sample_event(acceptance) {
                        return candidate;
                    }
                },
            }
        }
    }

    /// The mover is the last occupant of its deme, each of the deme's `n`
    ///  individual slots is equally likely to be its parent
    fn sample_coalescence<R: Reporter>(&mut self, mover: LineageId, reporter: &mut R) {
        let location = *self.pool.lineage(mover).location();

        let occupants = self.pool.occupants_at(&location);
        let others = &occupants[..occupants.len().saturating_sub(1)];

        let individuals = u64::from(
            self.habitat
                .get_individuals_at(&location, self.generation)
                .max(1),
        );

        let slot = self.rng.sample_index_u64(individuals);

        if let Some(other) = usize::try_from(slot)
            .ok()
            .and_then(|slot| others.get(slot).copied())
        {
            let parent = self.pool.coalesce(mover, other, self.generation);

            self.emit(
                reporter,
                &Event::Coalescence {
                    generation: self.generation,
                    children: [other, mover],
                    parent,
                    location,
                },
            );
        }
    }

    fn emit<R: Reporter>(&mut self, reporter: &mut R, event: &Event) {
        self.tree.report_event(event);
        reporter.report_event(event);
    }

    /// Ends the run and hands over its ancestry, even if it was paused
    #[must_use]
    pub fn finalise(self) -> SimulationRecord {
        if self.pool.number_active() > 1 {
            warn!(
                "Finalising an incomplete simulation with {} active lineages.",
                self.pool.number_active()
            );
        }

        info!(
            "The simulation finished at generation {} after {} steps.",
            self.generation, self.steps
        );

        SimulationRecord::new(self.metadata, self.generation, self.steps, self.tree.build())
    }
}
