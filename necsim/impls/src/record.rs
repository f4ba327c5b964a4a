use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use necsim_core_bond::{NonNegativeF64, PositiveUnitF64};

use crate::{simulation::ProtractedBounds, tree::CoalescenceTree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub seed: u64,
    pub task: u64,
    pub min_speciation_rate: PositiveUnitF64,
    pub protracted: ProtractedBounds,
}

/// The persisted outcome of one simulation run, from which communities
///  can be derived at any speciation rate above the simulated minimum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct SimulationRecord {
    metadata: SimulationMetadata,
    final_generation: NonNegativeF64,
    steps: u64,
    tree: CoalescenceTree,
}

impl SimulationRecord {
    #[must_use]
    pub fn new(
        metadata: SimulationMetadata,
        final_generation: NonNegativeF64,
        steps: u64,
        tree: CoalescenceTree,
    ) -> Self {
        Self {
            metadata,
            final_generation,
            steps,
            tree,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &SimulationMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn final_generation(&self) -> NonNegativeF64 {
        self.final_generation
    }

    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn tree(&self) -> &CoalescenceTree {
        &self.tree
    }

    #[must_use]
    pub fn file_name(seed: u64, task: u64) -> String {
        format!("seed-{}-task-{}.necsim", seed, task)
    }

    /// Writes the record into `directory` under its canonical file name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the record
    ///  cannot be written.
    pub fn save_to_directory(&self, directory: &Path) -> Result<PathBuf> {
        fs::create_dir_all(directory).with_context(|| {
            format!(
                "Failed to create the output directory {}.",
                directory.display()
            )
        })?;

        let path = directory.join(Self::file_name(self.metadata.seed, self.metadata.task));

        self.save(&path)?;

        Ok(path)
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be written to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create the record file {}.", path.display()))?;

        bincode::serialize_into(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write the record to {}.", path.display()))?;

        info!("Saved the simulation record to {:?}.", path);

        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `path` cannot be read or does not hold a record.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open the record file {}.", path.display()))?;

        let record: Self = bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("Failed to read a record from {}.", path.display()))?;

        debug!(
            "Loaded the record of seed {} task {} with {} tree nodes.",
            record.metadata.seed,
            record.metadata.task,
            record.tree.len()
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use necsim_core::{cogs::Habitat, landscape::Location, reporter::NullReporter};
    use necsim_core_bond::{PositiveF64, PositiveUnitF64};

    use super::SimulationRecord;
    use crate::{
        cogs::{dispersal_sampler::DispersalKernel, habitat::LandscapeMap},
        simulation::{
            DispersalConfig, LandscapeConfig, Simulation, SimulationBudget, SimulationConfig,
            SpeciationConfig,
        },
    };

    fn tiny_config() -> SimulationConfig {
        SimulationConfig {
            landscape: LandscapeConfig {
                fine: LandscapeMap::null(4, 4).unwrap(),
                fine_offset: Default::default(),
                coarse: None,
                landscape_type: Default::default(),
                historical: Vec::new(),
                deme: PositiveF64::new(1.0).unwrap(),
            },
            sample: Default::default(),
            dispersal: DispersalConfig::Kernel(DispersalKernel::Normal {
                sigma: PositiveF64::new(1.0).unwrap(),
            }),
            reproduction: None,
            death: None,
            speciation: SpeciationConfig {
                min_rate: PositiveUnitF64::new(0.01).unwrap(),
                protracted: None,
            },
        }
    }

    #[test]
    fn record_file_name() {
        assert_eq!(SimulationRecord::file_name(42, 7), "seed-42-task-7.necsim");
    }

    #[test]
    fn record_survives_disk() {
        let mut simulation: Simulation = Simulation::initialise(&tiny_config(), 42, 0).unwrap();
        assert!(
            simulation.habitat().get_extent().contains(&Location::new(3, 3)),
            "the landscape covers the null map"
        );
        simulation.simulate(SimulationBudget::unlimited(), &mut NullReporter);

        let record = simulation.finalise();

        let directory = tempfile::tempdir().unwrap();
        let path = record.save_to_directory(directory.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "seed-42-task-0.necsim");
        assert_eq!(SimulationRecord::load(&path).unwrap(), record);
    }

    #[test]
    fn loading_garbage_fails() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("garbage.necsim");
        std::fs::write(&path, b"not a record").unwrap();

        assert!(SimulationRecord::load(&path).is_err());
    }
}
