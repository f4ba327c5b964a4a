use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use structopt::StructOpt;

use necsim_impls::simulation::SimulationConfig;
use necsim_species::CommunityParameters;

mod parse;

pub use parse::try_print;

#[derive(Debug, StructOpt)]
#[allow(clippy::module_name_repetitions)]
pub enum RustcoalescenceArgs {
    /// Runs one simulation and stores its coalescence record
    Simulate(CommandArgs),
    /// Resolves communities from a stored simulation record
    Apply(CommandArgs),
    /// Rebuilds the coalescence tree of a record from its event log
    Replay(CommandArgs),
}

#[derive(Debug, StructOpt)]
#[allow(clippy::module_name_repetitions)]
pub struct CommandArgs {
    /// Path to the RON file with the subcommand arguments
    #[structopt(parse(from_os_str))]
    pub config: PathBuf,
}

impl CommandArgs {
    fn read(&self, subcommand: &str) -> Result<String> {
        fs::read_to_string(&self.config).with_context(|| {
            format!(
                "Failed to read the {} subcommand arguments from {:?}.",
                subcommand, self.config
            )
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct SimulateArgs {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub task: u64,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub event_log: Option<PathBuf>,
    #[serde(default)]
    pub progress: bool,
    pub simulation: SimulationConfig,
}

impl SimulateArgs {
    pub fn try_parse(command_args: &CommandArgs) -> Result<Self> {
        let ron_args = command_args.read("simulate")?;

        parse::try_parse("simulate", &ron_args)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct ApplyArgs {
    pub record: PathBuf,
    pub communities: Vec<CommunityParameters>,
    /// Writes the resolved species-abundance tables as RON if set
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ApplyArgs {
    pub fn try_parse(command_args: &CommandArgs) -> Result<Self> {
        let ron_args = command_args.read("apply")?;

        parse::try_parse("apply", &ron_args)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct ReplayArgs {
    pub record: PathBuf,
    pub event_log: PathBuf,
}

impl ReplayArgs {
    pub fn try_parse(command_args: &CommandArgs) -> Result<Self> {
        let ron_args = command_args.read("replay")?;

        parse::try_parse("replay", &ron_args)
    }
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::{parse::try_parse, ApplyArgs, SimulateArgs};

    #[test]
    fn parses_simulate_args() {
        let args: SimulateArgs = try_parse(
            "simulate",
            r#"(
                seed: 42,
                simulation: (
                    landscape: (fine: Null(width: 10, height: 10), deme: 2.0),
                    dispersal: Kernel(Normal(sigma: 1.5)),
                    speciation: (min_rate: 0.001, protracted: (min_generations: 2)),
                ),
            )"#,
        )
        .unwrap();

        assert_eq!(args.seed, 42);
        assert_eq!(args.task, 0);
        assert!(args.event_log.is_none());
        assert_eq!(
            args.simulation
                .speciation
                .protracted
                .unwrap()
                .max_generations,
            None
        );
    }

    #[test]
    fn reports_the_failing_field() {
        let err = try_parse::<SimulateArgs>(
            "simulate",
            r#"(
                simulation: (
                    landscape: (fine: Null(width: 10, height: 10), deme: -2.0),
                    dispersal: Kernel(Normal(sigma: 1.5)),
                    speciation: (min_rate: 0.001),
                ),
            )"#,
        )
        .unwrap_err();

        assert!(
            format!("{:?}", err).contains("simulation.landscape.deme"),
            "{:?}",
            err
        );
    }

    #[test]
    fn parses_apply_args() {
        let args: ApplyArgs = try_parse(
            "apply",
            r#"(
                record: "seed-42-task-0.necsim",
                communities: [
                    (speciation_rate: 0.01),
                    (speciation_rate: 0.1, metacommunity: External([(species: 1, abundance: 5)])),
                    (speciation_rate: 0.1, metacommunity: Auto(size: 1000, speciation_rate: 0.01)),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(args.communities.len(), 3);
        assert!(args.output.is_none());
    }
}
