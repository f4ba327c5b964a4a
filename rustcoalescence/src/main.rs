#![deny(clippy::pedantic)]

#[macro_use]
extern crate log;

use anyhow::Result;
use log::LevelFilter;
use structopt::StructOpt;

mod args;
mod cli;
mod minimal_logger;

use args::RustcoalescenceArgs;
use minimal_logger::MinimalLogger;

static MINIMAL_LOGGER: MinimalLogger = MinimalLogger;

fn main() -> Result<()> {
    log::set_logger(&MINIMAL_LOGGER)?;
    log::set_max_level(LevelFilter::Info);

    match RustcoalescenceArgs::from_args() {
        RustcoalescenceArgs::Simulate(simulate_args) => cli::simulate::simulate_with_logger(simulate_args),
        RustcoalescenceArgs::Apply(apply_args) => cli::apply::apply_with_logger(apply_args),
        RustcoalescenceArgs::Replay(replay_args) => cli::replay::replay_with_logger(replay_args),
    }
}
