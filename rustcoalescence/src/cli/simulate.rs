use anyhow::{Context, Result};

use necsim_core::{event::Event, reporter::Reporter, ReporterGroup, ReporterUnGroup};
use necsim_impls::{
    event_log::recorder::EventLogRecorder,
    reporter::{ExecutionTimeReporter, ProgressReporter},
    simulation::{Simulation, SimulationBudget, SimulationStatus},
};

use crate::args::{CommandArgs, SimulateArgs};

#[allow(clippy::module_name_repetitions)]
pub fn simulate_with_logger(simulate_args: CommandArgs) -> Result<()> {
    let simulate_args = SimulateArgs::try_parse(&simulate_args)?;
    info!("Parsed simulation arguments:\n{:#?}", simulate_args);

    let mut simulation: Simulation =
        Simulation::initialise(&simulate_args.simulation, simulate_args.seed, simulate_args.task)
            .context("Failed to set up the simulation.")?;

    let mut event_log = OptionalReporter(
        simulate_args
            .event_log
            .as_deref()
            .map(EventLogRecorder::try_new)
            .transpose()
            .context("Failed to create the event log.")?,
    );
    let mut execution_time = ExecutionTimeReporter::default();
    let mut progress = OptionalReporter(simulate_args.progress.then(ProgressReporter::default));

    info!("Starting the simulation ...");

    let mut reporter = ReporterGroup![event_log, execution_time, progress];

    let status = simulation.simulate(SimulationBudget::unlimited(), &mut reporter);

    ReporterUnGroup! {reporter => [event_log, execution_time, progress]};

    if let Some(progress) = progress.0 {
        progress.finish();
    }

    if let Some(event_log) = event_log.0 {
        let directory = event_log.directory().to_owned();

        event_log
            .finish()
            .with_context(|| format!("Failed to write the event log to {:?}.", directory))?;
    }

    if let Some(execution_time) = execution_time.execution_time() {
        info!(
            "The simulation took:\n - initialisation: {}s\n - execution: {}s\n - cleanup: {}s",
            execution_time.initialisation.as_secs_f32(),
            execution_time.execution.as_secs_f32(),
            execution_time.cleanup.as_secs_f32()
        );
    }

    anyhow::ensure!(
        status == SimulationStatus::Done,
        "The simulation did not run to completion."
    );

    let record = simulation.finalise();

    info!(
        "The simulation finished at generation {} after {} steps with {} tree nodes.",
        record.final_generation(),
        record.steps(),
        record.tree().len()
    );

    record.save_to_directory(&simulate_args.output)?;

    Ok(())
}

/// Forwards to the inner reporter if there is one
struct OptionalReporter<R: Reporter>(Option<R>);

impl<R: Reporter> Reporter for OptionalReporter<R> {
    fn report_event(&mut self, event: &Event) {
        if let Some(reporter) = &mut self.0 {
            reporter.report_event(event);
        }
    }

    fn report_progress(&mut self, remaining: u64) {
        if let Some(reporter) = &mut self.0 {
            reporter.report_progress(remaining);
        }
    }
}
