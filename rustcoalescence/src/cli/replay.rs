use anyhow::Result;

use necsim_impls::{
    event_log::replay::EventLogReplay, record::SimulationRecord, tree::CoalescenceTreeBuilder,
};

use crate::args::{CommandArgs, ReplayArgs};

#[allow(clippy::module_name_repetitions)]
pub fn replay_with_logger(replay_args: CommandArgs) -> Result<()> {
    let replay_args = ReplayArgs::try_parse(&replay_args)?;
    info!("Parsed replay arguments:\n{:#?}", replay_args);

    let record = SimulationRecord::load(&replay_args.record)?;
    let event_log = EventLogReplay::try_new(&replay_args.event_log)?;

    info!(
        "Starting the event replay of {} segments ...",
        event_log.segments().len()
    );

    let origins: Vec<_> = record.tree().leaf_origins().copied().collect();
    let mut builder = CoalescenceTreeBuilder::new(&origins);

    let replayed = event_log.replay_into(&mut builder)?;

    anyhow::ensure!(
        &builder.build() == record.tree(),
        "The event log {:?} does not match the record {:?}.",
        replay_args.event_log,
        replay_args.record
    );

    info!(
        "The {} replayed events rebuild the coalescence tree of the record.",
        replayed
    );

    Ok(())
}
