use std::{collections::BTreeMap, fs};

use anyhow::{Context, Result};
use serde::Serialize;

use necsim_impls::record::SimulationRecord;
use necsim_species::{Community, CommunityCatalogue, CommunityParameters, RateApplicator};

use crate::args::{try_print, ApplyArgs, CommandArgs};

#[derive(Serialize)]
struct CommunitySummary<'c> {
    parameters: &'c CommunityParameters,
    richness: usize,
    abundances: BTreeMap<u64, u64>,
}

impl<'c> From<&'c Community> for CommunitySummary<'c> {
    fn from(community: &'c Community) -> Self {
        Self {
            parameters: community.parameters(),
            richness: community.richness(),
            abundances: community
                .abundances()
                .into_iter()
                .map(|(species, abundance)| (species.get(), abundance))
                .collect(),
        }
    }
}

#[allow(clippy::module_name_repetitions)]
pub fn apply_with_logger(apply_args: CommandArgs) -> Result<()> {
    let apply_args = ApplyArgs::try_parse(&apply_args)?;
    info!("Parsed apply arguments:\n{:#?}", apply_args);

    let record = SimulationRecord::load(&apply_args.record)?;
    let applicator = RateApplicator::new(&record)
        .with_context(|| format!("Cannot apply rates to {:?}.", apply_args.record))?;

    let mut catalogue = CommunityCatalogue::new();

    let references = apply_args
        .communities
        .iter()
        .map(|parameters| {
            catalogue
                .register(&applicator, parameters)
                .with_context(|| format!("Invalid community parameters {:?}.", parameters))
        })
        .collect::<Result<Vec<_>>>()?;

    catalogue.resolve(&applicator)?;

    let mut summaries = Vec::with_capacity(references.len());

    for reference in references {
        let community = catalogue
            .community(reference)
            .context("A registered community was not resolved.")?;

        info!(
            "Speciation rate {} resolves {} species.",
            community.parameters().speciation_rate,
            community.richness()
        );

        summaries.push(CommunitySummary::from(community));
    }

    if let Some(output) = &apply_args.output {
        fs::write(output, try_print(&summaries)?)
            .with_context(|| format!("Failed to write the communities to {:?}.", output))?;

        info!("Wrote {} communities to {:?}.", summaries.len(), output);
    }

    Ok(())
}
