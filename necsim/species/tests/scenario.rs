use necsim_core::reporter::NullReporter;
use necsim_core_bond::{PositiveF64, PositiveUnitF64};
use necsim_impls::{
    cogs::{dispersal_sampler::DispersalKernel, habitat::LandscapeMap},
    event_log::{recorder::EventLogRecorder, replay::EventLogReplay},
    record::SimulationRecord,
    simulation::{
        DispersalConfig, LandscapeConfig, Simulation, SimulationBudget, SimulationConfig,
        SimulationStatus, SpeciationConfig,
    },
    tree::CoalescenceTreeBuilder,
};
use necsim_species::{CommunityCatalogue, CommunityParameters, RateApplicator};

fn closed_landscape(width: u32, height: u32, sigma: f64, min_rate: f64) -> SimulationConfig {
    SimulationConfig {
        landscape: LandscapeConfig {
            fine: LandscapeMap::null(width, height).unwrap(),
            fine_offset: Default::default(),
            coarse: None,
            landscape_type: Default::default(),
            historical: Vec::new(),
            deme: PositiveF64::new(1.0).unwrap(),
        },
        sample: Default::default(),
        dispersal: DispersalConfig::Kernel(DispersalKernel::Normal {
            sigma: PositiveF64::new(sigma).unwrap(),
        }),
        reproduction: None,
        death: None,
        speciation: SpeciationConfig {
            min_rate: PositiveUnitF64::new(min_rate).unwrap(),
            protracted: None,
        },
    }
}

fn rate(rate: f64) -> CommunityParameters {
    CommunityParameters::new(PositiveUnitF64::new(rate).unwrap())
}

#[test]
fn species_richness_increases_with_the_speciation_rate() {
    let config = closed_landscape(100, 100, 2.0, 0.0001);

    let mut simulation: Simulation = Simulation::initialise(&config, 1, 0).unwrap();
    assert_eq!(
        simulation.simulate(SimulationBudget::unlimited(), &mut NullReporter),
        SimulationStatus::Done
    );

    let record = simulation.finalise();
    assert_eq!(record.tree().leaves(), 10_000);

    let applicator = RateApplicator::new(&record).unwrap();

    let communities = applicator
        .apply_all(&[rate(0.0001), rate(0.001), rate(0.01), rate(0.1)])
        .unwrap();

    let richness: Vec<usize> = communities.iter().map(|c| c.richness()).collect();

    assert!(richness[0] >= 1);
    assert!(
        richness.windows(2).all(|pair| pair[0] < pair[1]),
        "{:?}",
        richness
    );

    for community in &communities {
        assert_eq!(community.abundances().values().sum::<u64>(), 10_000);
    }
}

#[test]
fn stored_records_resolve_identical_communities() {
    let config = closed_landscape(12, 12, 1.5, 0.001);

    let mut simulation: Simulation = Simulation::initialise(&config, 5, 2).unwrap();
    simulation.simulate(SimulationBudget::unlimited(), &mut NullReporter);
    let record = simulation.finalise();

    let directory = tempfile::tempdir().unwrap();
    let path = record.save_to_directory(directory.path()).unwrap();
    let loaded = SimulationRecord::load(&path).unwrap();

    let original = RateApplicator::new(&record).unwrap();
    let reloaded = RateApplicator::new(&loaded).unwrap();

    assert_eq!(
        original.apply(&rate(0.01)).unwrap(),
        reloaded.apply(&rate(0.01)).unwrap()
    );
}

#[test]
fn event_logs_replay_into_the_same_tree() {
    let config = closed_landscape(10, 10, 1.0, 0.005);
    let directory = tempfile::tempdir().unwrap();

    let mut simulation: Simulation = Simulation::initialise(&config, 8, 1).unwrap();

    let mut recorder = EventLogRecorder::try_new(directory.path())
        .unwrap()
        .with_segment_size(256);
    simulation.simulate(SimulationBudget::unlimited(), &mut recorder);
    recorder.finish().unwrap();

    let record = simulation.finalise();

    let replay = EventLogReplay::try_new(directory.path()).unwrap();
    assert!(replay.segments().len() > 1);

    let origins: Vec<_> = record.tree().leaf_origins().copied().collect();
    let mut builder = CoalescenceTreeBuilder::new(&origins);
    replay.replay_into(&mut builder).unwrap();

    assert_eq!(&builder.build(), record.tree());
}

#[test]
fn catalogue_deduplicates_equivalent_requests() {
    let config = closed_landscape(8, 8, 1.0, 0.001);

    let mut simulation: Simulation = Simulation::initialise(&config, 3, 0).unwrap();
    simulation.simulate(SimulationBudget::unlimited(), &mut NullReporter);
    let record = simulation.finalise();

    let applicator = RateApplicator::new(&record).unwrap();
    let mut catalogue = CommunityCatalogue::new();

    let low = catalogue.register(&applicator, &rate(0.01)).unwrap();
    let high = catalogue.register(&applicator, &rate(0.1)).unwrap();
    let again = catalogue
        .register(
            &applicator,
            &rate(0.01).with_protracted(record.metadata().protracted),
        )
        .unwrap();

    assert_eq!(low, again);
    assert_ne!(low, high);
    assert_eq!(catalogue.len(), 2);
    assert!(catalogue.community(low).is_none());

    assert_eq!(catalogue.resolve(&applicator).unwrap(), 2);
    assert_eq!(catalogue.resolve(&applicator).unwrap(), 0);

    assert_eq!(
        catalogue.community(low),
        Some(&applicator.apply(&rate(0.01)).unwrap())
    );
    assert!(catalogue.register(&applicator, &rate(0.0001)).is_err());
}
