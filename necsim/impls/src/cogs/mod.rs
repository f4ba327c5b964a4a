pub mod demography;
pub mod dispersal_sampler;
pub mod habitat;
pub mod lineage_store;
pub mod origin_sampler;
pub mod rng;
