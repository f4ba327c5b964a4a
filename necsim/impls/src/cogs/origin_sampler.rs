use necsim_core::{
    cogs::Habitat,
    landscape::{LandscapeExtent, Location, WrappedLocation},
};
use necsim_core_bond::NonNegativeF64;

use crate::{
    cogs::habitat::{LandscapeGrid, LandscapeMap},
    simulation::{SampleConfig, SetupError},
};

/// Lists the positions of all sampled individuals in row-major cell order.
///
/// A cell with `n` individuals inside the sample mask contributes
///  `floor(n * sample_size * mask)` individuals.
///
/// # Errors
///
/// Returns a `SetupError` if the mask does not fit inside the fine map, if
///  it contains values outside `[0.0, 1.0]`, or if nothing is sampled.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sample_origins(
    habitat: &LandscapeGrid,
    sample: &SampleConfig,
) -> Result<Vec<WrappedLocation>, SetupError> {
    let fine = habitat.geometry().fine();

    let mask = match &sample.mask {
        Some(mask) => mask.clone(),
        None => LandscapeMap::null(fine.width(), fine.height()).map_err(|source| {
            SetupError::MalformedMap {
                field: String::from("sample.mask"),
                source,
            }
        })?,
    };

    let fine_local = LandscapeExtent::new(0, 0, fine.width(), fine.height());
    let mask_extent = LandscapeExtent::new(
        sample.offset.x,
        sample.offset.y,
        mask.width(),
        mask.height(),
    );

    if !fine_local.encloses(&mask_extent) {
        return Err(SetupError::OutOfBounds {
            field: String::from("sample.mask"),
            container: "the fine map",
            x: sample.offset.x,
            y: sample.offset.y,
            width: mask.width(),
            height: mask.height(),
        });
    }

    if mask.max() > 1.0 {
        return Err(SetupError::InvalidProportion {
            field: String::from("sample.mask"),
            value: mask.max(),
        });
    }

    let mut origins = Vec::new();

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let location = WrappedLocation::unwrapped(Location::new(
                fine.x() + sample.offset.x + x,
                fine.y() + sample.offset.y + y,
            ));

            let individuals = habitat.get_individuals_at(&location, NonNegativeF64::zero());

            let sampled = (f64::from(individuals) * sample.sample_size.get() * mask.get(x, y)).floor()
                as u64;

            for _ in 0..sampled {
                origins.push(location);
            }
        }
    }

    if origins.is_empty() {
        return Err(SetupError::EmptySample);
    }

    debug!("Sampled {} individuals as lineage origins.", origins.len());

    Ok(origins)
}
