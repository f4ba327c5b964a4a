use crate::{array2d::Array2DError, cogs::habitat::LandscapeType};

/// Fatal configuration errors, detected before the event loop starts
#[derive(Debug, thiserror::Error, displaydoc::Display)]
#[allow(clippy::module_name_repetitions)]
pub enum SetupError {
    /// {field} is not a valid map: {source}
    MalformedMap {
        field: String,
        source: MapError,
    },
    /// {field} has dimensions {found_width}x{found_height} but {expected_width}x{expected_height} are required
    DimensionMismatch {
        field: String,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },
    /// {field} at offset ({x}, {y}) with dimensions {width}x{height} does not fit inside {container}
    OutOfBounds {
        field: String,
        container: &'static str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// {field} is given but the landscape has no coarse map
    UnexpectedMap { field: String },
    /// {field} must be positive
    NonPositive { field: String },
    /// {field} contains the value {value} which is not a proportion in [0.0, 1.0]
    InvalidProportion { field: String, value: f64 },
    /// {field} is adopted at generation {generation} which is not after its predecessor
    UnorderedHistoricalMaps { field: String, generation: f64 },
    /// {field} contains no individuals
    EmptyLandscape { field: String },
    /// the sample contains no individuals
    EmptySample,
    /// the maximum of {field} is zero
    ZeroMaximumRate { field: String },
    /// {field} is zero at the inhabited cell ({x}, {y})
    ZeroRateHabitat { field: String, x: u32, y: u32 },
    /// {field} leaves no cell to disperse into at generation {generation}
    NoDispersalTarget { field: String, generation: f64 },
    /// dispersal.Matrix requires a closed landscape without a coarse map, found a {landscape_type:?} landscape (coarse map: {has_coarse})
    IncompatibleLandscapeType {
        landscape_type: LandscapeType,
        has_coarse: bool,
    },
    /// dispersal.Matrix must be {expected}x{expected} for a landscape of {expected} cells, found {found_width}x{found_height}
    DispersalMatrixDimension {
        expected: u64,
        found_width: u32,
        found_height: u32,
    },
    /// dispersal.Matrix row {row} has no dispersal weight towards a cell that is habitable at generation {generation}
    DispersalMatrixDeadEnd { row: usize, generation: f64 },
    /// speciation.protracted has min_generations {min} greater than max_generations {max}
    InconsistentProtractedBounds { min: u64, max: u64 },
}

/// Errors when interpreting a grid of values as a landscape map
#[derive(Debug, thiserror::Error, displaydoc::Display)]
#[allow(clippy::module_name_repetitions)]
pub enum MapError {
    /// {0}
    Shape(#[from] Array2DError),
    /// the map dimensions must be non-zero
    ZeroDimension,
    /// the map is too large for 32 bit dimensions
    TooLarge,
    /// the value {value} at ({x}, {y}) is negative or not finite
    InvalidValue { x: usize, y: usize, value: f64 },
}
