use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use necsim_core::landscape::{LandscapeExtent, Location};

use crate::{array2d::Array2D, simulation::MapError};

/// Serialised form of a [`LandscapeMap`]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum MapConfig {
    /// Uniform value 1.0 with explicit dimensions
    Null { width: u32, height: u32 },
    /// Row-major grid of non-negative values
    Grid(Vec<Vec<f64>>),
}

/// A two-dimensional grid of non-negative values at fine or coarse
///  resolution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MapConfig", into = "MapConfig")]
pub enum LandscapeMap {
    Null {
        width: u32,
        height: u32,
    },
    Grid {
        values: Array2D<f64>,
        width: u32,
        height: u32,
        max: f64,
    },
}

impl TryFrom<MapConfig> for LandscapeMap {
    type Error = MapError;

    fn try_from(config: MapConfig) -> Result<Self, Self::Error> {
        match config {
            MapConfig::Null { width, height } => Self::null(width, height),
            MapConfig::Grid(rows) => Self::from_rows(&rows),
        }
    }
}

impl From<LandscapeMap> for MapConfig {
    fn from(map: LandscapeMap) -> Self {
        match map {
            LandscapeMap::Null { width, height } => Self::Null { width, height },
            LandscapeMap::Grid { values, .. } => Self::Grid(values.as_rows()),
        }
    }
}

impl LandscapeMap {
    /// # Errors
    ///
    /// Returns `MapError::ZeroDimension` if `width` or `height` is zero.
    pub fn null(width: u32, height: u32) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::ZeroDimension);
        }

        Ok(Self::Null { width, height })
    }

    /// # Errors
    ///
    /// Returns a `MapError` if `rows` is ragged, empty, too large, or
    ///  contains negative or non-finite values.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MapError> {
        let values = Array2D::from_rows(rows)?;

        let width = u32::try_from(values.num_columns()).map_err(|_| MapError::TooLarge)?;
        let height = u32::try_from(values.num_rows()).map_err(|_| MapError::TooLarge)?;

        let mut max = 0.0_f64;

        for (y, row) in rows.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(MapError::InvalidValue {
                        x,
                        y,
                        value: *value,
                    });
                }

                max = max.max(*value);
            }
        }

        Ok(Self::Grid {
            values,
            width,
            height,
            max,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Null { width, .. } | Self::Grid { width, .. } => *width,
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        match self {
            Self::Null { height, .. } | Self::Grid { height, .. } => *height,
        }
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        match self {
            Self::Null { .. } => 1.0,
            Self::Grid { max, .. } => *max,
        }
    }

    /// Reads the value at map-local coordinates, zero outside of the map
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        match self {
            Self::Null { width, height } => {
                if x < *width && y < *height {
                    1.0
                } else {
                    0.0
                }
            },
            Self::Grid { values, .. } => values.get(y as usize, x as usize).copied().unwrap_or(0.0),
        }
    }

    #[must_use]
    pub fn has_dimensions(&self, other: &Self) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }
}

/// Placement of the fine and coarse maps on the fine-resolution grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGeometry {
    grid: LandscapeExtent,
    fine: LandscapeExtent,
    coarse_scale: u32,
}

impl MapGeometry {
    #[must_use]
    #[debug_requires(grid.encloses(&fine), "the fine map lies inside the grid")]
    #[debug_requires(coarse_scale > 0, "the coarse scale is positive")]
    pub fn new(grid: LandscapeExtent, fine: LandscapeExtent, coarse_scale: u32) -> Self {
        Self {
            grid,
            fine,
            coarse_scale,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &LandscapeExtent {
        &self.grid
    }

    #[must_use]
    pub fn fine(&self) -> &LandscapeExtent {
        &self.fine
    }

    #[must_use]
    pub fn coarse_scale(&self) -> u32 {
        self.coarse_scale
    }
}

/// A fine map with an optional coarse map behind it
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayers {
    fine: LandscapeMap,
    coarse: Option<LandscapeMap>,
}

impl MapLayers {
    #[must_use]
    pub fn new(fine: LandscapeMap, coarse: Option<LandscapeMap>) -> Self {
        Self { fine, coarse }
    }

    #[must_use]
    pub fn fine(&self) -> &LandscapeMap {
        &self.fine
    }

    #[must_use]
    pub fn coarse(&self) -> Option<&LandscapeMap> {
        self.coarse.as_ref()
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.coarse
            .as_ref()
            .map_or(self.fine.max(), |coarse| coarse.max().max(self.fine.max()))
    }

    /// Reads the value at a grid `location`: the fine map inside its
    ///  extent, the coarse map elsewhere, or `fallback` without a coarse map
    #[must_use]
    pub fn value_at(&self, geometry: &MapGeometry, location: &Location, fallback: f64) -> f64 {
        if geometry.fine.contains(location) {
            self.fine.get(
                location.x() - geometry.fine.x(),
                location.y() - geometry.fine.y(),
            )
        } else if let Some(coarse) = &self.coarse {
            coarse.get(
                location.x() / geometry.coarse_scale,
                location.y() / geometry.coarse_scale,
            )
        } else {
            fallback
        }
    }
}
