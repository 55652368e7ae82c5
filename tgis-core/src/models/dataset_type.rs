//! Map and space-time dataset kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TgisError;

/// The three map kinds that can carry a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    Raster,
    Raster3d,
    Vector,
}

impl MapType {
    pub const ALL: [MapType; 3] = [MapType::Raster, MapType::Raster3d, MapType::Vector];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Raster => "raster",
            MapType::Raster3d => "raster3d",
            MapType::Vector => "vector",
        }
    }

    /// The space-time dataset kind that collects maps of this kind.
    pub fn stds_type(&self) -> StdsType {
        match self {
            MapType::Raster => StdsType::Strds,
            MapType::Raster3d => StdsType::Str3ds,
            MapType::Vector => StdsType::Stvds,
        }
    }
}

/// Space-time dataset kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdsType {
    Strds,
    Str3ds,
    Stvds,
}

impl StdsType {
    pub const ALL: [StdsType; 3] = [StdsType::Strds, StdsType::Str3ds, StdsType::Stvds];

    pub fn as_str(&self) -> &'static str {
        match self {
            StdsType::Strds => "strds",
            StdsType::Str3ds => "str3ds",
            StdsType::Stvds => "stvds",
        }
    }

    /// The map kind this dataset registers.
    pub fn map_type(&self) -> MapType {
        match self {
            StdsType::Strds => MapType::Raster,
            StdsType::Str3ds => MapType::Raster3d,
            StdsType::Stvds => MapType::Vector,
        }
    }
}

/// Any of the six dataset kinds. Each one owns its own family of tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetType {
    Map(MapType),
    Stds(StdsType),
}

impl DatasetType {
    pub const ALL: [DatasetType; 6] = [
        DatasetType::Map(MapType::Raster),
        DatasetType::Map(MapType::Raster3d),
        DatasetType::Map(MapType::Vector),
        DatasetType::Stds(StdsType::Strds),
        DatasetType::Stds(StdsType::Str3ds),
        DatasetType::Stds(StdsType::Stvds),
    ];

    /// Table name prefix, e.g. `raster` for `raster_base`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Map(m) => m.as_str(),
            DatasetType::Stds(s) => s.as_str(),
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, DatasetType::Map(_))
    }
}

impl From<MapType> for DatasetType {
    fn from(value: MapType) -> Self {
        DatasetType::Map(value)
    }
}

impl From<StdsType> for DatasetType {
    fn from(value: StdsType) -> Self {
        DatasetType::Stds(value)
    }
}

impl FromStr for MapType {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" | "rast" => Ok(MapType::Raster),
            "raster3d" | "rast3d" | "raster_3d" => Ok(MapType::Raster3d),
            "vector" | "vect" => Ok(MapType::Vector),
            other => Err(TgisError::InvalidType {
                type_name: other.to_string(),
            }),
        }
    }
}

impl FromStr for StdsType {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strds" => Ok(StdsType::Strds),
            "str3ds" => Ok(StdsType::Str3ds),
            "stvds" => Ok(StdsType::Stvds),
            other => Err(TgisError::InvalidType {
                type_name: other.to_string(),
            }),
        }
    }
}

impl FromStr for DatasetType {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<MapType>()
            .map(DatasetType::Map)
            .or_else(|_| s.parse::<StdsType>().map(DatasetType::Stds))
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StdsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
