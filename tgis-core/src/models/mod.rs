mod dataset;
mod dataset_type;
mod identifier;
mod metadata;
mod spatial_extent;
mod temporal_extent;
mod temporal_relation;

pub use dataset::{
    DatasetBase, MapDataset, SpaceTimeDataset, StdsDerived, TemporalRange, TimelineEntry,
};
pub use dataset_type::{DatasetType, MapType, StdsType};
pub use identifier::DatasetId;
pub use metadata::{MapMetadata, Raster3dMetadata, RasterMetadata, VectorMetadata};
pub use spatial_extent::{Projection, SpatialExtent};
pub use temporal_extent::{
    AbsoluteTime, RelativeTime, TemporalExtent, TemporalType, TimeAssignment, TimePoint,
};
pub use temporal_relation::TemporalRelation;
