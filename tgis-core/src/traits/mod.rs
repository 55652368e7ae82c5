mod temporal_database;

pub use temporal_database::ITemporalDatabase;
