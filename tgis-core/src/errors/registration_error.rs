/// Errors raised by the map registration workflow.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("map <{map_id}> is already registered in <{stds_id}>")]
    AlreadyRegistered { map_id: String, stds_id: String },

    #[error("map <{map_id}> is not registered in <{stds_id}>")]
    NotRegistered { map_id: String, stds_id: String },

    #[error("only maps from the same mapset can be registered: map mapset {map_mapset}, dataset mapset {stds_mapset}")]
    MapsetMismatch {
        map_mapset: String,
        stds_mapset: String,
    },

    #[error("a {stds_type} dataset cannot register {map_type} maps")]
    MapTypeMismatch { map_type: String, stds_type: String },
}
