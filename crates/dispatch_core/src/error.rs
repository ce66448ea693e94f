use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid ride request {ride_id}: {reason}")]
    InvalidRideRequest { ride_id: String, reason: String },

    #[error("invalid distribution config: {0}")]
    InvalidConfig(String),

    #[error("invalid document {id}: {reason}")]
    InvalidDocument { id: String, reason: String },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    pub(crate) fn invalid_ride(ride_id: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRideRequest {
            ride_id: ride_id.to_string(),
            reason: reason.into(),
        }
    }
}
