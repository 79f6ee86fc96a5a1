use dcarbon_api::ApiError;
use dcarbon_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("action cancelled")]
    Declined,

    #[error("{0} has not been loaded")]
    NotLoaded(&'static str),
}
