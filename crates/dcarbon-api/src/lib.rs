//! HTTP client for the DCarbon services REST API.
//!
//! Every call reads the bearer token from the [`Session`] it was built with,
//! unwraps the `{status, message, data}` envelope, and maps failures onto
//! [`ApiError`]. Resource families are exposed as traits so screens can be
//! driven by any implementation.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod poll;
pub mod resources;
pub mod session;

pub use client::AdminClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, GENERIC_ERROR_MESSAGE};
pub use poll::{POLL_INTERVAL, PollEvent, Subscription, subscribe, subscribe_until};
pub use resources::{
    BonusApi, CommissionApi, DirectoryApi, FacilityApi, GroupApi, NotificationApi, PayoutApi,
    UtilityApi,
};
pub use session::{FileToken, Session, StaticToken, TokenProvider};
