//! One trait per resource family, implemented by [`AdminClient`](crate::AdminClient).

mod bonus;
mod commission;
mod directory;
mod facility;
mod group;
mod notification;
mod payout;
mod utility;

pub use bonus::BonusApi;
pub use commission::CommissionApi;
pub use directory::DirectoryApi;
pub use facility::FacilityApi;
pub use group::GroupApi;
pub use notification::NotificationApi;
pub use payout::PayoutApi;
pub use utility::UtilityApi;
