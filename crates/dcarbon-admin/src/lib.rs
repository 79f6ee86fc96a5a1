//! Admin screen controllers.
//!
//! A screen owns the state one admin page shows: the loaded records, the
//! last load error, and its view mode. Operations fetch from or mutate the
//! API, ask [`Confirm`] before destructive actions, and report outcomes
//! through [`Notifier`]. Rendering is left to the front end.

pub mod bonus;
pub mod commission;
pub mod directory;
pub mod error;
pub mod facility;
pub mod group;
pub mod notification;
pub mod payout;
pub mod state;
pub mod ui;
pub mod utility;

#[cfg(test)]
mod testing;

pub use bonus::BonusScreen;
pub use commission::CommissionScreen;
pub use directory::{DirectoryState, InstallerScreen, PartnerScreen};
pub use error::ScreenError;
pub use facility::FacilityReviewScreen;
pub use group::{GroupScreen, GroupView};
pub use notification::NotificationBadge;
pub use payout::{PayoutScreen, PayoutView};
pub use state::Loadable;
pub use ui::{AssumeYes, Confirm, LogNotifier, Notifier, Ui};
pub use utility::{UtilityAuthScreen, UtilityProviderScreen};
