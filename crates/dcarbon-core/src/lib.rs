pub mod bonus;
pub mod commission;
pub mod directory;
pub mod error;
pub mod facility;
pub mod format;
pub mod group;
pub mod names;
pub mod payout;
pub mod pivot;
pub mod utility;

pub use bonus::{BonusGroup, BonusStructure, BonusType, group_bonuses, lookup_bonus};
pub use commission::{
    CommissionMode, CommissionStructure, CommissionTier, PropertyType, ShareField, sort_tiers,
};
pub use directory::{
    AccountStatus, DirectoryFilter, Installer, Listed, Page, PageRequest, Partner, PartnerType,
};
pub use error::ValidationError;
pub use facility::{
    DocumentChecklist, DocumentDecision, DocumentEntry, DocumentSlot, DocumentStatus, Facility,
    FacilityKind, FacilityStatus, RejectionReason,
};
pub use group::{GroupFacility, ResidentialGroup};
pub use payout::{PayoutRequest, PayoutStatus, PayoutSummary};
pub use pivot::{
    CommissionIndex, CommissionMatrix, CommissionRow, DeletePlan, DerivedTotal, ShareCell,
    TierCell, edit_target, plan_delete,
};
pub use utility::{
    AuthorizationStatus, GreenButtonRequest, RequestStatus, UtilityAuthorization,
    UtilityProvider, UtilityProviderRequest,
};
