//! In-memory API and UI doubles for screen tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use dcarbon_api::{
    ApiError, BonusApi, CommissionApi, DirectoryApi, FacilityApi, GroupApi, NotificationApi,
    PayoutApi, UtilityApi,
};
use dcarbon_core::{
    BonusStructure, CommissionMode, CommissionStructure, CommissionTier, DocumentDecision,
    Facility, FacilityKind, FacilityStatus, GreenButtonRequest, Installer, Page, PageRequest,
    Partner, PayoutRequest, PayoutStatus, PropertyType, RejectionReason, RequestStatus,
    ResidentialGroup, UtilityAuthorization, UtilityProvider, UtilityProviderRequest,
    ValidationError,
};
use serde_json::Value;

use crate::{Confirm, Notifier, ScreenError, Ui};

/// The validation failure inside a screen error.
pub fn invalid(err: ScreenError) -> ValidationError {
    let ScreenError::Invalid(e) = err else {
        panic!("expected a validation error, got {err:?}");
    };
    e
}

#[derive(Default)]
pub struct FakeState {
    pub tiers: Vec<CommissionTier>,
    pub structures: Vec<CommissionStructure>,
    pub bonuses: Vec<BonusStructure>,
    pub payouts: Vec<PayoutRequest>,
    pub groups: Vec<ResidentialGroup>,
    pub facilities: HashMap<String, Facility>,
    pub partners: Vec<Partner>,
    pub installers: Vec<Installer>,
    pub providers: Vec<UtilityProvider>,
    pub provider_requests: Vec<UtilityProviderRequest>,
    pub authorizations: Vec<UtilityAuthorization>,
    pub unread: u64,
}

/// Records every call as `"method"` or `"method:arg"` and serves `state`.
#[derive(Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: Mutex<u32>,
}

impl FakeApi {
    pub fn with_state(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Default::default()
        }
    }

    /// Make `method` answer with a 500 from now on.
    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn heal(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == method || c.starts_with(&format!("{method}:")))
            .collect()
    }

    fn call(&self, method: &'static str, arg: &str) -> Result<(), ApiError> {
        let entry = if arg.is_empty() {
            method.to_string()
        } else {
            format!("{method}:{arg}")
        };
        self.calls.lock().unwrap().push(entry);
        if self.failing.lock().unwrap().contains(method) {
            return Err(ApiError::Server {
                status: 500,
                message: "Internal Server Error".into(),
            });
        }
        Ok(())
    }

    fn new_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{prefix}-{next}")
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("{id} not found"),
    }
}

#[async_trait]
impl CommissionApi for FakeApi {
    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, ApiError> {
        self.call("list_tiers", "")?;
        Ok(self.with(|s| s.tiers.clone()))
    }

    async fn create_tier(&self, tier: &CommissionTier) -> Result<CommissionTier, ApiError> {
        self.call("create_tier", &tier.label)?;
        let mut created = tier.clone();
        created.id = self.new_id("tier");
        self.with(|s| s.tiers.push(created.clone()));
        Ok(created)
    }

    async fn update_tier(
        &self,
        id: &str,
        tier: &CommissionTier,
    ) -> Result<CommissionTier, ApiError> {
        self.call("update_tier", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .tiers
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = CommissionTier {
                id: id.to_string(),
                ..tier.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_tier(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_tier", id)?;
        self.with(|s| s.tiers.retain(|t| t.id != id));
        Ok(())
    }

    async fn list_structures(&self) -> Result<Vec<CommissionStructure>, ApiError> {
        self.call("list_structures", "")?;
        Ok(self.with(|s| s.structures.clone()))
    }

    async fn filter_structures(
        &self,
        mode: Option<CommissionMode>,
        property_type: Option<PropertyType>,
    ) -> Result<Vec<CommissionStructure>, ApiError> {
        self.call("filter_structures", "")?;
        Ok(self.with(|s| {
            s.structures
                .iter()
                .filter(|r| mode.is_none_or(|m| r.mode == m))
                .filter(|r| property_type.is_none_or(|p| r.property_type == p))
                .cloned()
                .collect()
        }))
    }

    async fn create_structure(
        &self,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError> {
        self.call("create_structure", &structure.tier_id)?;
        let mut created = structure.clone();
        created.id = self.new_id("cs");
        self.with(|s| s.structures.push(created.clone()));
        Ok(created)
    }

    async fn update_structure(
        &self,
        id: &str,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError> {
        self.call("update_structure", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .structures
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = CommissionStructure {
                id: id.to_string(),
                ..structure.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_structure(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_structure", id)?;
        self.with(|s| s.structures.retain(|r| r.id != id));
        Ok(())
    }
}

#[async_trait]
impl BonusApi for FakeApi {
    async fn list_bonuses(&self) -> Result<Vec<BonusStructure>, ApiError> {
        self.call("list_bonuses", "")?;
        Ok(self.with(|s| s.bonuses.clone()))
    }

    async fn create_bonus(&self, bonus: &BonusStructure) -> Result<BonusStructure, ApiError> {
        self.call("create_bonus", "")?;
        let mut created = bonus.clone();
        created.id = self.new_id("bonus");
        self.with(|s| s.bonuses.push(created.clone()));
        Ok(created)
    }

    async fn update_bonus(
        &self,
        id: &str,
        bonus: &BonusStructure,
    ) -> Result<BonusStructure, ApiError> {
        self.call("update_bonus", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .bonuses
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = BonusStructure {
                id: id.to_string(),
                ..bonus.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_bonus(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_bonus", id)?;
        self.with(|s| s.bonuses.retain(|b| b.id != id));
        Ok(())
    }
}

#[async_trait]
impl PayoutApi for FakeApi {
    async fn list_payouts(
        &self,
        status: Option<PayoutStatus>,
    ) -> Result<Vec<PayoutRequest>, ApiError> {
        let filter = status.map(|s| s.to_string()).unwrap_or_default();
        self.call("list_payouts", &filter)?;
        Ok(self.with(|s| {
            s.payouts
                .iter()
                .filter(|p| status.is_none_or(|st| p.status == st))
                .cloned()
                .collect()
        }))
    }

    async fn get_payout(&self, id: &str) -> Result<PayoutRequest, ApiError> {
        self.call("get_payout", id)?;
        self.with(|s| {
            s.payouts
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn approve_payout(&self, id: &str) -> Result<PayoutRequest, ApiError> {
        self.call("approve_payout", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let p = s
                .payouts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(id))?;
            p.status = PayoutStatus::Paid;
            Ok(p.clone())
        })
    }

    async fn reject_payout(
        &self,
        id: &str,
        reason: &RejectionReason,
    ) -> Result<PayoutRequest, ApiError> {
        self.call("reject_payout", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let p = s
                .payouts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(id))?;
            p.status = PayoutStatus::Rejected;
            p.rejection_reason = Some(reason.as_str().to_string());
            Ok(p.clone())
        })
    }
}

#[async_trait]
impl GroupApi for FakeApi {
    async fn list_groups(&self) -> Result<Vec<ResidentialGroup>, ApiError> {
        self.call("list_groups", "")?;
        Ok(self.with(|s| s.groups.clone()))
    }

    async fn get_group(&self, id: &str) -> Result<ResidentialGroup, ApiError> {
        self.call("get_group", id)?;
        self.with(|s| {
            s.groups
                .iter()
                .find(|g| g.id == id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn create_group(&self, group: &ResidentialGroup) -> Result<ResidentialGroup, ApiError> {
        self.call("create_group", &group.name)?;
        let mut created = group.clone();
        created.id = self.new_id("group");
        self.with(|s| s.groups.push(created.clone()));
        Ok(created)
    }

    async fn update_group(
        &self,
        id: &str,
        group: &ResidentialGroup,
    ) -> Result<ResidentialGroup, ApiError> {
        self.call("update_group", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| not_found(id))?;
            slot.name = group.name.clone();
            slot.wregis_id = group.wregis_id.clone();
            slot.dcarbon_id = group.dcarbon_id.clone();
            Ok(slot.clone())
        })
    }

    async fn delete_group(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_group", id)?;
        self.with(|s| s.groups.retain(|g| g.id != id));
        Ok(())
    }

    async fn add_group_facilities(
        &self,
        id: &str,
        facility_ids: &[String],
    ) -> Result<ResidentialGroup, ApiError> {
        self.call("add_group_facilities", &facility_ids.join(","))?;
        self.with(|s| -> Result<_, ApiError> {
            let group = s
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| not_found(id))?;
            for fid in facility_ids {
                group.facilities.push(dcarbon_core::GroupFacility {
                    id: fid.clone(),
                    name: format!("Facility {fid}"),
                    system_capacity: Some(5.0),
                    address: None,
                });
            }
            Ok(group.clone())
        })
    }

    async fn remove_group_facility(&self, id: &str, facility_id: &str) -> Result<(), ApiError> {
        self.call("remove_group_facility", facility_id)?;
        self.with(|s| -> Result<_, ApiError> {
            let group = s
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| not_found(id))?;
            group.facilities.retain(|f| f.id != facility_id);
            Ok(())
        })
    }
}

#[async_trait]
impl FacilityApi for FakeApi {
    async fn get_facility(&self, _kind: FacilityKind, id: &str) -> Result<Facility, ApiError> {
        self.call("get_facility", id)?;
        self.with(|s| {
            s.facilities.get(id).cloned().ok_or_else(|| not_found(id))
        })
    }

    async fn update_document_status(
        &self,
        _kind: FacilityKind,
        id: &str,
        slot_key: &str,
        decision: &DocumentDecision,
    ) -> Result<(), ApiError> {
        self.call("update_document_status", slot_key)?;
        self.with(|s| -> Result<_, ApiError> {
            let facility = s.facilities.get_mut(id).ok_or_else(|| not_found(id))?;
            facility.fields.insert(
                format!("{slot_key}Status"),
                serde_json::to_value(decision.status)?,
            );
            if let Some(reason) = &decision.rejection_reason {
                facility.fields.insert(
                    format!("{slot_key}RejectionReason"),
                    Value::String(reason.as_str().to_string()),
                );
            }
            Ok(())
        })
    }

    async fn verify_facility(&self, _kind: FacilityKind, id: &str) -> Result<Facility, ApiError> {
        self.call("verify_facility", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let facility = s.facilities.get_mut(id).ok_or_else(|| not_found(id))?;
            facility.status = FacilityStatus::Verified;
            Ok(facility.clone())
        })
    }
}

fn page_of<T: Clone>(items: &[T], req: PageRequest) -> Page<T> {
    let limit = req.limit.max(1) as usize;
    let start = (req.page.max(1) as usize - 1) * limit;
    Page {
        items: items.iter().skip(start).take(limit).cloned().collect(),
        total: items.len() as u64,
        page: req.page.max(1),
        limit: limit as u32,
        total_pages: items.len().div_ceil(limit) as u32,
    }
}

#[async_trait]
impl DirectoryApi for FakeApi {
    async fn list_partners(&self, page: PageRequest) -> Result<Page<Partner>, ApiError> {
        self.call("list_partners", &page.query())?;
        Ok(self.with(|s| page_of(&s.partners, page)))
    }

    async fn create_partner(&self, partner: &Partner) -> Result<Partner, ApiError> {
        self.call("create_partner", &partner.name)?;
        let mut created = partner.clone();
        created.id = self.new_id("partner");
        self.with(|s| s.partners.push(created.clone()));
        Ok(created)
    }

    async fn update_partner(&self, id: &str, partner: &Partner) -> Result<Partner, ApiError> {
        self.call("update_partner", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .partners
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = Partner {
                id: id.to_string(),
                ..partner.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_partner(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_partner", id)?;
        self.with(|s| s.partners.retain(|p| p.id != id));
        Ok(())
    }

    async fn list_installers(&self, page: PageRequest) -> Result<Page<Installer>, ApiError> {
        self.call("list_installers", &page.query())?;
        Ok(self.with(|s| page_of(&s.installers, page)))
    }

    async fn create_installer(&self, installer: &Installer) -> Result<Installer, ApiError> {
        self.call("create_installer", &installer.name)?;
        let mut created = installer.clone();
        created.id = self.new_id("installer");
        self.with(|s| s.installers.push(created.clone()));
        Ok(created)
    }

    async fn update_installer(
        &self,
        id: &str,
        installer: &Installer,
    ) -> Result<Installer, ApiError> {
        self.call("update_installer", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .installers
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = Installer {
                id: id.to_string(),
                ..installer.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_installer(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_installer", id)?;
        self.with(|s| s.installers.retain(|i| i.id != id));
        Ok(())
    }
}

#[async_trait]
impl UtilityApi for FakeApi {
    async fn list_providers(&self) -> Result<Vec<UtilityProvider>, ApiError> {
        self.call("list_providers", "")?;
        Ok(self.with(|s| s.providers.clone()))
    }

    async fn create_provider(
        &self,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError> {
        self.call("create_provider", &provider.name)?;
        let mut created = provider.clone();
        created.id = self.new_id("provider");
        self.with(|s| s.providers.push(created.clone()));
        Ok(created)
    }

    async fn update_provider(
        &self,
        id: &str,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError> {
        self.call("update_provider", id)?;
        self.with(|s| -> Result<_, ApiError> {
            let slot = s
                .providers
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(id))?;
            *slot = UtilityProvider {
                id: id.to_string(),
                ..provider.clone()
            };
            Ok(slot.clone())
        })
    }

    async fn delete_provider(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_provider", id)?;
        self.with(|s| s.providers.retain(|p| p.id != id));
        Ok(())
    }

    async fn list_provider_requests(&self) -> Result<Vec<UtilityProviderRequest>, ApiError> {
        self.call("list_provider_requests", "")?;
        Ok(self.with(|s| s.provider_requests.clone()))
    }

    async fn approve_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError> {
        self.call("approve_provider_request", id)?;
        self.set_request_status(id, RequestStatus::Approved)
    }

    async fn reject_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError> {
        self.call("reject_provider_request", id)?;
        self.set_request_status(id, RequestStatus::Rejected)
    }

    async fn list_authorizations(&self) -> Result<Vec<UtilityAuthorization>, ApiError> {
        self.call("list_authorizations", "")?;
        Ok(self.with(|s| s.authorizations.clone()))
    }

    async fn get_authorization(&self, id: &str) -> Result<UtilityAuthorization, ApiError> {
        self.call("get_authorization", id)?;
        self.with(|s| -> Result<_, ApiError> {
            s.authorizations
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn delete_authorization(&self, id: &str) -> Result<(), ApiError> {
        self.call("delete_authorization", id)?;
        self.with(|s| s.authorizations.retain(|a| a.id != id));
        Ok(())
    }

    async fn start_green_button(
        &self,
        request: &GreenButtonRequest,
    ) -> Result<UtilityAuthorization, ApiError> {
        self.call("start_green_button", &request.customer_email)?;
        let auth = UtilityAuthorization {
            id: self.new_id("auth"),
            customer_email: request.customer_email.clone(),
            utility: request.utility.clone(),
            status: dcarbon_core::AuthorizationStatus::Pending,
            authorization_url: None,
            created_at: None,
        };
        self.with(|s| s.authorizations.push(auth.clone()));
        Ok(auth)
    }
}

impl FakeApi {
    fn set_request_status(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<UtilityProviderRequest, ApiError> {
        self.with(|s| -> Result<_, ApiError> {
            let r = s
                .provider_requests
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| not_found(id))?;
            r.status = status;
            Ok(r.clone())
        })
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn unread_count(&self) -> Result<u64, ApiError> {
        self.call("unread_count", "")?;
        Ok(self.with(|s| s.unread))
    }
}

/// Scripted confirmation answers plus a record of prompts and toasts.
pub struct TestUi {
    answer: bool,
    pub prompts: Mutex<Vec<String>>,
    pub toasts: Mutex<Vec<(bool, String)>>,
}

impl TestUi {
    pub fn answering(answer: bool) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
            toasts: Mutex::new(Vec::new()),
        })
    }

    pub fn ui(self: &std::sync::Arc<Self>) -> Ui {
        Ui::from_arcs(self.clone(), self.clone())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .filter(|(ok, _)| !ok)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .filter(|(ok, _)| *ok)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Confirm for TestUi {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

impl Notifier for TestUi {
    fn success(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push((true, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push((false, message.to_string()));
    }
}
