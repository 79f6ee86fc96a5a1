use async_trait::async_trait;
use dcarbon_core::{DocumentDecision, Facility, FacilityKind};
use serde_json::json;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait FacilityApi: Send + Sync {
    async fn get_facility(&self, kind: FacilityKind, id: &str) -> Result<Facility, ApiError>;
    /// PUT the decision for one document slot, e.g. `financeAgreement`.
    async fn update_document_status(
        &self,
        kind: FacilityKind,
        id: &str,
        slot_key: &str,
        decision: &DocumentDecision,
    ) -> Result<(), ApiError>;
    async fn verify_facility(&self, kind: FacilityKind, id: &str) -> Result<Facility, ApiError>;
}

#[async_trait]
impl FacilityApi for AdminClient {
    async fn get_facility(&self, kind: FacilityKind, id: &str) -> Result<Facility, ApiError> {
        self.get(&format!("facility/{}/{id}", kind.as_path())).await
    }

    async fn update_document_status(
        &self,
        kind: FacilityKind,
        id: &str,
        slot_key: &str,
        decision: &DocumentDecision,
    ) -> Result<(), ApiError> {
        let kind = kind.as_path();
        let path = format!("facility/{kind}/{id}/documents/{slot_key}/status");
        self.put_unit(&path, decision).await
    }

    async fn verify_facility(&self, kind: FacilityKind, id: &str) -> Result<Facility, ApiError> {
        let path = format!("facility/{}/{id}/verify", kind.as_path());
        self.put(&path, &json!({})).await
    }
}
