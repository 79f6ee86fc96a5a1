//! Document review for one facility.

use std::sync::Arc;

use dcarbon_api::FacilityApi;
use dcarbon_core::{DocumentChecklist, DocumentDecision, Facility, FacilityKind, RejectionReason};
use tracing::info;

use crate::{Loadable, ScreenError, Ui};

pub struct FacilityReviewScreen<A> {
    api: Arc<A>,
    ui: Ui,
    kind: FacilityKind,
    id: String,
    facility: Loadable<Facility>,
}

impl<A: FacilityApi> FacilityReviewScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui, kind: FacilityKind, id: &str) -> Self {
        Self {
            api,
            ui,
            kind,
            id: id.to_string(),
            facility: Loadable::default(),
        }
    }

    pub fn kind(&self) -> FacilityKind {
        self.kind
    }

    pub fn facility(&self) -> &Loadable<Facility> {
        &self.facility
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.facility.begin();
        let result = self.api.get_facility(self.kind, &self.id).await;
        self.facility.apply(result)
    }

    pub fn checklist(&self) -> Result<DocumentChecklist, ScreenError> {
        Ok(self.facility.require("facility")?.checklist(self.kind))
    }

    pub fn can_verify(&self) -> bool {
        self.checklist().is_ok_and(|c| c.can_verify())
    }

    pub async fn approve_document(&mut self, slot_key: &str) -> Result<(), ScreenError> {
        self.decide(slot_key, DocumentDecision::approve(), "Document approved")
            .await
    }

    /// Reject a document. A blank reason is refused before any request.
    pub async fn reject_document(
        &mut self,
        slot_key: &str,
        reason: &str,
    ) -> Result<(), ScreenError> {
        let reason = RejectionReason::new(reason).map_err(|e| self.ui.invalid(e))?;
        let decision = DocumentDecision::reject(reason);
        self.decide(slot_key, decision, "Document rejected").await
    }

    async fn decide(
        &mut self,
        slot_key: &str,
        decision: DocumentDecision,
        success: &str,
    ) -> Result<(), ScreenError> {
        if !self.kind.document_slots().iter().any(|s| s.key == slot_key) {
            return Err(self.ui.unknown(slot_key));
        }
        info!(
            facility = %self.id,
            document = slot_key,
            status = ?decision.status,
            "updating document status"
        );
        let result = self
            .api
            .update_document_status(self.kind, &self.id, slot_key, &decision)
            .await;
        self.ui.report(result, success)?;
        self.load().await
    }

    /// Verify the facility. Refused here when a mandatory document is not
    /// approved or the facility is already verified.
    pub async fn verify(&mut self) -> Result<Facility, ScreenError> {
        self.checklist()?
            .check_verifiable()
            .map_err(|e| self.ui.invalid(e))?;
        info!(facility = %self.id, kind = %self.kind, "verifying facility");
        let result = self.api.verify_facility(self.kind, &self.id).await;
        let verified = self.ui.report(result, "Facility verified")?;
        self.facility.set(verified.clone());
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FakeState, TestUi, invalid};
    use dcarbon_core::facility::COMMERCIAL_DOCUMENTS;
    use dcarbon_core::{DocumentStatus, FacilityStatus, ValidationError};
    use serde_json::{Map, Value, json};
    use std::collections::HashMap;

    fn commercial(all_mandatory_approved: bool) -> Facility {
        let mut fields = Map::new();
        fields.insert("id".into(), json!("fac-1"));
        fields.insert("facilityName".into(), json!("Rooftop 1"));
        fields.insert("status".into(), json!("PENDING"));
        for slot in COMMERCIAL_DOCUMENTS.iter().filter(|s| s.mandatory) {
            let url = json!("https://files.example/doc.pdf");
            fields.insert(format!("{}Url", slot.key), url);
            let status = if all_mandatory_approved { "APPROVED" } else { "SUBMITTED" };
            fields.insert(format!("{}Status", slot.key), json!(status));
        }
        serde_json::from_value(Value::Object(fields)).unwrap()
    }

    fn screen(facility: Facility) -> (Arc<FakeApi>, Arc<TestUi>, FacilityReviewScreen<FakeApi>) {
        let api = Arc::new(FakeApi::with_state(FakeState {
            facilities: HashMap::from([("fac-1".to_string(), facility)]),
            ..Default::default()
        }));
        let ui = TestUi::answering(true);
        let kind = FacilityKind::Commercial;
        let screen = FacilityReviewScreen::new(api.clone(), ui.ui(), kind, "fac-1");
        (api, ui, screen)
    }

    #[tokio::test]
    async fn gate_opens_when_mandatory_documents_are_approved() {
        let (api, _, mut screen) = screen(commercial(true));
        screen.load().await.unwrap();

        let checklist = screen.checklist().unwrap();
        assert_eq!(checklist.count(DocumentStatus::Required), 2);
        assert!(screen.can_verify());

        let verified = screen.verify().await.unwrap();
        assert_eq!(verified.status, FacilityStatus::Verified);
        assert!(!screen.can_verify());
        assert_eq!(api.calls_to("verify_facility"), ["verify_facility:fac-1"]);
    }

    #[tokio::test]
    async fn verify_refused_while_documents_pending() {
        let (api, ui, mut screen) = screen(commercial(false));
        screen.load().await.unwrap();

        let err = screen.verify().await.unwrap_err();

        assert!(matches!(
            err,
            ScreenError::Invalid(ValidationError::VerificationBlocked(_))
        ));
        assert!(api.calls_to("verify_facility").is_empty());
        assert_eq!(ui.errors().len(), 1);
    }

    #[tokio::test]
    async fn rejecting_a_mandatory_document_closes_the_gate() {
        let (api, _, mut screen) = screen(commercial(true));
        screen.load().await.unwrap();

        screen
            .reject_document("ptoLetter", "Letter is unsigned")
            .await
            .unwrap();

        let calls = api.calls_to("update_document_status");
        assert_eq!(calls, ["update_document_status:ptoLetter"]);
        let checklist = screen.checklist().unwrap();
        let entry = checklist.entry("ptoLetter").unwrap();
        assert_eq!(entry.status, DocumentStatus::Rejected);
        let reason = entry.rejection_reason.as_deref();
        assert_eq!(reason, Some("Letter is unsigned"));
        assert!(!screen.can_verify());
    }

    #[tokio::test]
    async fn blank_reason_sends_nothing() {
        let (api, _, mut screen) = screen(commercial(true));
        screen.load().await.unwrap();

        let err = screen.reject_document("ptoLetter", "").await.unwrap_err();

        assert_eq!(invalid(err), ValidationError::BlankReason);
        assert!(api.calls_to("update_document_status").is_empty());
    }

    #[tokio::test]
    async fn unknown_slot_is_refused() {
        let (api, _, mut screen) = screen(commercial(true));
        screen.load().await.unwrap();

        // Residential-only slot on a commercial facility.
        let err = screen.approve_document("homeownerId").await.unwrap_err();

        assert!(matches!(invalid(err), ValidationError::UnknownRecord(_)));
        assert!(api.calls_to("update_document_status").is_empty());
    }

    #[tokio::test]
    async fn optional_documents_do_not_block() {
        let (_, _, mut screen) = screen(commercial(true));
        screen.load().await.unwrap();

        screen.approve_document("businessLicense").await.unwrap();

        assert!(screen.can_verify());
    }
}
