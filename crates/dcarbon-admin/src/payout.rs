//! Payout requests: list, detail, approve, reject.

use std::sync::Arc;

use dcarbon_api::PayoutApi;
use dcarbon_core::{PayoutRequest, PayoutStatus, PayoutSummary, RejectionReason};
use tracing::info;

use crate::{Loadable, ScreenError, Ui};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutView {
    List,
    Detail(String),
}

pub struct PayoutScreen<A> {
    api: Arc<A>,
    ui: Ui,
    view: PayoutView,
    status_filter: Option<PayoutStatus>,
    requests: Loadable<Vec<PayoutRequest>>,
    detail: Loadable<PayoutRequest>,
}

impl<A: PayoutApi> PayoutScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            view: PayoutView::List,
            status_filter: None,
            requests: Loadable::default(),
            detail: Loadable::default(),
        }
    }

    pub fn view(&self) -> &PayoutView {
        &self.view
    }

    pub fn requests(&self) -> &Loadable<Vec<PayoutRequest>> {
        &self.requests
    }

    pub fn detail(&self) -> &Loadable<PayoutRequest> {
        &self.detail
    }

    /// Invoice link of the open request, for preview.
    pub fn invoice_url(&self) -> Option<&str> {
        self.detail.data()?.invoice_url.as_deref()
    }

    pub fn status_filter(&self) -> Option<PayoutStatus> {
        self.status_filter
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.requests.begin();
        let result = self.api.list_payouts(self.status_filter).await;
        self.requests.apply(result)
    }

    /// Change the status filter and refetch.
    pub async fn set_status_filter(
        &mut self,
        status: Option<PayoutStatus>,
    ) -> Result<(), ScreenError> {
        self.status_filter = status;
        self.load().await
    }

    pub fn summary(&self) -> Result<PayoutSummary, ScreenError> {
        let requests = self.requests.require("payout requests")?;
        Ok(PayoutSummary::from_requests(requests))
    }

    pub async fn open(&mut self, id: &str) -> Result<(), ScreenError> {
        self.view = PayoutView::Detail(id.to_string());
        self.detail.clear();
        self.detail.begin();
        let result = self.api.get_payout(id).await;
        self.detail.apply(result)
    }

    pub fn back(&mut self) {
        self.view = PayoutView::List;
        self.detail.clear();
    }

    pub async fn approve(&mut self, id: &str) -> Result<PayoutRequest, ScreenError> {
        self.ui
            .confirm("Are you sure you want to approve this payout request?")?;
        info!(id, "approving payout");
        let result = self.api.approve_payout(id).await;
        let updated = self.ui.report(result, "Payout request approved")?;
        self.after_decision(&updated).await?;
        Ok(updated)
    }

    /// Reject with a reason. A blank reason is refused before any request
    /// is sent.
    pub async fn reject(&mut self, id: &str, reason: &str) -> Result<PayoutRequest, ScreenError> {
        let reason = RejectionReason::new(reason).map_err(|e| self.ui.invalid(e))?;
        info!(id, "rejecting payout");
        let result = self.api.reject_payout(id, &reason).await;
        let updated = self.ui.report(result, "Payout request rejected")?;
        self.after_decision(&updated).await?;
        Ok(updated)
    }

    async fn after_decision(&mut self, updated: &PayoutRequest) -> Result<(), ScreenError> {
        if self.view == PayoutView::Detail(updated.id.clone()) {
            self.detail.set(updated.clone());
        }
        self.load().await
    }
}
