use async_trait::async_trait;
use dcarbon_core::{PayoutRequest, PayoutStatus, RejectionReason};
use serde::Serialize;
use serde_json::json;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait PayoutApi: Send + Sync {
    async fn list_payouts(
        &self,
        status: Option<PayoutStatus>,
    ) -> Result<Vec<PayoutRequest>, ApiError>;
    async fn get_payout(&self, id: &str) -> Result<PayoutRequest, ApiError>;
    async fn approve_payout(&self, id: &str) -> Result<PayoutRequest, ApiError>;
    async fn reject_payout(
        &self,
        id: &str,
        reason: &RejectionReason,
    ) -> Result<PayoutRequest, ApiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectBody<'a> {
    rejection_reason: &'a RejectionReason,
}

#[async_trait]
impl PayoutApi for AdminClient {
    async fn list_payouts(
        &self,
        status: Option<PayoutStatus>,
    ) -> Result<Vec<PayoutRequest>, ApiError> {
        match status {
            Some(status) => self.get(&format!("payout-request?status={status}")).await,
            None => self.get("payout-request").await,
        }
    }

    async fn get_payout(&self, id: &str) -> Result<PayoutRequest, ApiError> {
        self.get(&format!("payout-request/{id}")).await
    }

    async fn approve_payout(&self, id: &str) -> Result<PayoutRequest, ApiError> {
        let path = format!("payout-request/{id}/approve");
        self.put(&path, &json!({})).await
    }

    async fn reject_payout(
        &self,
        id: &str,
        reason: &RejectionReason,
    ) -> Result<PayoutRequest, ApiError> {
        let body = RejectBody {
            rejection_reason: reason,
        };
        let path = format!("payout-request/{id}/reject");
        self.put(&path, &body).await
    }
}
