use async_trait::async_trait;
use dcarbon_core::{
    GreenButtonRequest, UtilityAuthorization, UtilityProvider, UtilityProviderRequest,
};
use serde_json::json;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait UtilityApi: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<UtilityProvider>, ApiError>;
    async fn create_provider(
        &self,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError>;
    async fn update_provider(
        &self,
        id: &str,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError>;
    async fn delete_provider(&self, id: &str) -> Result<(), ApiError>;

    async fn list_provider_requests(&self) -> Result<Vec<UtilityProviderRequest>, ApiError>;
    async fn approve_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError>;
    async fn reject_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError>;

    async fn list_authorizations(&self) -> Result<Vec<UtilityAuthorization>, ApiError>;
    async fn get_authorization(&self, id: &str) -> Result<UtilityAuthorization, ApiError>;
    async fn delete_authorization(&self, id: &str) -> Result<(), ApiError>;
    async fn start_green_button(
        &self,
        request: &GreenButtonRequest,
    ) -> Result<UtilityAuthorization, ApiError>;
}

#[async_trait]
impl UtilityApi for AdminClient {
    async fn list_providers(&self) -> Result<Vec<UtilityProvider>, ApiError> {
        self.get("utility-providers").await
    }

    async fn create_provider(
        &self,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError> {
        self.post("utility-providers", provider).await
    }

    async fn update_provider(
        &self,
        id: &str,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ApiError> {
        self.put(&format!("utility-providers/{id}"), provider).await
    }

    async fn delete_provider(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("utility-providers/{id}")).await
    }

    async fn list_provider_requests(&self) -> Result<Vec<UtilityProviderRequest>, ApiError> {
        self.get("utility-providers/requests").await
    }

    async fn approve_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError> {
        let path = format!("utility-providers/requests/{id}/approve");
        self.put(&path, &json!({})).await
    }

    async fn reject_provider_request(&self, id: &str) -> Result<UtilityProviderRequest, ApiError> {
        let path = format!("utility-providers/requests/{id}/reject");
        self.put(&path, &json!({})).await
    }

    async fn list_authorizations(&self) -> Result<Vec<UtilityAuthorization>, ApiError> {
        self.get("utility-auth").await
    }

    async fn get_authorization(&self, id: &str) -> Result<UtilityAuthorization, ApiError> {
        self.get(&format!("utility-auth/{id}")).await
    }

    async fn delete_authorization(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("utility-auth/{id}")).await
    }

    async fn start_green_button(
        &self,
        request: &GreenButtonRequest,
    ) -> Result<UtilityAuthorization, ApiError> {
        self.post("utility-auth/green-button", request).await
    }
}
