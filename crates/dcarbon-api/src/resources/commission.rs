use async_trait::async_trait;
use dcarbon_core::{CommissionMode, CommissionStructure, CommissionTier, PropertyType};

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait CommissionApi: Send + Sync {
    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, ApiError>;
    async fn create_tier(&self, tier: &CommissionTier) -> Result<CommissionTier, ApiError>;
    async fn update_tier(
        &self,
        id: &str,
        tier: &CommissionTier,
    ) -> Result<CommissionTier, ApiError>;
    async fn delete_tier(&self, id: &str) -> Result<(), ApiError>;

    async fn list_structures(&self) -> Result<Vec<CommissionStructure>, ApiError>;
    /// Server-side filter; `None` leaves that dimension unfiltered.
    async fn filter_structures(
        &self,
        mode: Option<CommissionMode>,
        property_type: Option<PropertyType>,
    ) -> Result<Vec<CommissionStructure>, ApiError>;
    async fn create_structure(
        &self,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError>;
    async fn update_structure(
        &self,
        id: &str,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError>;
    async fn delete_structure(&self, id: &str) -> Result<(), ApiError>;
}

pub(crate) fn filter_path(
    mode: Option<CommissionMode>,
    property_type: Option<PropertyType>,
) -> String {
    let mut params = Vec::new();
    if let Some(mode) = mode {
        params.push(format!("mode={mode}"));
    }
    if let Some(property_type) = property_type {
        params.push(format!("propertyType={property_type}"));
    }
    if params.is_empty() {
        "commission-structure/filter".to_string()
    } else {
        format!("commission-structure/filter?{}", params.join("&"))
    }
}

#[async_trait]
impl CommissionApi for AdminClient {
    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, ApiError> {
        self.get("commission-tier").await
    }

    async fn create_tier(&self, tier: &CommissionTier) -> Result<CommissionTier, ApiError> {
        self.post("commission-tier", tier).await
    }

    async fn update_tier(
        &self,
        id: &str,
        tier: &CommissionTier,
    ) -> Result<CommissionTier, ApiError> {
        self.put(&format!("commission-tier/{id}"), tier).await
    }

    async fn delete_tier(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("commission-tier/{id}")).await
    }

    async fn list_structures(&self) -> Result<Vec<CommissionStructure>, ApiError> {
        self.get("commission-structure").await
    }

    async fn filter_structures(
        &self,
        mode: Option<CommissionMode>,
        property_type: Option<PropertyType>,
    ) -> Result<Vec<CommissionStructure>, ApiError> {
        self.get(&filter_path(mode, property_type)).await
    }

    async fn create_structure(
        &self,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError> {
        self.post("commission-structure", structure).await
    }

    async fn update_structure(
        &self,
        id: &str,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ApiError> {
        let path = format!("commission-structure/{id}");
        self.put(&path, structure).await
    }

    async fn delete_structure(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("commission-structure/{id}")).await
    }
}
