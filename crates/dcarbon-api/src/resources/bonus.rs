use async_trait::async_trait;
use dcarbon_core::BonusStructure;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait BonusApi: Send + Sync {
    async fn list_bonuses(&self) -> Result<Vec<BonusStructure>, ApiError>;
    async fn create_bonus(&self, bonus: &BonusStructure) -> Result<BonusStructure, ApiError>;
    async fn update_bonus(
        &self,
        id: &str,
        bonus: &BonusStructure,
    ) -> Result<BonusStructure, ApiError>;
    async fn delete_bonus(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl BonusApi for AdminClient {
    async fn list_bonuses(&self) -> Result<Vec<BonusStructure>, ApiError> {
        self.get("bonus-structure").await
    }

    async fn create_bonus(&self, bonus: &BonusStructure) -> Result<BonusStructure, ApiError> {
        self.post("bonus-structure", bonus).await
    }

    async fn update_bonus(
        &self,
        id: &str,
        bonus: &BonusStructure,
    ) -> Result<BonusStructure, ApiError> {
        self.put(&format!("bonus-structure/{id}"), bonus).await
    }

    async fn delete_bonus(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("bonus-structure/{id}")).await
    }
}
