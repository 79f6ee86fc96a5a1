use async_trait::async_trait;
use dcarbon_core::ResidentialGroup;
use serde::Serialize;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait GroupApi: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<ResidentialGroup>, ApiError>;
    async fn get_group(&self, id: &str) -> Result<ResidentialGroup, ApiError>;
    async fn create_group(&self, group: &ResidentialGroup) -> Result<ResidentialGroup, ApiError>;
    async fn update_group(
        &self,
        id: &str,
        group: &ResidentialGroup,
    ) -> Result<ResidentialGroup, ApiError>;
    async fn delete_group(&self, id: &str) -> Result<(), ApiError>;
    async fn add_group_facilities(
        &self,
        id: &str,
        facility_ids: &[String],
    ) -> Result<ResidentialGroup, ApiError>;
    async fn remove_group_facility(&self, id: &str, facility_id: &str) -> Result<(), ApiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddFacilities<'a> {
    facility_ids: &'a [String],
}

const GROUPS: &str = "residential-facility-group";

#[async_trait]
impl GroupApi for AdminClient {
    async fn list_groups(&self) -> Result<Vec<ResidentialGroup>, ApiError> {
        self.get(GROUPS).await
    }

    async fn get_group(&self, id: &str) -> Result<ResidentialGroup, ApiError> {
        self.get(&format!("{GROUPS}/{id}")).await
    }

    async fn create_group(&self, group: &ResidentialGroup) -> Result<ResidentialGroup, ApiError> {
        self.post(GROUPS, group).await
    }

    async fn update_group(
        &self,
        id: &str,
        group: &ResidentialGroup,
    ) -> Result<ResidentialGroup, ApiError> {
        self.put(&format!("{GROUPS}/{id}"), group).await
    }

    async fn delete_group(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{GROUPS}/{id}")).await
    }

    async fn add_group_facilities(
        &self,
        id: &str,
        facility_ids: &[String],
    ) -> Result<ResidentialGroup, ApiError> {
        let body = AddFacilities { facility_ids };
        self.post(&format!("{GROUPS}/{id}/facilities"), &body).await
    }

    async fn remove_group_facility(&self, id: &str, facility_id: &str) -> Result<(), ApiError> {
        let path = format!("{GROUPS}/{id}/facilities/{facility_id}");
        self.delete(&path).await
    }
}
