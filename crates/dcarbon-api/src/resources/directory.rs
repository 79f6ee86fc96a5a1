use async_trait::async_trait;
use dcarbon_core::{Installer, Page, PageRequest, Partner};

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_partners(&self, page: PageRequest) -> Result<Page<Partner>, ApiError>;
    async fn create_partner(&self, partner: &Partner) -> Result<Partner, ApiError>;
    async fn update_partner(&self, id: &str, partner: &Partner) -> Result<Partner, ApiError>;
    async fn delete_partner(&self, id: &str) -> Result<(), ApiError>;

    async fn list_installers(&self, page: PageRequest) -> Result<Page<Installer>, ApiError>;
    async fn create_installer(&self, installer: &Installer) -> Result<Installer, ApiError>;
    async fn update_installer(
        &self,
        id: &str,
        installer: &Installer,
    ) -> Result<Installer, ApiError>;
    async fn delete_installer(&self, id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl DirectoryApi for AdminClient {
    async fn list_partners(&self, page: PageRequest) -> Result<Page<Partner>, ApiError> {
        self.get(&format!("partners?{}", page.query())).await
    }

    async fn create_partner(&self, partner: &Partner) -> Result<Partner, ApiError> {
        self.post("partners", partner).await
    }

    async fn update_partner(&self, id: &str, partner: &Partner) -> Result<Partner, ApiError> {
        self.put(&format!("partners/{id}"), partner).await
    }

    async fn delete_partner(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("partners/{id}")).await
    }

    async fn list_installers(&self, page: PageRequest) -> Result<Page<Installer>, ApiError> {
        self.get(&format!("installers?{}", page.query())).await
    }

    async fn create_installer(&self, installer: &Installer) -> Result<Installer, ApiError> {
        self.post("installers", installer).await
    }

    async fn update_installer(
        &self,
        id: &str,
        installer: &Installer,
    ) -> Result<Installer, ApiError> {
        self.put(&format!("installers/{id}"), installer).await
    }

    async fn delete_installer(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("installers/{id}")).await
    }
}
