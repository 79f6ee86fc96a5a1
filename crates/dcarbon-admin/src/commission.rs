//! Commission structures and tiers.

use std::sync::Arc;

use dcarbon_api::{ApiError, CommissionApi};
use dcarbon_core::{
    CommissionMatrix, CommissionMode, CommissionStructure, CommissionTier, PropertyType,
    edit_target, plan_delete, sort_tiers,
};
use futures::future::join_all;
use tracing::{info, warn};

use crate::{Loadable, ScreenError, Ui};

pub struct CommissionScreen<A> {
    api: Arc<A>,
    ui: Ui,
    tiers: Loadable<Vec<CommissionTier>>,
    structures: Loadable<Vec<CommissionStructure>>,
}

impl<A: CommissionApi> CommissionScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            tiers: Loadable::default(),
            structures: Loadable::default(),
        }
    }

    pub fn tiers(&self) -> &Loadable<Vec<CommissionTier>> {
        &self.tiers
    }

    pub fn structures(&self) -> &Loadable<Vec<CommissionStructure>> {
        &self.structures
    }

    /// Fetch tiers and structures together.
    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.tiers.begin();
        self.structures.begin();
        let (tiers, structures) = tokio::join!(self.api.list_tiers(), self.api.list_structures());
        let tiers = tiers.map(|mut t| {
            sort_tiers(&mut t);
            t
        });
        let loaded_tiers = self.tiers.apply(tiers);
        let loaded_structures = self.structures.apply(structures);
        loaded_tiers?;
        loaded_structures
    }

    pub async fn reload_tiers(&mut self) -> Result<(), ScreenError> {
        self.tiers.begin();
        let tiers = self.api.list_tiers().await.map(|mut t| {
            sort_tiers(&mut t);
            t
        });
        self.tiers.apply(tiers)
    }

    pub async fn reload_structures(&mut self) -> Result<(), ScreenError> {
        self.structures.begin();
        let structures = self.api.list_structures().await;
        self.structures.apply(structures)
    }

    /// A loaded tier by id.
    pub fn tier(&self, id: &str) -> Result<&CommissionTier, ScreenError> {
        let tiers = self.tiers.require("commission tiers")?;
        tiers
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| self.ui.unknown(id))
    }

    pub fn matrix(&self) -> Result<CommissionMatrix, ScreenError> {
        let tiers = self.tiers.require("commission tiers")?;
        let structures = self.structures.require("commission structures")?;
        Ok(CommissionMatrix::build(structures, tiers))
    }

    /// Server-side filter. Leaves the loaded structures untouched.
    pub async fn filter(
        &self,
        mode: Option<CommissionMode>,
        property_type: Option<PropertyType>,
    ) -> Result<Vec<CommissionStructure>, ScreenError> {
        Ok(self.api.filter_structures(mode, property_type).await?)
    }

    /// The record an edit of `id` opens; EPC legs open their partner-finance
    /// sibling.
    pub fn edit_target(&self, id: &str) -> Result<&CommissionStructure, ScreenError> {
        let structures = self.structures.require("commission structures")?;
        edit_target(structures, id).map_err(|e| self.ui.invalid(e))
    }

    pub async fn create_structure(
        &mut self,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ScreenError> {
        let result = self.api.create_structure(structure).await;
        let created = self.ui.report(result, "Commission structure created")?;
        self.reload_structures().await?;
        Ok(created)
    }

    pub async fn update_structure(
        &mut self,
        id: &str,
        structure: &CommissionStructure,
    ) -> Result<CommissionStructure, ScreenError> {
        let result = self.api.update_structure(id, structure).await;
        let updated = self.ui.report(result, "Commission structure updated")?;
        self.reload_structures().await?;
        Ok(updated)
    }

    /// Delete a structure after confirmation.
    ///
    /// A partner-finance record takes its EPC-assisted legs with it. The
    /// deletes run concurrently and the list is reloaded whatever the outcome;
    /// the first failure is reported.
    pub async fn delete_structure(&mut self, id: &str) -> Result<(), ScreenError> {
        let plan = {
            let structures = self.structures.require("commission structures")?;
            plan_delete(structures, id).map_err(|e| self.ui.invalid(e))?
        };
        self.ui.confirm(&plan.prompt)?;

        let cascade = plan.ids.len() - 1;
        info!(id, cascade, "deleting commission structure");
        let api = &self.api;
        let results = join_all(plan.ids.iter().map(|id| api.delete_structure(id))).await;
        let outcome = results.into_iter().collect::<Result<Vec<()>, ApiError>>();
        if outcome.is_err() {
            warn!(id, "commission delete partially failed");
        }
        let message = if plan.is_cascade() {
            "Commission structures deleted"
        } else {
            "Commission structure deleted"
        };
        let reported = self.ui.report(outcome, message);
        self.reload_structures().await?;
        reported.map(|_| ())
    }

    pub async fn create_tier(
        &mut self,
        tier: &CommissionTier,
    ) -> Result<CommissionTier, ScreenError> {
        let result = self.api.create_tier(tier).await;
        let created = self.ui.report(result, "Tier created")?;
        self.reload_tiers().await?;
        Ok(created)
    }

    pub async fn update_tier(
        &mut self,
        id: &str,
        tier: &CommissionTier,
    ) -> Result<CommissionTier, ScreenError> {
        let result = self.api.update_tier(id, tier).await;
        let updated = self.ui.report(result, "Tier updated")?;
        self.reload_tiers().await?;
        Ok(updated)
    }

    pub async fn delete_tier(&mut self, id: &str) -> Result<(), ScreenError> {
        self.ui
            .confirm("Are you sure you want to delete this tier?")?;
        let result = self.api.delete_tier(id).await;
        self.ui.report(result, "Tier deleted")?;
        self.reload_tiers().await
    }
}
