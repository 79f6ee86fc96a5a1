//! Bonus structures, grouped by type.

use std::sync::Arc;

use dcarbon_api::BonusApi;
use dcarbon_core::{BonusGroup, BonusStructure, BonusType, group_bonuses, lookup_bonus};

use crate::{Loadable, ScreenError, Ui};

pub struct BonusScreen<A> {
    api: Arc<A>,
    ui: Ui,
    bonuses: Loadable<Vec<BonusStructure>>,
}

impl<A: BonusApi> BonusScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            bonuses: Loadable::default(),
        }
    }

    pub fn bonuses(&self) -> &Loadable<Vec<BonusStructure>> {
        &self.bonuses
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.bonuses.begin();
        let result = self.api.list_bonuses().await;
        self.bonuses.apply(result)
    }

    /// A loaded bonus structure by id.
    pub fn bonus(&self, id: &str) -> Result<&BonusStructure, ScreenError> {
        let bonuses = self.bonuses.require("bonus structures")?;
        bonuses
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| self.ui.unknown(id))
    }

    /// One group per bonus type, ranges ascending.
    pub fn groups(&self) -> Result<Vec<BonusGroup<'_>>, ScreenError> {
        Ok(group_bonuses(self.bonuses.require("bonus structures")?))
    }

    pub fn lookup(
        &self,
        bonus_type: BonusType,
        value: f64,
    ) -> Result<Option<&BonusStructure>, ScreenError> {
        let bonuses = self.bonuses.require("bonus structures")?;
        Ok(lookup_bonus(bonuses, bonus_type, value))
    }

    pub async fn create(&mut self, bonus: &BonusStructure) -> Result<BonusStructure, ScreenError> {
        let result = self.api.create_bonus(bonus).await;
        let created = self.ui.report(result, "Bonus structure created")?;
        self.load().await?;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: &str,
        bonus: &BonusStructure,
    ) -> Result<BonusStructure, ScreenError> {
        let result = self.api.update_bonus(id, bonus).await;
        let updated = self.ui.report(result, "Bonus structure updated")?;
        self.load().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ScreenError> {
        self.ui
            .confirm("Are you sure you want to delete this bonus structure?")?;
        let result = self.api.delete_bonus(id).await;
        self.ui.report(result, "Bonus structure deleted")?;
        self.load().await
    }
}
