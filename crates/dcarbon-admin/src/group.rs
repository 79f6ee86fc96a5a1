//! Residential facility groups and their members.

use std::collections::HashSet;
use std::sync::Arc;

use dcarbon_api::GroupApi;
use dcarbon_core::ResidentialGroup;
use tracing::{debug, info};

use crate::{Loadable, ScreenError, Ui};

const REMOVE_FACILITY_PROMPT: &str =
    "Are you sure you want to remove this facility from the group?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupView {
    List,
    Detail(String),
    Create,
}

pub struct GroupScreen<A> {
    api: Arc<A>,
    ui: Ui,
    view: GroupView,
    groups: Loadable<Vec<ResidentialGroup>>,
    detail: Loadable<ResidentialGroup>,
}

impl<A: GroupApi> GroupScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            view: GroupView::List,
            groups: Loadable::default(),
            detail: Loadable::default(),
        }
    }

    pub fn view(&self) -> &GroupView {
        &self.view
    }

    pub fn groups(&self) -> &Loadable<Vec<ResidentialGroup>> {
        &self.groups
    }

    pub fn detail(&self) -> &Loadable<ResidentialGroup> {
        &self.detail
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.groups.begin();
        let result = self.api.list_groups().await;
        self.groups.apply(result)
    }

    pub async fn open(&mut self, id: &str) -> Result<(), ScreenError> {
        self.view = GroupView::Detail(id.to_string());
        self.detail.clear();
        self.reload_detail(id).await
    }

    pub fn start_create(&mut self) {
        self.view = GroupView::Create;
        self.detail.clear();
    }

    pub fn back(&mut self) {
        self.view = GroupView::List;
        self.detail.clear();
    }

    async fn reload_detail(&mut self, id: &str) -> Result<(), ScreenError> {
        self.detail.begin();
        let result = self.api.get_group(id).await;
        self.detail.apply(result)
    }

    /// Create a group and open it.
    pub async fn create(
        &mut self,
        group: &ResidentialGroup,
    ) -> Result<ResidentialGroup, ScreenError> {
        let result = self.api.create_group(group).await;
        let created = self.ui.report(result, "Group created")?;
        self.view = GroupView::Detail(created.id.clone());
        self.detail.set(created.clone());
        self.load().await?;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: &str,
        group: &ResidentialGroup,
    ) -> Result<ResidentialGroup, ScreenError> {
        let result = self.api.update_group(id, group).await;
        let updated = self.ui.report(result, "Group updated")?;
        if self.view == GroupView::Detail(id.to_string()) {
            self.reload_detail(id).await?;
        }
        self.load().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ScreenError> {
        self.ui
            .confirm("Are you sure you want to delete this group?")?;
        let result = self.api.delete_group(id).await;
        self.ui.report(result, "Group deleted")?;
        if self.view == GroupView::Detail(id.to_string()) {
            self.back();
        }
        self.load().await
    }

    /// Add facilities to the open group. Ids already in the group, and
    /// repeats, are dropped; if nothing is left no request is sent.
    pub async fn add_facilities(&mut self, facility_ids: &[String]) -> Result<usize, ScreenError> {
        let group = self.detail.require("group")?;
        let group_id = group.id.clone();
        let mut seen = HashSet::new();
        let fresh: Vec<String> = facility_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty() && !group.contains(id))
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect();
        if fresh.is_empty() {
            debug!(group = %group_id, "no new facilities to add");
            return Ok(0);
        }

        info!(group = %group_id, count = fresh.len(), "adding facilities to group");
        let result = self.api.add_group_facilities(&group_id, &fresh).await;
        let updated = self.ui.report(result, "Facilities added to group")?;
        self.detail.set(updated);
        self.load().await?;
        Ok(fresh.len())
    }

    pub async fn remove_facility(&mut self, facility_id: &str) -> Result<(), ScreenError> {
        let group_id = self.detail.require("group")?.id.clone();
        self.ui.confirm(REMOVE_FACILITY_PROMPT)?;
        let result = self.api.remove_group_facility(&group_id, facility_id).await;
        self.ui.report(result, "Facility removed from group")?;
        self.reload_detail(&group_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FakeState, TestUi};
    use dcarbon_core::GroupFacility;

    fn member(id: &str, capacity: f64) -> GroupFacility {
        GroupFacility {
            id: id.into(),
            name: format!("Home {id}"),
            system_capacity: Some(capacity),
            address: None,
        }
    }

    fn state() -> FakeState {
        let mut group = ResidentialGroup::new("North");
        group.id = "g1".into();
        group.facilities = vec![member("f1", 4.5), member("f2", 3.0)];
        FakeState {
            groups: vec![group],
            ..Default::default()
        }
    }

    async fn opened(answer: bool) -> (Arc<FakeApi>, Arc<TestUi>, GroupScreen<FakeApi>) {
        let api = Arc::new(FakeApi::with_state(state()));
        let ui = TestUi::answering(answer);
        let mut screen = GroupScreen::new(api.clone(), ui.ui());
        screen.open("g1").await.unwrap();
        (api, ui, screen)
    }

    #[tokio::test]
    async fn detail_shows_aggregate_capacity() {
        let (_, _, screen) = opened(true).await;
        assert_eq!(screen.view(), &GroupView::Detail("g1".into()));
        assert_eq!(screen.detail().data().unwrap().aggregate_capacity(), 7.5);
    }

    #[tokio::test]
    async fn add_facilities_skips_existing_members() {
        let (api, _, mut screen) = opened(true).await;

        let ids = vec!["f1".to_string(), "f3".to_string(), "f3".to_string()];
        let added = screen.add_facilities(&ids).await.unwrap();

        assert_eq!(added, 1);
        let calls = api.calls_to("add_group_facilities");
        assert_eq!(calls, ["add_group_facilities:f3"]);
        assert!(screen.detail().data().unwrap().contains("f3"));
    }

    #[tokio::test]
    async fn add_only_existing_members_sends_nothing() {
        let (api, _, mut screen) = opened(true).await;

        let added = screen.add_facilities(&["f2".to_string()]).await.unwrap();

        assert_eq!(added, 0);
        assert!(api.calls_to("add_group_facilities").is_empty());
    }

    #[tokio::test]
    async fn remove_facility_declined() {
        let (api, _, mut screen) = opened(false).await;

        assert!(matches!(
            screen.remove_facility("f1").await,
            Err(ScreenError::Declined)
        ));
        assert!(api.calls_to("remove_group_facility").is_empty());
    }

    #[tokio::test]
    async fn remove_facility_refreshes_detail() {
        let (_, ui, mut screen) = opened(true).await;

        screen.remove_facility("f1").await.unwrap();

        assert!(!screen.detail().data().unwrap().contains("f1"));
        assert_eq!(ui.successes(), ["Facility removed from group"]);
    }

    #[tokio::test]
    async fn create_opens_new_group() {
        let api = Arc::new(FakeApi::default());
        let mut screen = GroupScreen::new(api, TestUi::answering(true).ui());
        screen.start_create();
        assert_eq!(screen.view(), &GroupView::Create);

        let south = ResidentialGroup::new("South");
        let created = screen.create(&south).await.unwrap();

        assert_eq!(screen.view(), &GroupView::Detail(created.id.clone()));
        assert_eq!(screen.groups().data().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_open_group_returns_to_list() {
        let (_, _, mut screen) = opened(true).await;
        screen.delete("g1").await.unwrap();
        assert_eq!(screen.view(), &GroupView::List);
        assert!(screen.groups().data().unwrap().is_empty());
    }
}
