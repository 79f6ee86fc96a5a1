//! Utility providers, provider requests, and customer utility-data
//! authorizations.

use std::sync::Arc;
use std::time::Duration;

use dcarbon_api::{Subscription, UtilityApi, subscribe_until};
use dcarbon_core::{
    GreenButtonRequest, UtilityAuthorization, UtilityProvider, UtilityProviderRequest,
};
use tracing::info;

use crate::{Loadable, ScreenError, Ui};

pub struct UtilityProviderScreen<A> {
    api: Arc<A>,
    ui: Ui,
    providers: Loadable<Vec<UtilityProvider>>,
    requests: Loadable<Vec<UtilityProviderRequest>>,
}

impl<A: UtilityApi> UtilityProviderScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            providers: Loadable::default(),
            requests: Loadable::default(),
        }
    }

    pub fn providers(&self) -> &Loadable<Vec<UtilityProvider>> {
        &self.providers
    }

    pub fn requests(&self) -> &Loadable<Vec<UtilityProviderRequest>> {
        &self.requests
    }

    /// A loaded provider by id.
    pub fn provider(&self, id: &str) -> Result<&UtilityProvider, ScreenError> {
        let providers = self.providers.require("utility providers")?;
        providers
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| self.ui.unknown(id))
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.providers.begin();
        self.requests.begin();
        let (providers, requests) = tokio::join!(
            self.api.list_providers(),
            self.api.list_provider_requests()
        );
        let loaded_providers = self.providers.apply(providers);
        let loaded_requests = self.requests.apply(requests);
        loaded_providers?;
        loaded_requests
    }

    async fn reload_providers(&mut self) -> Result<(), ScreenError> {
        self.providers.begin();
        let result = self.api.list_providers().await;
        self.providers.apply(result)
    }

    pub async fn create(
        &mut self,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ScreenError> {
        let result = self.api.create_provider(provider).await;
        let created = self.ui.report(result, "Utility provider created")?;
        self.reload_providers().await?;
        Ok(created)
    }

    pub async fn update(
        &mut self,
        id: &str,
        provider: &UtilityProvider,
    ) -> Result<UtilityProvider, ScreenError> {
        let result = self.api.update_provider(id, provider).await;
        let updated = self.ui.report(result, "Utility provider updated")?;
        self.reload_providers().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ScreenError> {
        self.ui
            .confirm("Are you sure you want to delete this utility provider?")?;
        let result = self.api.delete_provider(id).await;
        self.ui.report(result, "Utility provider deleted")?;
        self.reload_providers().await
    }

    /// Approve a request to add a provider. The approved provider shows up in
    /// the provider list, so both lists are refreshed.
    pub async fn approve_request(
        &mut self,
        id: &str,
    ) -> Result<UtilityProviderRequest, ScreenError> {
        self.ui.confirm("Approve this utility provider request?")?;
        let result = self.api.approve_provider_request(id).await;
        let updated = self.ui.report(result, "Utility provider request approved")?;
        self.load().await?;
        Ok(updated)
    }

    pub async fn reject_request(
        &mut self,
        id: &str,
    ) -> Result<UtilityProviderRequest, ScreenError> {
        self.ui.confirm("Reject this utility provider request?")?;
        let result = self.api.reject_provider_request(id).await;
        let updated = self.ui.report(result, "Utility provider request rejected")?;
        self.load().await?;
        Ok(updated)
    }
}

pub struct UtilityAuthScreen<A> {
    api: Arc<A>,
    ui: Ui,
    authorizations: Loadable<Vec<UtilityAuthorization>>,
}

impl<A: UtilityApi + 'static> UtilityAuthScreen<A> {
    pub fn new(api: Arc<A>, ui: Ui) -> Self {
        Self {
            api,
            ui,
            authorizations: Loadable::default(),
        }
    }

    pub fn authorizations(&self) -> &Loadable<Vec<UtilityAuthorization>> {
        &self.authorizations
    }

    pub async fn load(&mut self) -> Result<(), ScreenError> {
        self.authorizations.begin();
        let result = self.api.list_authorizations().await;
        self.authorizations.apply(result)
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ScreenError> {
        self.ui
            .confirm("Are you sure you want to delete this authorization?")?;
        let result = self.api.delete_authorization(id).await;
        self.ui.report(result, "Authorization deleted")?;
        self.load().await
    }

    /// Start a Green Button authorization. Returns the new record and the
    /// external URL the customer has to open to complete it.
    pub async fn start_green_button(
        &mut self,
        request: &GreenButtonRequest,
    ) -> Result<(UtilityAuthorization, String), ScreenError> {
        let result = self.api.start_green_button(request).await;
        let auth = self.ui.report(result, "Authorization started")?;
        let url = auth.external_url();
        info!(
            id = %auth.id,
            utility = %auth.utility,
            url = %url,
            "green button authorization started"
        );
        self.load().await?;
        Ok((auth, url))
    }

    /// Poll one authorization every `period` until it reaches a terminal
    /// status. Dropping the subscription stops polling.
    pub fn watch(&self, id: &str, period: Duration) -> Subscription<UtilityAuthorization> {
        let api = self.api.clone();
        let id = id.to_string();
        subscribe_until(
            period,
            move || {
                let api = api.clone();
                let id = id.clone();
                async move { api.get_authorization(&id).await }
            },
            |auth: &UtilityAuthorization| auth.status.is_terminal(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, FakeState, TestUi};
    use dcarbon_api::{POLL_INTERVAL, PollEvent};
    use dcarbon_core::{AccountStatus, AuthorizationStatus, RequestStatus};

    fn provider_state() -> FakeState {
        FakeState {
            providers: vec![UtilityProvider {
                id: "pge".into(),
                name: "PG&E".into(),
                website: None,
                documentation: None,
                status: AccountStatus::Active,
            }],
            provider_requests: vec![UtilityProviderRequest {
                id: "req-1".into(),
                name: "SDG&E".into(),
                website: Some("https://www.sdge.com".into()),
                requested_by: Some("installer@example.com".into()),
                status: RequestStatus::Pending,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn approving_a_request_refreshes_both_lists() {
        let api = Arc::new(FakeApi::with_state(provider_state()));
        let mut screen = UtilityProviderScreen::new(api.clone(), TestUi::answering(true).ui());
        screen.load().await.unwrap();

        let updated = screen.approve_request("req-1").await.unwrap();

        assert_eq!(updated.status, RequestStatus::Approved);
        assert_eq!(api.calls_to("list_providers").len(), 2);
        assert_eq!(api.calls_to("list_provider_requests").len(), 2);
        assert_eq!(
            screen.requests().data().unwrap()[0].status,
            RequestStatus::Approved
        );
    }

    #[tokio::test]
    async fn provider_edit_puts_and_reloads() {
        let api = Arc::new(FakeApi::with_state(provider_state()));
        let mut screen = UtilityProviderScreen::new(api.clone(), TestUi::answering(true).ui());
        screen.load().await.unwrap();

        let mut edited = screen.provider("pge").unwrap().clone();
        edited.website = Some("https://www.pge.com".into());
        screen.update("pge", &edited).await.unwrap();

        assert_eq!(api.calls_to("update_provider"), ["update_provider:pge"]);
        assert_eq!(api.calls_to("list_providers").len(), 2);
        let website = screen.provider("pge").unwrap().website.as_deref();
        assert_eq!(website, Some("https://www.pge.com"));
    }

    #[tokio::test]
    async fn declined_provider_delete_sends_nothing() {
        let api = Arc::new(FakeApi::with_state(provider_state()));
        let mut screen = UtilityProviderScreen::new(api.clone(), TestUi::answering(false).ui());

        let declined = screen.delete("pge").await;
        assert!(matches!(declined, Err(ScreenError::Declined)));
        assert!(api.calls_to("delete_provider").is_empty());
    }

    #[tokio::test]
    async fn green_button_returns_external_url() {
        let api = Arc::new(FakeApi::default());
        let mut screen = UtilityAuthScreen::new(api, TestUi::answering(true).ui());

        let request = GreenButtonRequest {
            customer_email: "owner@example.com".into(),
            utility: "PG&E".into(),
            facility_id: None,
        };
        let (auth, url) = screen.start_green_button(&request).await.unwrap();

        let fallback = format!("https://main.instapull.io/authorize?ref={}", auth.id);
        assert_eq!(url, fallback);
        assert_eq!(screen.authorizations().data().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_ends_at_terminal_status() {
        let api = Arc::new(FakeApi::default());
        let mut screen = UtilityAuthScreen::new(api.clone(), TestUi::answering(true).ui());
        let request = GreenButtonRequest {
            customer_email: "owner@example.com".into(),
            utility: "PG&E".into(),
            facility_id: None,
        };
        let (auth, _) = screen.start_green_button(&request).await.unwrap();

        let mut sub = screen.watch(&auth.id, POLL_INTERVAL);
        match sub.next().await {
            Some(PollEvent::Value(a)) => assert_eq!(a.status, AuthorizationStatus::Pending),
            other => panic!("unexpected {other:?}"),
        }

        api.state.lock().unwrap().authorizations[0].status = AuthorizationStatus::Authorized;

        match sub.next().await {
            Some(PollEvent::Value(a)) => assert_eq!(a.status, AuthorizationStatus::Authorized),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(sub.next().await, None);
        assert_eq!(api.calls_to("get_authorization").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_keeps_polling_through_failures() {
        let api = Arc::new(FakeApi::default());
        let screen = UtilityAuthScreen::new(api.clone(), TestUi::answering(true).ui());
        api.fail("get_authorization");

        let mut sub = screen.watch("auth-x", POLL_INTERVAL);
        assert!(matches!(sub.next().await, Some(PollEvent::Failed(_))));
        assert!(matches!(sub.next().await, Some(PollEvent::Failed(_))));
        assert!(!sub.is_finished());
    }
}
