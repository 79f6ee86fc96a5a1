//! Unread-notification badge.

use std::sync::Arc;
use std::time::Duration;

use dcarbon_api::{NotificationApi, Subscription, subscribe};

use crate::{Loadable, ScreenError};

pub struct NotificationBadge<A> {
    api: Arc<A>,
    unread: Loadable<u64>,
}

impl<A: NotificationApi + 'static> NotificationBadge<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            unread: Loadable::default(),
        }
    }

    /// Last known count; zero before the first successful fetch.
    pub fn unread(&self) -> u64 {
        self.unread.data().copied().unwrap_or(0)
    }

    /// `"9+"` style label, or `None` when there is nothing unread.
    pub fn label(&self) -> Option<String> {
        match self.unread() {
            0 => None,
            n if n > 9 => Some("9+".to_string()),
            n => Some(n.to_string()),
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ScreenError> {
        self.unread.begin();
        let result = self.api.unread_count().await;
        self.unread.apply(result)
    }

    /// Poll the count every `period` for as long as the subscription lives.
    pub fn subscribe(&self, period: Duration) -> Subscription<u64> {
        let api = self.api.clone();
        subscribe(period, move || {
            let api = api.clone();
            async move { api.unread_count().await }
        })
    }
}
