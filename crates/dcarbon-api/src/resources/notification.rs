use async_trait::async_trait;
use serde::Deserialize;

use crate::{AdminClient, ApiError};

#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn unread_count(&self) -> Result<u64, ApiError>;
}

#[derive(Deserialize)]
struct UnreadCount {
    count: u64,
}

#[async_trait]
impl NotificationApi for AdminClient {
    async fn unread_count(&self) -> Result<u64, ApiError> {
        let unread: UnreadCount = self.get("notifications/unread-count").await?;
        Ok(unread.count)
    }
}
