use async_trait::async_trait;
use cforge_core::{Campaign, ClientProfile, ContentDraft, ContentStatus, DashboardStats};
use uuid::Uuid;

use crate::DbError;

/// Persistence boundary shared by the server and CLI.
///
/// Lookups by id return `Ok(None)` (or `Ok(false)` for deletes) when the
/// record is absent. Updates are whole-record writes of a value the caller
/// has just read; there is no optimistic locking.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short label for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DbError>;

    async fn insert_client(&self, profile: &ClientProfile) -> Result<(), DbError>;
    async fn list_clients(&self) -> Result<Vec<ClientProfile>, DbError>;
    async fn get_client(&self, client_id: Uuid) -> Result<Option<ClientProfile>, DbError>;

    async fn insert_draft(&self, draft: &ContentDraft) -> Result<(), DbError>;
    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, DbError>;
    /// Drafts with `status`, oldest first, optionally limited to one client.
    async fn list_drafts(
        &self,
        status: ContentStatus,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ContentDraft>, DbError>;
    /// Overwrite a stored draft. Returns [`DbError::NotFound`] if it is gone.
    async fn update_draft(&self, draft: &ContentDraft) -> Result<(), DbError>;
    async fn delete_draft(&self, id: Uuid) -> Result<bool, DbError>;

    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), DbError>;
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, DbError>;
    async fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>, DbError>;
    /// Overwrite a stored campaign. Returns [`DbError::NotFound`] if it is gone.
    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), DbError>;
    async fn delete_campaign(&self, id: Uuid) -> Result<bool, DbError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError>;
}
