use async_trait::async_trait;
use cforge_core::{Campaign, ClientProfile, ContentDraft, ContentStatus, DashboardStats};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{campaigns, clients, content, store::Store, DbError};

/// [`Store`] backed by the Postgres tables in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }

    async fn insert_client(&self, profile: &ClientProfile) -> Result<(), DbError> {
        clients::insert_client(&self.pool, profile).await
    }

    async fn list_clients(&self) -> Result<Vec<ClientProfile>, DbError> {
        clients::list_clients(&self.pool).await
    }

    async fn get_client(&self, client_id: Uuid) -> Result<Option<ClientProfile>, DbError> {
        clients::get_client(&self.pool, client_id).await
    }

    async fn insert_draft(&self, draft: &ContentDraft) -> Result<(), DbError> {
        content::insert_draft(&self.pool, draft).await
    }

    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, DbError> {
        content::get_draft(&self.pool, id).await
    }

    async fn list_drafts(
        &self,
        status: ContentStatus,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ContentDraft>, DbError> {
        content::list_drafts(&self.pool, status, client_id).await
    }

    async fn update_draft(&self, draft: &ContentDraft) -> Result<(), DbError> {
        content::update_draft(&self.pool, draft).await
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, DbError> {
        content::delete_draft(&self.pool, id).await
    }

    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), DbError> {
        campaigns::insert_campaign(&self.pool, campaign).await
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, DbError> {
        campaigns::list_campaigns(&self.pool).await
    }

    async fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>, DbError> {
        campaigns::get_campaign(&self.pool, id).await
    }

    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), DbError> {
        campaigns::update_campaign(&self.pool, campaign).await
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<bool, DbError> {
        campaigns::delete_campaign(&self.pool, id).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError> {
        let (total_clients, pending_content, approved_content, active_campaigns) = tokio::try_join!(
            clients::count_clients(&self.pool),
            content::count_drafts_with_status(&self.pool, ContentStatus::Pending),
            content::count_drafts_with_status(&self.pool, ContentStatus::Approved),
            campaigns::count_active_campaigns(&self.pool),
        )?;

        Ok(DashboardStats {
            total_clients,
            pending_content,
            approved_content,
            active_campaigns,
        })
    }
}
