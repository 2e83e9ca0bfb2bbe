//! In-process [`Store`] used when no database is configured.

use async_trait::async_trait;
use cforge_core::{
    Campaign, CampaignStatus, ClientProfile, ContentDraft, ContentStatus, DashboardStats,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{store::Store, DbError};

#[derive(Debug, Default)]
struct State {
    clients: Vec<ClientProfile>,
    drafts: Vec<ContentDraft>,
    campaigns: Vec<Campaign>,
}

/// Vec-backed store. Listing order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn count_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_client(&self, profile: &ClientProfile) -> Result<(), DbError> {
        self.state.write().await.clients.push(profile.clone());
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<ClientProfile>, DbError> {
        Ok(self.state.read().await.clients.clone())
    }

    async fn get_client(&self, client_id: Uuid) -> Result<Option<ClientProfile>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .clients
            .iter()
            .find(|c| c.client_id == client_id)
            .cloned())
    }

    async fn insert_draft(&self, draft: &ContentDraft) -> Result<(), DbError> {
        self.state.write().await.drafts.push(draft.clone());
        Ok(())
    }

    async fn get_draft(&self, id: Uuid) -> Result<Option<ContentDraft>, DbError> {
        let state = self.state.read().await;
        Ok(state.drafts.iter().find(|d| d.id == id).cloned())
    }

    async fn list_drafts(
        &self,
        status: ContentStatus,
        client_id: Option<Uuid>,
    ) -> Result<Vec<ContentDraft>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .drafts
            .iter()
            .filter(|d| d.status == status)
            .filter(|d| client_id.map_or(true, |id| d.client_id == id))
            .cloned()
            .collect())
    }

    async fn update_draft(&self, draft: &ContentDraft) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let slot = state
            .drafts
            .iter_mut()
            .find(|d| d.id == draft.id)
            .ok_or(DbError::NotFound)?;
        *slot = draft.clone();
        Ok(())
    }

    async fn delete_draft(&self, id: Uuid) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        let before = state.drafts.len();
        state.drafts.retain(|d| d.id != id);
        Ok(state.drafts.len() != before)
    }

    async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), DbError> {
        self.state.write().await.campaigns.push(campaign.clone());
        Ok(())
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, DbError> {
        Ok(self.state.read().await.campaigns.clone())
    }

    async fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>, DbError> {
        let state = self.state.read().await;
        Ok(state.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn update_campaign(&self, campaign: &Campaign) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        let slot = state
            .campaigns
            .iter_mut()
            .find(|c| c.id == campaign.id)
            .ok_or(DbError::NotFound)?;
        *slot = campaign.clone();
        Ok(())
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        let before = state.campaigns.len();
        state.campaigns.retain(|c| c.id != id);
        Ok(state.campaigns.len() != before)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError> {
        let state = self.state.read().await;
        let with_status = |status: ContentStatus| {
            count_i64(state.drafts.iter().filter(|d| d.status == status).count())
        };
        Ok(DashboardStats {
            total_clients: count_i64(state.clients.len()),
            pending_content: with_status(ContentStatus::Pending),
            approved_content: with_status(ContentStatus::Approved),
            active_campaigns: count_i64(
                state
                    .campaigns
                    .iter()
                    .filter(|c| c.status == CampaignStatus::Active)
                    .count(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cforge_core::{ContentType, DraftCandidate, NewCampaign, OnboardingRequest};

    use super::*;

    fn profile(name: &str) -> ClientProfile {
        OnboardingRequest {
            company_name: name.to_string(),
            industry: "Retail".to_string(),
            brand_tone: "Warm".to_string(),
            target_audience: "Shoppers".to_string(),
            ..OnboardingRequest::default()
        }
        .into_profile(Uuid::new_v4(), Utc::now())
        .unwrap()
    }

    fn draft_for(profile: &ClientProfile, platform: &str) -> ContentDraft {
        DraftCandidate {
            platform: platform.to_string(),
            content_type: ContentType::Post,
            content: format!("{platform} copy"),
            generated_image_url: None,
            image_failed: false,
            uploaded_images: vec![],
        }
        .into_draft(profile, Utc::now())
    }

    #[tokio::test]
    async fn get_client_returns_none_when_absent() {
        let store = MemoryStore::new();
        assert!(store.get_client(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_drafts_filters_by_status_and_client() {
        let store = MemoryStore::new();
        let a = profile("Acme");
        let b = profile("Globex");
        store.insert_client(&a).await.unwrap();
        store.insert_client(&b).await.unwrap();

        let mut approved = draft_for(&a, "Twitter");
        approved.approve(Utc::now());
        for d in [draft_for(&a, "LinkedIn"), approved, draft_for(&b, "Instagram")] {
            store.insert_draft(&d).await.unwrap();
        }

        let all_pending = store.list_drafts(ContentStatus::Pending, None).await.unwrap();
        assert_eq!(all_pending.len(), 2);

        let a_pending = store
            .list_drafts(ContentStatus::Pending, Some(a.client_id))
            .await
            .unwrap();
        assert_eq!(a_pending.len(), 1);
        assert_eq!(a_pending[0].platform, "LinkedIn");
    }

    #[tokio::test]
    async fn update_draft_overwrites_and_reports_missing() {
        let store = MemoryStore::new();
        let p = profile("Acme");
        let mut d = draft_for(&p, "LinkedIn");
        store.insert_draft(&d).await.unwrap();

        d.apply_edit("new body".to_string(), Utc::now());
        store.update_draft(&d).await.unwrap();
        let stored = store.get_draft(d.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "new body");

        let ghost = draft_for(&p, "Reddit");
        assert!(matches!(
            store.update_draft(&ghost).await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_draft_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let p = profile("Acme");
        let d = draft_for(&p, "LinkedIn");
        store.insert_draft(&d).await.unwrap();
        assert!(store.delete_draft(d.id).await.unwrap());
        assert!(!store.delete_draft(d.id).await.unwrap());
    }

    #[tokio::test]
    async fn dashboard_stats_counts_by_status() {
        let store = MemoryStore::new();
        let p = profile("Acme");
        store.insert_client(&p).await.unwrap();
        let mut approved = draft_for(&p, "Twitter");
        approved.approve(Utc::now());
        store.insert_draft(&draft_for(&p, "LinkedIn")).await.unwrap();
        store.insert_draft(&approved).await.unwrap();

        let mut paused = NewCampaign {
            name: "Paused".to_string(),
            ..NewCampaign::default()
        }
        .into_campaign("Acme".to_string(), Uuid::new_v4(), Utc::now())
        .unwrap();
        paused.status = CampaignStatus::Paused;
        let active = NewCampaign {
            name: "Live".to_string(),
            ..NewCampaign::default()
        }
        .into_campaign("Acme".to_string(), Uuid::new_v4(), Utc::now())
        .unwrap();
        store.insert_campaign(&paused).await.unwrap();
        store.insert_campaign(&active).await.unwrap();

        let stats = store.dashboard_stats().await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_clients: 1,
                pending_content: 1,
                approved_content: 1,
                active_campaigns: 1,
            }
        );
    }
}
