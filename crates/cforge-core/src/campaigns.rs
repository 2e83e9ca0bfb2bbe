use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::content::UnknownVariant;
use crate::ConfigError;

const DEFAULT_AD_TYPE: &str = "display";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "completed" => Ok(CampaignStatus::Completed),
            other => Err(UnknownVariant {
                kind: "campaign status",
                value: other.to_string(),
            }),
        }
    }
}

/// A paid campaign tracked alongside organic content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub platform: Option<String>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub target_audience: Option<String>,
    pub ad_type: String,
    pub status: CampaignStatus,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub ad_type: Option<String>,
}

impl NewCampaign {
    /// Validate and build an `active` campaign with zeroed counters.
    ///
    /// `client_name` is resolved by the caller; it is `"Unknown"` when the
    /// client id does not match a stored client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a blank name, a negative budget,
    /// or an end date before the start date.
    pub fn into_campaign(
        self,
        client_name: String,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Campaign, ConfigError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "campaign name must be non-empty".to_string(),
            ));
        }
        validate_budget(self.budget)?;
        validate_dates(self.start_date, self.end_date)?;

        Ok(Campaign {
            id,
            name,
            client_id: self.client_id,
            client_name,
            platform: self.platform,
            budget: self.budget,
            start_date: self.start_date,
            end_date: self.end_date,
            target_audience: self.target_audience,
            ad_type: self
                .ad_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AD_TYPE.to_string()),
            status: CampaignStatus::Active,
            impressions: 0,
            clicks: 0,
            ctr: 0.0,
            created_at: now,
            updated_at: None,
        })
    }
}

// Option<Option<T>> is intentional: outer None = "not in request" (keep current),
// Some(None) = "explicitly cleared", Some(Some(v)) = "set to value" (PATCH semantics).
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub budget: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_audience: Option<Option<String>>,
    pub ad_type: Option<String>,
    pub status: Option<CampaignStatus>,
    pub impressions: Option<i64>,
    pub clicks: Option<i64>,
}

impl CampaignUpdate {
    /// Apply the sparse update in place and recompute CTR.
    ///
    /// The campaign is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the resulting campaign would be
    /// invalid.
    pub fn apply(self, campaign: &mut Campaign, now: DateTime<Utc>) -> Result<(), ConfigError> {
        let mut next = campaign.clone();

        if let Some(name) = self.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "campaign name must be non-empty".to_string(),
                ));
            }
            next.name = name;
        }
        if let Some(platform) = self.platform {
            next.platform = platform;
        }
        if let Some(budget) = self.budget {
            next.budget = budget;
        }
        if let Some(start) = self.start_date {
            next.start_date = start;
        }
        if let Some(end) = self.end_date {
            next.end_date = end;
        }
        if let Some(audience) = self.target_audience {
            next.target_audience = audience;
        }
        if let Some(ad_type) = self.ad_type {
            next.ad_type = ad_type;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(impressions) = self.impressions {
            next.impressions = impressions;
        }
        if let Some(clicks) = self.clicks {
            next.clicks = clicks;
        }

        if next.impressions < 0 || next.clicks < 0 {
            return Err(ConfigError::Validation(
                "impressions and clicks must be non-negative".to_string(),
            ));
        }
        validate_budget(next.budget)?;
        validate_dates(next.start_date, next.end_date)?;

        next.ctr = click_through_rate(next.clicks, next.impressions);
        next.updated_at = Some(now);
        *campaign = next;
        Ok(())
    }
}

// A present key (even `null`) maps to `Some(..)`; `default` covers absence.
#[allow(clippy::option_option)]
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Clicks per impression as a percentage, `0.0` when there are no impressions.
#[must_use]
pub fn click_through_rate(clicks: i64, impressions: i64) -> f64 {
    if impressions <= 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = clicks as f64 / impressions as f64;
    ratio * 100.0
}

fn validate_budget(budget: Option<Decimal>) -> Result<(), ConfigError> {
    match budget {
        Some(b) if b.is_sign_negative() => Err(ConfigError::Validation(format!(
            "budget must be non-negative, got {b}"
        ))),
        _ => Ok(()),
    }
}

fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), ConfigError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(ConfigError::Validation(format!(
            "end_date {e} is before start_date {s}"
        ))),
        _ => Ok(()),
    }
}

/// Counts shown on the operator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub pending_content: i64,
    pub approved_content: i64,
    pub active_campaigns: i64,
}
