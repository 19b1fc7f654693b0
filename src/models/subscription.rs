use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
    Pending,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 5] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::Paused,
        SubscriptionStatus::Cancelled,
        SubscriptionStatus::Expired,
        SubscriptionStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" | "canceled" => Ok(SubscriptionStatus::Cancelled),
            "expired" => Ok(SubscriptionStatus::Expired),
            "pending" => Ok(SubscriptionStatus::Pending),
            other => Err(AppError::InvalidStatus {
                kind: "subscription",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SubscriptionStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

/// Consultations granted per billing period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationQuota {
    Limited(u32),
    Unlimited,
}

impl ConsultationQuota {
    /// `unlimited_flag` wins; otherwise a limit of 0 is the unlimited sentinel.
    pub fn from_wire(unlimited_flag: bool, limit: Option<u32>) -> AppResult<Self> {
        match (unlimited_flag, limit) {
            (true, _) | (false, Some(0)) => Ok(ConsultationQuota::Unlimited),
            (false, Some(n)) => Ok(ConsultationQuota::Limited(n)),
            (false, None) => Err(AppError::ValidationError(
                "subscription has no consultation limit and is not unlimited".into(),
            )),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, ConsultationQuota::Unlimited)
    }

    pub fn limit(&self) -> Option<u32> {
        match self {
            ConsultationQuota::Limited(n) => Some(*n),
            ConsultationQuota::Unlimited => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Plan {
    pub id: String,
    pub name: Option<String>,
    pub quota: ConsultationQuota,
    pub interval: BillingInterval,
    /// Minor currency units per interval.
    pub price: Option<i64>,
    pub currency: Option<String>,
}

/// Validated subscription snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub student_id: Option<String>,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub consultations_used: u32,
    pub auto_renew: bool,
    pub cancel_at_period_end: bool,
}

impl Subscription {
    pub fn is_unlimited(&self) -> bool {
        self.plan.quota.is_unlimited()
    }

    /// Active and, when cancellation is scheduled, still inside the paid period.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active
            && (!self.cancel_at_period_end || now < self.current_period_end)
    }

    pub fn in_current_period(&self, now: DateTime<Utc>) -> bool {
        self.current_period_start <= now && now < self.current_period_end
    }

    pub fn will_renew(&self) -> bool {
        self.status == SubscriptionStatus::Active && self.auto_renew && !self.cancel_at_period_end
    }

    /// `consultationsUsed` above the plan limit.
    pub fn is_over_limit(&self) -> bool {
        self.plan
            .quota
            .limit()
            .is_some_and(|limit| self.consultations_used > limit)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub plan_id: String,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default, alias = "consultationsLimit")]
    pub consultations_per_month: Option<u32>,
    #[serde(default)]
    pub unlimited_consultations: bool,
    #[serde(default)]
    pub billing_interval: BillingInterval,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    #[serde(default)]
    pub consultations_used: u32,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl TryFrom<SubscriptionPayload> for Subscription {
    type Error = AppError;

    fn try_from(p: SubscriptionPayload) -> AppResult<Self> {
        if p.id.trim().is_empty() {
            return Err(AppError::ValidationError("subscription id is empty".into()));
        }
        if p.current_period_start >= p.current_period_end {
            return Err(AppError::ValidationError(format!(
                "subscription {} has period start {} not before end {}",
                p.id, p.current_period_start, p.current_period_end
            )));
        }
        let status: SubscriptionStatus = p.status.parse()?;
        let quota = ConsultationQuota::from_wire(p.unlimited_consultations, p.consultations_per_month)?;

        Ok(Self {
            id: p.id,
            user_id: p.user_id,
            student_id: p.student_id,
            plan: Plan {
                id: p.plan_id,
                name: p.plan_name,
                quota,
                interval: p.billing_interval,
                price: p.price,
                currency: p.currency.map(|c| c.to_ascii_uppercase()),
            },
            status,
            current_period_start: p.current_period_start,
            current_period_end: p.current_period_end,
            consultations_used: p.consultations_used,
            auto_renew: p.auto_renew,
            cancel_at_period_end: p.cancel_at_period_end,
        })
    }
}

impl Subscription {
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        let payload: SubscriptionPayload = serde_json::from_value(value)
            .map_err(|e| AppError::ValidationError(format!("malformed subscription: {e}")))?;
        Self::try_from(payload)
    }
}
