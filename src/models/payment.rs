use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 6] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Succeeded,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
        PaymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "processing" => Ok(PaymentStatus::Processing),
            "succeeded" => Ok(PaymentStatus::Succeeded),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            "cancelled" | "canceled" => Ok(PaymentStatus::Cancelled),
            other => Err(AppError::InvalidStatus {
                kind: "payment",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PaymentStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Payment {
    pub id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub subscription_id: Option<String>,
    pub consultation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub consultation_id: Option<String>,
}

impl TryFrom<PaymentPayload> for Payment {
    type Error = AppError;

    fn try_from(p: PaymentPayload) -> AppResult<Self> {
        if p.amount < 0 {
            return Err(AppError::ValidationError(format!(
                "payment {} has negative amount",
                p.id
            )));
        }
        let status = p.status.parse()?;
        Ok(Self {
            id: p.id,
            amount: p.amount,
            currency: p.currency.map(|c| c.to_ascii_uppercase()),
            status,
            created_at: p.created_at,
            description: p.description,
            subscription_id: p.subscription_id,
            consultation_id: p.consultation_id,
        })
    }
}

impl Payment {
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        let payload: PaymentPayload = serde_json::from_value(value)
            .map_err(|e| AppError::ValidationError(format!("malformed payment: {e}")))?;
        Self::try_from(payload)
    }
}
