use crate::models::{
    ConsultationStatus, ConsultationType, LessonReport, PaymentStatus, Plan, SubscriptionStatus,
};
use crate::presentation::StatusBadge;
use crate::rules::{BookingBlock, ConsultationPhase, UsageSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct ConsultationView {
    pub id: String,
    pub teacher_id: String,
    #[serde(rename = "type")]
    pub consultation_type: ConsultationType,
    pub student_id: Option<String>,
    pub group_id: Option<String>,
    pub subject: Option<String>,
    pub status: ConsultationStatus,
    pub badge: StatusBadge,
    pub phase: ConsultationPhase,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub is_upcoming: bool,
    pub is_past: bool,
    pub can_be_cancelled: bool,
    pub can_be_started: bool,
    pub can_be_rated: bool,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub report: Option<LessonReport>,
    pub meeting_url: Option<String>,
    pub display: ConsultationDisplay,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct ConsultationDisplay {
    pub scheduled_at: String,
    pub duration: String,
    pub starts: String,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct BookingEligibility {
    pub allowed: bool,
    pub block: Option<BookingBlock>,
    pub message: Option<String>,
}

impl From<Result<(), BookingBlock>> for BookingEligibility {
    fn from(decision: Result<(), BookingBlock>) -> Self {
        match decision {
            Ok(()) => Self {
                allowed: true,
                block: None,
                message: None,
            },
            Err(block) => Self {
                allowed: false,
                message: Some(block.to_string()),
                block: Some(block),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct SubscriptionView {
    pub id: String,
    pub user_id: String,
    pub student_id: Option<String>,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub badge: StatusBadge,
    pub is_active: bool,
    pub will_renew: bool,
    pub auto_renew: bool,
    pub cancel_at_period_end: bool,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub usage: UsageSummary,
    pub booking: BookingEligibility,
    pub display: SubscriptionDisplay,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct SubscriptionDisplay {
    pub period_end: String,
    pub price: Option<String>,
    pub renewal: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct PaymentView {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub badge: StatusBadge,
    pub is_successful: bool,
    pub created_at: DateTime<Utc>,
    pub description: Option<String>,
    pub subscription_id: Option<String>,
    pub consultation_id: Option<String>,
    pub display: PaymentDisplay,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct PaymentDisplay {
    pub amount: String,
    pub created_at: String,
}
