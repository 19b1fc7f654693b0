//! Subscription quota accounting and booking gate.

use crate::config::RulesConfig;
use crate::models::{Subscription, SubscriptionStatus};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageThresholds {
    pub low_remaining: u32,
}

impl Default for UsageThresholds {
    fn default() -> Self {
        Self::from(&RulesConfig::default())
    }
}

impl From<&RulesConfig> for UsageThresholds {
    fn from(rules: &RulesConfig) -> Self {
        Self {
            low_remaining: rules.low_remaining_threshold,
        }
    }
}

/// Consultations left in the current period. Serializes as a number, or the
/// string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Limited(u32),
    Unlimited,
}

impl Remaining {
    pub fn count(&self) -> Option<u32> {
        match self {
            Remaining::Limited(n) => Some(*n),
            Remaining::Unlimited => None,
        }
    }
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Remaining::Limited(n) => serializer.serialize_u32(*n),
            Remaining::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct UsageSummary {
    pub used: u32,
    pub limit: Option<u32>,
    pub unlimited: bool,
    #[schema(value_type = Object)]
    pub remaining: Remaining,
    pub usage_percentage: u8,
    pub low_usage: bool,
    pub exhausted: bool,
    pub days_until_renewal: i64,
    pub period_end: DateTime<Utc>,
}

pub fn remaining(sub: &Subscription) -> Remaining {
    match sub.plan.quota.limit() {
        None => Remaining::Unlimited,
        Some(limit) => Remaining::Limited(limit.saturating_sub(sub.consultations_used)),
    }
}

/// Rounded half-up and clamped to 0..=100.
pub fn usage_percentage(sub: &Subscription) -> u8 {
    let Some(limit) = sub.plan.quota.limit() else {
        return 0;
    };
    if limit == 0 || sub.consultations_used >= limit {
        return 100;
    }
    let used = u64::from(sub.consultations_used);
    let limit = u64::from(limit);
    ((used * 100 + limit / 2) / limit) as u8
}

pub fn is_exhausted(sub: &Subscription) -> bool {
    remaining(sub) == Remaining::Limited(0)
}

pub fn is_low_usage(sub: &Subscription, thresholds: &UsageThresholds) -> bool {
    matches!(remaining(sub), Remaining::Limited(n) if n > 0 && n <= thresholds.low_remaining)
}

/// Whole days until the period ends, rounded up; 0 once the period is over.
pub fn days_until_renewal(period_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (period_end - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
    }
}

pub fn summarize(
    sub: &Subscription,
    thresholds: &UsageThresholds,
    now: DateTime<Utc>,
) -> UsageSummary {
    if sub.is_over_limit() {
        log::warn!(
            "Subscription {} used {} consultations over limit {:?}; clamping",
            sub.id,
            sub.consultations_used,
            sub.plan.quota.limit()
        );
    }

    UsageSummary {
        used: sub.consultations_used,
        limit: sub.plan.quota.limit(),
        unlimited: sub.is_unlimited(),
        remaining: remaining(sub),
        usage_percentage: usage_percentage(sub),
        low_usage: is_low_usage(sub, thresholds),
        exhausted: is_exhausted(sub),
        days_until_renewal: days_until_renewal(sub.current_period_end, now),
        period_end: sub.current_period_end,
    }
}

/// Why a new consultation cannot be booked against a subscription.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BookingBlock {
    SubscriptionInactive { status: SubscriptionStatus },
    PeriodEnded,
    QuotaExhausted,
}

impl std::fmt::Display for BookingBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingBlock::SubscriptionInactive { status } => {
                write!(f, "subscription is {status}")
            }
            BookingBlock::PeriodEnded => write!(f, "billing period has ended"),
            BookingBlock::QuotaExhausted => write!(f, "consultation quota is exhausted"),
        }
    }
}

pub fn can_book_consultation(sub: &Subscription, now: DateTime<Utc>) -> Result<(), BookingBlock> {
    if sub.status != SubscriptionStatus::Active {
        return Err(BookingBlock::SubscriptionInactive { status: sub.status });
    }
    if !sub.is_active_at(now) || now >= sub.current_period_end {
        return Err(BookingBlock::PeriodEnded);
    }
    if is_exhausted(sub) {
        return Err(BookingBlock::QuotaExhausted);
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::{now, subscription};
    use super::*;
    use crate::models::ConsultationQuota;
    use chrono::Duration;

    #[test]
    fn test_eight_of_ten() {
        let sub = subscription(8, ConsultationQuota::Limited(10));
        let s = summarize(&sub, &UsageThresholds::default(), now());
        assert_eq!(s.usage_percentage, 80);
        assert_eq!(s.remaining, Remaining::Limited(2));
        assert!(s.low_usage);
        assert!(!s.exhausted);
    }

    #[test]
    fn test_ten_of_ten_is_exhausted() {
        let sub = subscription(10, ConsultationQuota::Limited(10));
        let s = summarize(&sub, &UsageThresholds::default(), now());
        assert!(s.exhausted);
        assert!(!s.low_usage);
        assert_eq!(s.remaining, Remaining::Limited(0));
        assert_eq!(s.usage_percentage, 100);
    }

    #[test]
    fn test_unlimited_ignores_usage() {
        for used in [0, 5, 500] {
            let sub = subscription(used, ConsultationQuota::Unlimited);
            let s = summarize(&sub, &UsageThresholds::default(), now());
            assert_eq!(s.usage_percentage, 0);
            assert_eq!(s.remaining, Remaining::Unlimited);
            assert!(!s.exhausted);
            assert!(!s.low_usage);
        }
    }

    #[test]
    fn test_over_limit_is_clamped() {
        let sub = subscription(13, ConsultationQuota::Limited(10));
        assert_eq!(usage_percentage(&sub), 100);
        assert_eq!(remaining(&sub), Remaining::Limited(0));
        assert!(is_exhausted(&sub));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(usage_percentage(&subscription(1, ConsultationQuota::Limited(3))), 33);
        assert_eq!(usage_percentage(&subscription(2, ConsultationQuota::Limited(3))), 67);
        assert_eq!(usage_percentage(&subscription(1, ConsultationQuota::Limited(8))), 13);
        assert_eq!(usage_percentage(&subscription(0, ConsultationQuota::Limited(8))), 0);
    }

    #[test]
    fn test_low_usage_threshold_is_configurable() {
        let sub = subscription(6, ConsultationQuota::Limited(10));
        assert!(!is_low_usage(&sub, &UsageThresholds::default()));
        assert!(is_low_usage(&sub, &UsageThresholds { low_remaining: 4 }));
    }

    #[test]
    fn test_days_until_renewal_rounds_up() {
        let end = now() + Duration::days(3);
        assert_eq!(days_until_renewal(end, now()), 3);
        assert_eq!(days_until_renewal(end + Duration::minutes(1), now()), 4);
        assert_eq!(days_until_renewal(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until_renewal(now(), now()), 0);
        assert_eq!(days_until_renewal(now() - Duration::days(2), now()), 0);
    }

    #[test]
    fn test_remaining_serializes() {
        assert_eq!(serde_json::to_string(&Remaining::Limited(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&Remaining::Unlimited).unwrap(),
            "\"unlimited\""
        );
    }

    #[test]
    fn test_booking_gate() {
        let sub = subscription(3, ConsultationQuota::Limited(10));
        assert_eq!(can_book_consultation(&sub, now()), Ok(()));

        let full = subscription(10, ConsultationQuota::Limited(10));
        assert_eq!(
            can_book_consultation(&full, now()),
            Err(BookingBlock::QuotaExhausted)
        );

        let mut paused = subscription(0, ConsultationQuota::Unlimited);
        paused.status = SubscriptionStatus::Paused;
        assert_eq!(
            can_book_consultation(&paused, now()),
            Err(BookingBlock::SubscriptionInactive {
                status: SubscriptionStatus::Paused
            })
        );

        let sub = subscription(0, ConsultationQuota::Unlimited);
        let after = sub.current_period_end + Duration::hours(1);
        assert_eq!(
            can_book_consultation(&sub, after),
            Err(BookingBlock::PeriodEnded)
        );
    }
}
