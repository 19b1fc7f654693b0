//! Time-based predicates over a consultation snapshot.
//!
//! Every function here is a pure function of the snapshot, the caller's `now`
//! and the booking policy. Nothing reads the system clock.

use crate::config::RulesConfig;
use crate::models::{Consultation, ConsultationStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsultationPolicy {
    pub cancellation_notice: Duration,
    pub early_join: Duration,
}

impl Default for ConsultationPolicy {
    fn default() -> Self {
        Self::from(&RulesConfig::default())
    }
}

impl From<&RulesConfig> for ConsultationPolicy {
    fn from(rules: &RulesConfig) -> Self {
        Self {
            cancellation_notice: Duration::hours(rules.cancellation_notice_hours),
            early_join: Duration::minutes(rules.early_join_minutes),
        }
    }
}

/// Coarse position of a consultation on the timeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationPhase {
    Upcoming,
    Live,
    Past,
    /// Cancelled or no-show.
    Closed,
}

pub fn time_until_start(c: &Consultation, now: DateTime<Utc>) -> Duration {
    c.scheduled_at - now
}

pub fn is_upcoming(c: &Consultation, now: DateTime<Utc>) -> bool {
    c.scheduled_at > now && c.status.is_open_booking()
}

/// The window has fully elapsed, or the consultation was marked completed.
pub fn is_past(c: &Consultation, now: DateTime<Utc>) -> bool {
    c.ends_at() < now || c.status == ConsultationStatus::Completed
}

pub fn is_completed(c: &Consultation, now: DateTime<Utc>) -> bool {
    is_past(c, now)
}

pub fn is_in_window(c: &Consultation, now: DateTime<Utc>) -> bool {
    c.scheduled_at <= now && now <= c.ends_at()
}

/// Lead time must be strictly greater than the notice period.
pub fn can_be_cancelled(c: &Consultation, now: DateTime<Utc>, policy: &ConsultationPolicy) -> bool {
    c.status.is_open_booking() && time_until_start(c, now) > policy.cancellation_notice
}

/// Joinable from `early_join` before the start until the scheduled end.
pub fn can_be_started(c: &Consultation, now: DateTime<Utc>, policy: &ConsultationPolicy) -> bool {
    let lead = time_until_start(c, now);
    c.status == ConsultationStatus::Confirmed && -c.duration() <= lead && lead <= policy.early_join
}

pub fn can_be_rated(c: &Consultation) -> bool {
    c.status == ConsultationStatus::Completed && c.rating().is_none()
}

pub fn phase(c: &Consultation, now: DateTime<Utc>) -> ConsultationPhase {
    match c.status {
        ConsultationStatus::Cancelled | ConsultationStatus::NoShow => ConsultationPhase::Closed,
        ConsultationStatus::Completed => ConsultationPhase::Past,
        ConsultationStatus::InProgress => ConsultationPhase::Live,
        ConsultationStatus::Pending
        | ConsultationStatus::Confirmed
        | ConsultationStatus::Scheduled => {
            if now < c.scheduled_at {
                ConsultationPhase::Upcoming
            } else if now <= c.ends_at() {
                ConsultationPhase::Live
            } else {
                ConsultationPhase::Past
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{consultation, now};
    use super::*;

    fn policy() -> ConsultationPolicy {
        ConsultationPolicy::default()
    }

    #[test]
    fn test_cancellable_beyond_notice_window() {
        let c = consultation(now() + Duration::hours(25), 60, ConsultationStatus::Scheduled);
        assert!(can_be_cancelled(&c, now(), &policy()));

        let c = consultation(now() + Duration::hours(23), 60, ConsultationStatus::Scheduled);
        assert!(!can_be_cancelled(&c, now(), &policy()));
    }

    #[test]
    fn test_cancellation_boundary_is_exclusive() {
        let exactly = consultation(now() + Duration::hours(24), 60, ConsultationStatus::Scheduled);
        assert!(!can_be_cancelled(&exactly, now(), &policy()));

        let just_over = consultation(
            now() + Duration::hours(24) + Duration::seconds(1),
            60,
            ConsultationStatus::Confirmed,
        );
        assert!(can_be_cancelled(&just_over, now(), &policy()));
    }

    #[test]
    fn test_cancellation_requires_open_booking() {
        for status in [
            ConsultationStatus::InProgress,
            ConsultationStatus::Completed,
            ConsultationStatus::Cancelled,
            ConsultationStatus::NoShow,
        ] {
            let c = consultation(now() + Duration::days(3), 60, status);
            assert!(!can_be_cancelled(&c, now(), &policy()), "{status}");
        }
        let pending = consultation(now() + Duration::days(3), 60, ConsultationStatus::Pending);
        assert!(can_be_cancelled(&pending, now(), &policy()));
    }

    #[test]
    fn test_can_be_started_window() {
        let c = consultation(now() - Duration::minutes(10), 60, ConsultationStatus::Confirmed);
        assert!(can_be_started(&c, now(), &policy()));

        let early = consultation(now() + Duration::minutes(15), 60, ConsultationStatus::Confirmed);
        assert!(can_be_started(&early, now(), &policy()));

        let too_early = consultation(
            now() + Duration::minutes(15) + Duration::seconds(1),
            60,
            ConsultationStatus::Confirmed,
        );
        assert!(!can_be_started(&too_early, now(), &policy()));

        let at_end = consultation(now() - Duration::minutes(60), 60, ConsultationStatus::Confirmed);
        assert!(can_be_started(&at_end, now(), &policy()));

        let over = consultation(
            now() - Duration::minutes(60) - Duration::seconds(1),
            60,
            ConsultationStatus::Confirmed,
        );
        assert!(!can_be_started(&over, now(), &policy()));
    }

    #[test]
    fn test_can_be_started_only_when_confirmed() {
        for status in ConsultationStatus::ALL {
            let c = consultation(now(), 60, status);
            assert_eq!(
                can_be_started(&c, now(), &policy()),
                status == ConsultationStatus::Confirmed
            );
        }
    }

    #[test]
    fn test_completed_is_never_upcoming() {
        let c = consultation(now() + Duration::days(2), 60, ConsultationStatus::Completed);
        assert!(!is_upcoming(&c, now()));
        assert!(is_past(&c, now()));
        assert!(is_completed(&c, now()));
    }

    #[test]
    fn test_upcoming_and_past() {
        let c = consultation(now() + Duration::hours(1), 30, ConsultationStatus::Scheduled);
        assert!(is_upcoming(&c, now()));
        assert!(!is_past(&c, now()));

        let old = consultation(now() - Duration::hours(2), 30, ConsultationStatus::Scheduled);
        assert!(!is_upcoming(&old, now()));
        assert!(is_past(&old, now()));

        let at_end = consultation(now() - Duration::minutes(30), 30, ConsultationStatus::Scheduled);
        assert!(!is_past(&at_end, now()));
        assert!(is_in_window(&at_end, now()));
    }

    #[test]
    fn test_can_be_rated() {
        let mut c = consultation(now() - Duration::hours(3), 60, ConsultationStatus::Completed);
        assert!(can_be_rated(&c));
        c.outcome.rating = Some(4);
        assert!(!can_be_rated(&c));

        let scheduled = consultation(now() - Duration::hours(3), 60, ConsultationStatus::Scheduled);
        assert!(!can_be_rated(&scheduled));
    }

    #[test]
    fn test_phase() {
        let t = now();
        let case = |offset: Duration, status| phase(&consultation(t + offset, 60, status), t);
        assert_eq!(case(Duration::hours(1), ConsultationStatus::Scheduled), ConsultationPhase::Upcoming);
        assert_eq!(case(-Duration::minutes(5), ConsultationStatus::Confirmed), ConsultationPhase::Live);
        assert_eq!(case(-Duration::hours(2), ConsultationStatus::Pending), ConsultationPhase::Past);
        assert_eq!(case(Duration::hours(1), ConsultationStatus::InProgress), ConsultationPhase::Live);
        assert_eq!(case(Duration::hours(1), ConsultationStatus::Cancelled), ConsultationPhase::Closed);
        assert_eq!(case(-Duration::hours(1), ConsultationStatus::NoShow), ConsultationPhase::Closed);
    }

    #[test]
    fn test_policy_from_config() {
        let rules = RulesConfig {
            cancellation_notice_hours: 48,
            early_join_minutes: 5,
            low_remaining_threshold: 2,
        };
        let policy = ConsultationPolicy::from(&rules);
        let c = consultation(now() + Duration::hours(30), 60, ConsultationStatus::Scheduled);
        assert!(!can_be_cancelled(&c, now(), &policy));

        let c = consultation(now() + Duration::minutes(10), 60, ConsultationStatus::Confirmed);
        assert!(!can_be_started(&c, now(), &policy));
    }

    #[test]
    fn test_predicates_are_repeatable() {
        let c = consultation(now() + Duration::hours(25), 60, ConsultationStatus::Scheduled);
        let p = policy();
        let first = (
            is_upcoming(&c, now()),
            is_past(&c, now()),
            can_be_cancelled(&c, now(), &p),
            can_be_started(&c, now(), &p),
            can_be_rated(&c),
            phase(&c, now()),
        );
        let second = (
            is_upcoming(&c, now()),
            is_past(&c, now()),
            can_be_cancelled(&c, now(), &p),
            can_be_started(&c, now(), &p),
            can_be_rated(&c),
            phase(&c, now()),
        );
        assert_eq!(first, second);
    }
}
