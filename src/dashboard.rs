//! Derived dashboard state over a list of consultation snapshots.

use crate::models::{Consultation, ConsultationStatus, ConsultationView, SubscriptionView};
use crate::rules::consultation_rules::{self as rules, ConsultationPhase};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, PartialEq, ToSchema)]
pub struct DashboardStats {
    pub total: usize,
    pub upcoming: usize,
    pub live: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub no_show: usize,
    pub awaiting_rating: usize,
    /// Mean of the ratings present, 1.0..=5.0.
    pub average_rating: Option<f64>,
    /// completed / (completed + no-show), in percent.
    pub attendance_rate: Option<u8>,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct StudentSummary {
    pub student_id: String,
    pub total: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub next_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub next: Option<ConsultationView>,
    pub upcoming: Vec<ConsultationView>,
    pub past: Vec<ConsultationView>,
    pub students: Vec<StudentSummary>,
    pub stats: DashboardStats,
    pub subscription: Option<SubscriptionView>,
}

/// Upcoming sorted soonest first; past sorted most recent first. Live and
/// closed-but-future consultations appear in neither list.
pub fn split_upcoming_past(
    consultations: &[Consultation],
    now: DateTime<Utc>,
) -> (Vec<&Consultation>, Vec<&Consultation>) {
    let mut upcoming: Vec<&Consultation> = consultations
        .iter()
        .filter(|c| rules::is_upcoming(c, now))
        .collect();
    let mut past: Vec<&Consultation> = consultations
        .iter()
        .filter(|c| rules::is_past(c, now))
        .collect();

    upcoming.sort_by_key(|c| c.scheduled_at);
    past.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    (upcoming, past)
}

pub fn next_consultation(consultations: &[Consultation], now: DateTime<Utc>) -> Option<&Consultation> {
    consultations
        .iter()
        .filter(|c| rules::is_upcoming(c, now))
        .min_by_key(|c| c.scheduled_at)
}

/// Individual consultations keyed by student id. Group sessions are skipped.
pub fn group_by_student(consultations: &[Consultation]) -> BTreeMap<&str, Vec<&Consultation>> {
    let mut groups: BTreeMap<&str, Vec<&Consultation>> = BTreeMap::new();
    for c in consultations {
        if let Some(student_id) = c.participant.student_id() {
            groups.entry(student_id).or_default().push(c);
        }
    }
    groups
}

pub fn student_summaries(consultations: &[Consultation], now: DateTime<Utc>) -> Vec<StudentSummary> {
    group_by_student(consultations)
        .into_iter()
        .map(|(student_id, items)| StudentSummary {
            student_id: student_id.to_string(),
            total: items.len(),
            upcoming: items.iter().filter(|c| rules::is_upcoming(c, now)).count(),
            completed: items
                .iter()
                .filter(|c| c.status == ConsultationStatus::Completed)
                .count(),
            next_at: items
                .iter()
                .filter(|c| rules::is_upcoming(c, now))
                .map(|c| c.scheduled_at)
                .min(),
        })
        .collect()
}

pub fn stats(consultations: &[Consultation], now: DateTime<Utc>) -> DashboardStats {
    let mut s = DashboardStats {
        total: consultations.len(),
        ..Default::default()
    };
    let mut rating_sum = 0u32;
    let mut rated = 0u32;

    for c in consultations {
        if rules::is_upcoming(c, now) {
            s.upcoming += 1;
        }
        if rules::phase(c, now) == ConsultationPhase::Live {
            s.live += 1;
        }
        if rules::can_be_rated(c) {
            s.awaiting_rating += 1;
        }
        match c.status {
            ConsultationStatus::Completed => s.completed += 1,
            ConsultationStatus::Cancelled => s.cancelled += 1,
            ConsultationStatus::NoShow => s.no_show += 1,
            _ => {}
        }
        if let Some(rating) = c.rating() {
            rating_sum += u32::from(rating);
            rated += 1;
        }
    }

    if rated > 0 {
        s.average_rating = Some((f64::from(rating_sum) / f64::from(rated) * 10.0).round() / 10.0);
    }
    let attended_or_missed = s.completed + s.no_show;
    if attended_or_missed > 0 {
        s.attendance_rate =
            Some(((s.completed * 100 + attended_or_missed / 2) / attended_or_missed) as u8);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;
    use crate::rules::consultation_rules::fixtures::{consultation, now};
    use chrono::Duration;

    fn sample() -> Vec<Consultation> {
        let mut a = consultation(now() + Duration::days(2), 60, ConsultationStatus::Scheduled);
        a.id = "a".into();
        let mut b = consultation(now() + Duration::hours(3), 60, ConsultationStatus::Confirmed);
        b.id = "b".into();
        b.participant = Participant::Individual {
            student_id: "s-2".into(),
        };
        let mut c = consultation(now() - Duration::days(1), 60, ConsultationStatus::Completed);
        c.id = "c".into();
        c.outcome.rating = Some(5);
        let mut d = consultation(now() - Duration::days(3), 60, ConsultationStatus::Completed);
        d.id = "d".into();
        d.outcome.rating = Some(4);
        let mut e = consultation(now() - Duration::days(5), 60, ConsultationStatus::NoShow);
        e.id = "e".into();
        let mut f = consultation(now() - Duration::minutes(10), 60, ConsultationStatus::InProgress);
        f.id = "f".into();
        f.participant = Participant::Group {
            group_id: "g-1".into(),
        };
        let mut g = consultation(now() - Duration::days(6), 60, ConsultationStatus::Completed);
        g.id = "g".into();
        vec![a, b, c, d, e, f, g]
    }

    fn ids(items: &[&Consultation]) -> Vec<String> {
        items.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_split_upcoming_past() {
        let all = sample();
        let (upcoming, past) = split_upcoming_past(&all, now());
        assert_eq!(ids(&upcoming), vec!["b", "a"]);
        assert_eq!(ids(&past), vec!["c", "d", "e", "g"]);
    }

    #[test]
    fn test_next_consultation() {
        let all = sample();
        assert_eq!(next_consultation(&all, now()).map(|c| c.id.as_str()), Some("b"));
        assert!(next_consultation(&all[2..], now()).is_none());
    }

    #[test]
    fn test_group_by_student_skips_groups() {
        let all = sample();
        let groups = group_by_student(&all);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["s-1", "s-2"]);
        assert_eq!(groups["s-1"].len(), 5);

        let summaries = student_summaries(&all, now());
        assert_eq!(summaries[0].student_id, "s-1");
        assert_eq!(summaries[0].upcoming, 1);
        assert_eq!(summaries[0].completed, 3);
        assert_eq!(summaries[1].next_at, Some(now() + Duration::hours(3)));
    }

    #[test]
    fn test_stats() {
        let s = stats(&sample(), now());
        assert_eq!(s.total, 7);
        assert_eq!(s.upcoming, 2);
        assert_eq!(s.live, 1);
        assert_eq!(s.completed, 3);
        assert_eq!(s.no_show, 1);
        assert_eq!(s.cancelled, 0);
        assert_eq!(s.awaiting_rating, 1);
        assert_eq!(s.average_rating, Some(4.5));
        assert_eq!(s.attendance_rate, Some(75));
    }

    #[test]
    fn test_stats_empty() {
        let s = stats(&[], now());
        assert_eq!(s, DashboardStats::default());
    }
}
