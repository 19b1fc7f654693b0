use crate::models::{Consultation, ConsultationDisplay, ConsultationView};
use crate::presentation::{
    Locale, StatusBadge, StatusPresentation, format_datetime, format_duration, format_money,
    format_relative,
};
use crate::rules::consultation_rules::{self as rules, ConsultationPhase, ConsultationPolicy};
use chrono::{DateTime, Duration, Utc};

/// Read-only view of one consultation at a fixed `now`.
#[derive(Debug, Clone, Copy)]
pub struct ConsultationEntity<'a> {
    consultation: &'a Consultation,
    now: DateTime<Utc>,
    policy: ConsultationPolicy,
    locale: Locale,
}

impl<'a> ConsultationEntity<'a> {
    pub fn new(
        consultation: &'a Consultation,
        now: DateTime<Utc>,
        policy: ConsultationPolicy,
        locale: Locale,
    ) -> Self {
        Self {
            consultation,
            now,
            policy,
            locale,
        }
    }

    pub fn consultation(&self) -> &'a Consultation {
        self.consultation
    }

    pub fn is_upcoming(&self) -> bool {
        rules::is_upcoming(self.consultation, self.now)
    }

    pub fn is_past(&self) -> bool {
        rules::is_past(self.consultation, self.now)
    }

    pub fn is_completed(&self) -> bool {
        rules::is_completed(self.consultation, self.now)
    }

    pub fn can_be_cancelled(&self) -> bool {
        rules::can_be_cancelled(self.consultation, self.now, &self.policy)
    }

    pub fn can_be_started(&self) -> bool {
        rules::can_be_started(self.consultation, self.now, &self.policy)
    }

    pub fn can_be_rated(&self) -> bool {
        rules::can_be_rated(self.consultation)
    }

    pub fn phase(&self) -> ConsultationPhase {
        rules::phase(self.consultation, self.now)
    }

    pub fn time_until_start(&self) -> Duration {
        rules::time_until_start(self.consultation, self.now)
    }

    pub fn badge(&self) -> StatusBadge {
        self.consultation.status.badge(self.locale)
    }

    pub fn formatted_price(&self, fallback_currency: &str) -> Option<String> {
        let currency = self
            .consultation
            .currency
            .as_deref()
            .unwrap_or(fallback_currency);
        self.consultation
            .price
            .map(|amount| format_money(amount, currency, self.locale))
    }

    pub fn to_view(&self, fallback_currency: &str) -> ConsultationView {
        let c = self.consultation;
        ConsultationView {
            id: c.id.clone(),
            teacher_id: c.teacher_id.clone(),
            consultation_type: c.participant.consultation_type(),
            student_id: c.participant.student_id().map(str::to_string),
            group_id: c.participant.group_id().map(str::to_string),
            subject: c.subject.clone(),
            status: c.status,
            badge: self.badge(),
            phase: self.phase(),
            scheduled_at: c.scheduled_at,
            ends_at: c.ends_at(),
            duration_minutes: c.duration_minutes,
            is_upcoming: self.is_upcoming(),
            is_past: self.is_past(),
            can_be_cancelled: self.can_be_cancelled(),
            can_be_started: self.can_be_started(),
            can_be_rated: self.can_be_rated(),
            rating: c.outcome.rating,
            feedback: c.outcome.feedback.clone(),
            report: c.outcome.report.clone(),
            meeting_url: c.meeting_url.clone(),
            display: ConsultationDisplay {
                scheduled_at: format_datetime(&c.scheduled_at, self.locale),
                duration: format_duration(c.duration_minutes, self.locale),
                starts: format_relative(self.time_until_start(), self.locale),
                price: self.formatted_price(fallback_currency),
            },
        }
    }
}
