use crate::models::{BookingEligibility, Subscription, SubscriptionDisplay, SubscriptionView};
use crate::presentation::{Locale, StatusBadge, StatusPresentation, format_date, format_money};
use crate::rules::usage::{self, BookingBlock, Remaining, UsageSummary, UsageThresholds};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub struct SubscriptionEntity<'a> {
    subscription: &'a Subscription,
    now: DateTime<Utc>,
    thresholds: UsageThresholds,
    locale: Locale,
}

impl<'a> SubscriptionEntity<'a> {
    pub fn new(
        subscription: &'a Subscription,
        now: DateTime<Utc>,
        thresholds: UsageThresholds,
        locale: Locale,
    ) -> Self {
        Self {
            subscription,
            now,
            thresholds,
            locale,
        }
    }

    pub fn subscription(&self) -> &'a Subscription {
        self.subscription
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active_at(self.now)
    }

    pub fn remaining(&self) -> Remaining {
        usage::remaining(self.subscription)
    }

    pub fn usage_percentage(&self) -> u8 {
        usage::usage_percentage(self.subscription)
    }

    pub fn is_exhausted(&self) -> bool {
        usage::is_exhausted(self.subscription)
    }

    pub fn is_low_usage(&self) -> bool {
        usage::is_low_usage(self.subscription, &self.thresholds)
    }

    pub fn days_until_renewal(&self) -> i64 {
        usage::days_until_renewal(self.subscription.current_period_end, self.now)
    }

    pub fn usage(&self) -> UsageSummary {
        usage::summarize(self.subscription, &self.thresholds, self.now)
    }

    pub fn can_book_consultation(&self) -> Result<(), BookingBlock> {
        usage::can_book_consultation(self.subscription, self.now)
    }

    pub fn badge(&self) -> StatusBadge {
        self.subscription.status.badge(self.locale)
    }

    fn renewal_text(&self) -> String {
        let s = self.subscription;
        let date = format_date(&s.current_period_end, self.locale);
        match (self.locale, s.will_renew(), s.cancel_at_period_end) {
            (Locale::En, true, _) => format!("Renews on {date}"),
            (Locale::En, false, true) => format!("Ends on {date}"),
            (Locale::En, false, false) => format!("Period ends on {date}"),
            (Locale::Ru, true, _) => format!("Продлится {date}"),
            (Locale::Ru, false, true) => format!("Закончится {date}"),
            (Locale::Ru, false, false) => format!("Период заканчивается {date}"),
        }
    }

    pub fn to_view(&self, fallback_currency: &str) -> SubscriptionView {
        let s = self.subscription;
        let currency = s.plan.currency.as_deref().unwrap_or(fallback_currency);
        SubscriptionView {
            id: s.id.clone(),
            user_id: s.user_id.clone(),
            student_id: s.student_id.clone(),
            plan: s.plan.clone(),
            status: s.status,
            badge: self.badge(),
            is_active: self.is_active(),
            will_renew: s.will_renew(),
            auto_renew: s.auto_renew,
            cancel_at_period_end: s.cancel_at_period_end,
            current_period_start: s.current_period_start,
            current_period_end: s.current_period_end,
            usage: self.usage(),
            booking: BookingEligibility::from(self.can_book_consultation()),
            display: SubscriptionDisplay {
                period_end: format_date(&s.current_period_end, self.locale),
                price: s
                    .plan
                    .price
                    .map(|amount| format_money(amount, currency, self.locale)),
                renewal: self.renewal_text(),
            },
        }
    }
}
