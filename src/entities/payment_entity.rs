use crate::models::{Payment, PaymentDisplay, PaymentStatus, PaymentView};
use crate::presentation::{Locale, StatusBadge, StatusPresentation, format_datetime, format_money};

#[derive(Debug, Clone, Copy)]
pub struct PaymentEntity<'a> {
    payment: &'a Payment,
    locale: Locale,
}

impl<'a> PaymentEntity<'a> {
    pub fn new(payment: &'a Payment, locale: Locale) -> Self {
        Self { payment, locale }
    }

    pub fn is_successful(&self) -> bool {
        self.payment.status == PaymentStatus::Succeeded
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self.payment.status,
            PaymentStatus::Pending | PaymentStatus::Processing
        )
    }

    pub fn is_failed(&self) -> bool {
        self.payment.status == PaymentStatus::Failed
    }

    pub fn is_refunded(&self) -> bool {
        self.payment.status == PaymentStatus::Refunded
    }

    pub fn badge(&self) -> StatusBadge {
        self.payment.status.badge(self.locale)
    }

    pub fn formatted_amount(&self, fallback_currency: &str) -> String {
        let currency = self.payment.currency.as_deref().unwrap_or(fallback_currency);
        format_money(self.payment.amount, currency, self.locale)
    }

    pub fn to_view(&self, fallback_currency: &str) -> PaymentView {
        let p = self.payment;
        PaymentView {
            id: p.id.clone(),
            amount: p.amount,
            currency: p
                .currency
                .clone()
                .unwrap_or_else(|| fallback_currency.to_string()),
            status: p.status,
            badge: self.badge(),
            is_successful: self.is_successful(),
            created_at: p.created_at,
            description: p.description.clone(),
            subscription_id: p.subscription_id.clone(),
            consultation_id: p.consultation_id.clone(),
            display: PaymentDisplay {
                amount: self.formatted_amount(fallback_currency),
                created_at: format_datetime(&p.created_at, self.locale),
            },
        }
    }
}
