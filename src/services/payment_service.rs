use crate::entities::PaymentEntity;
use crate::error::AppResult;
use crate::external::{ApiContext, BackendApi};
use crate::models::{Payment, PaymentView};
use crate::presentation::Locale;
use crate::services::ViewSettings;

#[derive(Clone)]
pub struct PaymentService {
    api: BackendApi,
    settings: ViewSettings,
}

impl PaymentService {
    pub fn new(api: BackendApi, settings: ViewSettings) -> Self {
        Self { api, settings }
    }

    pub async fn list_payments(
        &self,
        ctx: &ApiContext,
        locale: Option<Locale>,
    ) -> AppResult<Vec<PaymentView>> {
        let payments = self.api.list_payments(ctx).await?;
        Ok(build_views(&payments, &self.settings.localized(locale)))
    }
}

/// Newest first.
pub fn build_views(payments: &[Payment], settings: &ViewSettings) -> Vec<PaymentView> {
    let mut sorted: Vec<&Payment> = payments.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
        .into_iter()
        .map(|p| PaymentEntity::new(p, settings.locale).to_view(&settings.currency))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;
    use chrono::{TimeZone, Utc};

    fn payment(id: &str, day: u32) -> Payment {
        Payment {
            id: id.into(),
            amount: 2500,
            currency: Some("EUR".into()),
            status: PaymentStatus::Succeeded,
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 8, 0, 0).unwrap(),
            description: None,
            subscription_id: None,
            consultation_id: Some("c-1".into()),
        }
    }

    #[test]
    fn test_newest_first() {
        let views = build_views(
            &[payment("old", 3), payment("new", 20), payment("mid", 9)],
            &ViewSettings::default(),
        );
        let ids: Vec<_> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(views[0].display.amount, "€25.00");
    }
}
