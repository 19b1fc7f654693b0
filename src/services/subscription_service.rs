use crate::entities::SubscriptionEntity;
use crate::error::AppResult;
use crate::external::{ApiContext, BackendApi};
use crate::models::{BookingEligibility, Subscription, SubscriptionView};
use crate::presentation::Locale;
use crate::rules::UsageSummary;
use crate::services::ViewSettings;
use crate::utils::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct SubscriptionService {
    api: BackendApi,
    clock: Arc<dyn Clock>,
    settings: ViewSettings,
}

impl SubscriptionService {
    pub fn new(api: BackendApi, clock: Arc<dyn Clock>, settings: ViewSettings) -> Self {
        Self {
            api,
            clock,
            settings,
        }
    }

    fn entity<'a>(&self, sub: &'a Subscription, locale: Option<Locale>) -> SubscriptionEntity<'a> {
        let settings = self.settings.localized(locale);
        SubscriptionEntity::new(sub, self.clock.now(), settings.thresholds, settings.locale)
    }

    pub async fn current_subscription(
        &self,
        ctx: &ApiContext,
        locale: Option<Locale>,
    ) -> AppResult<Option<SubscriptionView>> {
        let sub = self.api.current_subscription(ctx).await?;
        Ok(sub.map(|s| self.entity(&s, locale).to_view(&self.settings.currency)))
    }

    pub async fn get_subscription(
        &self,
        ctx: &ApiContext,
        id: &str,
        locale: Option<Locale>,
    ) -> AppResult<SubscriptionView> {
        let sub = self.api.get_subscription(ctx, id).await?;
        Ok(self.entity(&sub, locale).to_view(&self.settings.currency))
    }

    pub async fn usage(&self, ctx: &ApiContext, id: &str) -> AppResult<UsageSummary> {
        let sub = self.api.get_subscription(ctx, id).await?;
        Ok(self.entity(&sub, None).usage())
    }

    pub async fn booking_eligibility(
        &self,
        ctx: &ApiContext,
        id: &str,
    ) -> AppResult<BookingEligibility> {
        let sub = self.api.get_subscription(ctx, id).await?;
        let decision = self.entity(&sub, None).can_book_consultation();
        if let Err(block) = &decision {
            log::info!("Booking blocked for subscription {}: {block}", sub.id);
        }
        Ok(BookingEligibility::from(decision))
    }
}

pub fn build_view(sub: &Subscription, now: DateTime<Utc>, settings: &ViewSettings) -> SubscriptionView {
    SubscriptionEntity::new(sub, now, settings.thresholds, settings.locale).to_view(&settings.currency)
}
