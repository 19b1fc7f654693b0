use crate::dashboard::{self, DashboardSummary};
use crate::error::AppResult;
use crate::external::{ApiContext, BackendApi, ConsultationQuery};
use crate::models::{Consultation, Subscription};
use crate::presentation::Locale;
use crate::services::{ViewSettings, consultation_service, subscription_service};
use crate::utils::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    api: BackendApi,
    clock: Arc<dyn Clock>,
    settings: ViewSettings,
}

impl DashboardService {
    pub fn new(api: BackendApi, clock: Arc<dyn Clock>, settings: ViewSettings) -> Self {
        Self {
            api,
            clock,
            settings,
        }
    }

    pub async fn summary(
        &self,
        ctx: &ApiContext,
        locale: Option<Locale>,
    ) -> AppResult<DashboardSummary> {
        let query = ConsultationQuery::default();
        let (consultations, subscription) = tokio::try_join!(
            self.api.list_consultations(ctx, &query),
            self.api.current_subscription(ctx),
        )?;
        let now = self.clock.now();
        Ok(build_summary(
            &consultations,
            subscription.as_ref(),
            now,
            &self.settings.localized(locale),
        ))
    }
}

pub fn build_summary(
    consultations: &[Consultation],
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
    settings: &ViewSettings,
) -> DashboardSummary {
    let (upcoming, past) = dashboard::split_upcoming_past(consultations, now);
    let view = |c: &Consultation| consultation_service::build_view(c, now, settings);

    for c in consultations {
        consultation_service::warn_on_integrity(c, now);
    }

    DashboardSummary {
        generated_at: now,
        next: dashboard::next_consultation(consultations, now).map(view),
        upcoming: upcoming.into_iter().map(view).collect(),
        past: past.into_iter().map(view).collect(),
        students: dashboard::student_summaries(consultations, now),
        stats: dashboard::stats(consultations, now),
        subscription: subscription.map(|s| subscription_service::build_view(s, now, settings)),
    }
}
