use crate::entities::ConsultationEntity;
use crate::error::AppResult;
use crate::external::{ApiContext, BackendApi, ConsultationQuery};
use crate::models::{Consultation, ConsultationView};
use crate::presentation::Locale;
use crate::services::ViewSettings;
use crate::utils::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct ConsultationService {
    api: BackendApi,
    clock: Arc<dyn Clock>,
    settings: ViewSettings,
}

impl ConsultationService {
    pub fn new(api: BackendApi, clock: Arc<dyn Clock>, settings: ViewSettings) -> Self {
        Self {
            api,
            clock,
            settings,
        }
    }

    pub async fn list_consultations(
        &self,
        ctx: &ApiContext,
        query: &ConsultationQuery,
        locale: Option<Locale>,
    ) -> AppResult<Vec<ConsultationView>> {
        let consultations = self.api.list_consultations(ctx, query).await?;
        let now = self.clock.now();
        Ok(build_views(
            &consultations,
            now,
            &self.settings.localized(locale),
        ))
    }

    pub async fn get_consultation(
        &self,
        ctx: &ApiContext,
        id: &str,
        locale: Option<Locale>,
    ) -> AppResult<ConsultationView> {
        let consultation = self.api.get_consultation(ctx, id).await?;
        let now = self.clock.now();
        warn_on_integrity(&consultation, now);
        Ok(build_view(&consultation, now, &self.settings.localized(locale)))
    }
}

pub fn warn_on_integrity(consultation: &Consultation, now: DateTime<Utc>) {
    if consultation.completed_before_end(now) {
        log::warn!(
            "Consultation {} is completed before its window ends at {}",
            consultation.id,
            consultation.ends_at()
        );
    }
}

pub fn build_view(
    consultation: &Consultation,
    now: DateTime<Utc>,
    settings: &ViewSettings,
) -> ConsultationView {
    ConsultationEntity::new(consultation, now, settings.policy, settings.locale)
        .to_view(&settings.currency)
}

/// Views in snapshot order.
pub fn build_views(
    consultations: &[Consultation],
    now: DateTime<Utc>,
    settings: &ViewSettings,
) -> Vec<ConsultationView> {
    consultations
        .iter()
        .inspect(|c| warn_on_integrity(c, now))
        .map(|c| build_view(c, now, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConsultationStatus;
    use crate::rules::consultation_rules::fixtures::{consultation, now};
    use chrono::Duration;

    #[test]
    fn test_build_views_keeps_order_and_locale() {
        let items = vec![
            consultation(now() + Duration::hours(23), 60, ConsultationStatus::Scheduled),
            consultation(now() - Duration::days(1), 60, ConsultationStatus::Completed),
        ];
        let settings = ViewSettings::default().localized(Some(Locale::Ru));
        let views = build_views(&items, now(), &settings);

        assert_eq!(views.len(), 2);
        assert!(views[0].is_upcoming);
        assert!(!views[0].can_be_cancelled);
        assert!(views[1].can_be_rated);
        assert_eq!(views[1].badge.label, "Завершена");
    }
}
