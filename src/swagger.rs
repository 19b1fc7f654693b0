use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::{DashboardStats, DashboardSummary, StudentSummary};
use crate::handlers;
use crate::models::*;
use crate::presentation::{BadgeColor, Locale, StatusBadge};
use crate::rules::{BookingBlock, ConsultationPhase, UsageSummary};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::consultation::list_consultations,
        handlers::consultation::get_consultation,
        handlers::subscription::current_subscription,
        handlers::subscription::get_subscription,
        handlers::subscription::get_usage,
        handlers::subscription::booking_eligibility,
        handlers::payment::list_payments,
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            HealthResponse,
            ApiError,
            ConsultationStatus,
            ConsultationType,
            ConsultationPhase,
            ConsultationView,
            ConsultationDisplay,
            LessonReport,
            SubscriptionStatus,
            BillingInterval,
            ConsultationQuota,
            SubscriptionView,
            SubscriptionDisplay,
            UsageSummary,
            BookingBlock,
            BookingEligibility,
            PaymentStatus,
            PaymentView,
            PaymentDisplay,
            StatusBadge,
            BadgeColor,
            Locale,
            DashboardSummary,
            DashboardStats,
            StudentSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "consultation", description = "Consultations with derived lifecycle state"),
        (name = "subscription", description = "Subscription usage and booking eligibility"),
        (name = "payment", description = "Payment history"),
        (name = "dashboard", description = "Aggregated tutor dashboard"),
    ),
    info(
        title = "Tutordesk API",
        version = "0.1.0",
        description = "Read-only view layer over the tutoring marketplace API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
