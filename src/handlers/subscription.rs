use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::LocaleQuery;
use crate::middlewares::get_api_context;
use crate::services::SubscriptionService;

#[utoipa::path(
    get,
    path = "/subscriptions/current",
    tag = "subscription",
    params(
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current subscription, or null when there is none", body = crate::models::SubscriptionView),
        (status = 401, description = "Missing or rejected access token"),
        (status = 502, description = "Marketplace API failed or sent invalid data")
    )
)]
pub async fn current_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    locale: web::Query<LocaleQuery>,
) -> Result<HttpResponse> {
    let locale = match locale.resolve() {
        Ok(locale) => locale,
        Err(e) => return Ok(e.error_response()),
    };

    let ctx = match get_api_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service
        .current_subscription(&ctx, locale)
        .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": view
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(
        ("id" = String, Path, description = "Subscription id"),
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Subscription with usage and booking state", body = crate::models::SubscriptionView),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<String>,
    locale: web::Query<LocaleQuery>,
) -> Result<HttpResponse> {
    let locale = match locale.resolve() {
        Ok(locale) => locale,
        Err(e) => return Ok(e.error_response()),
    };

    let ctx = match get_api_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service
        .get_subscription(&ctx, &path, locale)
        .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": view
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}/usage",
    tag = "subscription",
    params(
        ("id" = String, Path, description = "Subscription id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Quota usage for the current period", body = crate::rules::UsageSummary),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_usage(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ctx = match get_api_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service.usage(&ctx, &path).await {
        Ok(usage) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": usage
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}/booking-eligibility",
    tag = "subscription",
    params(
        ("id" = String, Path, description = "Subscription id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Whether another consultation can be booked", body = crate::models::BookingEligibility),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn booking_eligibility(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ctx = match get_api_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service.booking_eligibility(&ctx, &path).await {
        Ok(eligibility) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": eligibility
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    // "/current" is registered before "/{id}" so it is not taken as an id.
    cfg.service(
        web::scope("/subscriptions")
            .route("/current", web::get().to(current_subscription))
            .route("/{id}", web::get().to(get_subscription))
            .route("/{id}/usage", web::get().to(get_usage))
            .route("/{id}/booking-eligibility", web::get().to(booking_eligibility)),
    );
}
