use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::LocaleQuery;
use crate::middlewares::get_api_context;
use crate::services::DashboardService;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    params(
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Upcoming and past consultations, stats and subscription", body = crate::dashboard::DashboardSummary),
        (status = 401, description = "Missing or rejected access token"),
        (status = 502, description = "Marketplace API failed or sent invalid data")
    )
)]
pub async fn get_dashboard(
    dashboard_service: web::Data<DashboardService>,
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

    match dashboard_service.summary(&ctx, locale).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard));
}
