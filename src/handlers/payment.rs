use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::handlers::LocaleQuery;
use crate::middlewares::get_api_context;
use crate::services::PaymentService;

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payment",
    params(
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Payment history, newest first", body = [crate::models::PaymentView]),
        (status = 401, description = "Missing or rejected access token"),
        (status = 502, description = "Marketplace API failed or sent invalid data")
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
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

    match payment_service.list_payments(&ctx, locale).await {
        Ok(views) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": views
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/payments").route("", web::get().to(list_payments)));
}
