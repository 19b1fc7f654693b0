use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppResult;
use crate::external::ConsultationQuery;
use crate::handlers::LocaleQuery;
use crate::middlewares::get_api_context;
use crate::models::ConsultationStatus;
use crate::services::ConsultationService;
use serde::Deserialize;

/// Filters as the caller sends them; the status is parsed strictly.
#[derive(Debug, Default, Deserialize)]
pub struct ConsultationListQuery {
    pub status: Option<String>,
    pub student_id: Option<String>,
    pub group_id: Option<String>,
}

impl ConsultationListQuery {
    pub fn to_filter(&self) -> AppResult<ConsultationQuery> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ConsultationStatus>)
            .transpose()?;
        Ok(ConsultationQuery {
            status,
            student_id: self.student_id.clone(),
            group_id: self.group_id.clone(),
        })
    }
}

#[utoipa::path(
    get,
    path = "/consultations",
    tag = "consultation",
    params(
        ("status" = Option<ConsultationStatus>, Query, description = "Only consultations in this status"),
        ("student_id" = Option<String>, Query, description = "Only this student's consultations"),
        ("group_id" = Option<String>, Query, description = "Only this group's consultations"),
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Consultations with derived state", body = [crate::models::ConsultationView]),
        (status = 401, description = "Missing or rejected access token"),
        (status = 502, description = "Marketplace API failed or sent invalid data")
    )
)]
pub async fn list_consultations(
    consultation_service: web::Data<ConsultationService>,
    req: HttpRequest,
    query: web::Query<ConsultationListQuery>,
    locale: web::Query<LocaleQuery>,
) -> Result<HttpResponse> {
    let filter = match query.to_filter() {
        Ok(filter) => filter,
        Err(e) => return Ok(e.error_response()),
    };
    let locale = match locale.resolve() {
        Ok(locale) => locale,
        Err(e) => return Ok(e.error_response()),
    };

    let ctx = match get_api_context(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match consultation_service
        .list_consultations(&ctx, &filter, locale)
        .await
    {
        Ok(views) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": views
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/consultations/{id}",
    tag = "consultation",
    params(
        ("id" = String, Path, description = "Consultation id"),
        ("locale" = Option<String>, Query, description = "en or ru")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Consultation with derived state", body = crate::models::ConsultationView),
        (status = 401, description = "Missing or rejected access token"),
        (status = 404, description = "Consultation not found"),
        (status = 502, description = "Marketplace API failed or sent invalid data")
    )
)]
pub async fn get_consultation(
    consultation_service: web::Data<ConsultationService>,
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

    match consultation_service
        .get_consultation(&ctx, &path, locale)
        .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": view
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn consultation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/consultations")
            .route("", web::get().to(list_consultations))
            .route("/{id}", web::get().to(get_consultation)),
    );
}
