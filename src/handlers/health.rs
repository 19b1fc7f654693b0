use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::models::HealthResponse;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    })))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middlewares::RequestContextMiddleware;
    use actix_web::{App, test};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_is_public() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddleware)
                .service(web::scope("/api/v1").configure(health_config)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
    }
}
