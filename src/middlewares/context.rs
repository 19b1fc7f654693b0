use crate::error::AppError;
use crate::external::ApiContext;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const DEVICE_ID_HEADER: &str = "X-Device-Id";

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
                "/api/v1/health",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        self.exact_paths.contains(&path)
            || self
                .prefix_paths
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn device_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(DEVICE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Turns the caller's bearer token and device id into an [`ApiContext`]
/// request extension. The token is not verified here; the marketplace API
/// does that when we forward it.
pub struct RequestContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextMiddlewareService {
            service,
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct RequestContextMiddlewareService<S> {
    service: S,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for RequestContextMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight
        if req.method() == Method::OPTIONS || self.public_paths.is_public_path(req.path()) {
            return Box::pin(self.service.call(req));
        }

        match bearer_token(&req) {
            Some(token) => {
                let mut ctx = ApiContext::new(token);
                if let Some(id) = device_id(&req) {
                    ctx = ctx.with_device_id(id);
                }
                req.extensions_mut().insert(ctx);
                Box::pin(self.service.call(req))
            }
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

pub fn get_api_context(req: &HttpRequest) -> Result<ApiContext, AppError> {
    req.extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    async fn echo(req: HttpRequest) -> HttpResponse {
        match get_api_context(&req) {
            Ok(ctx) => HttpResponse::Ok().body(format!(
                "{}|{}",
                ctx.access_token,
                ctx.device_id.unwrap_or_default()
            )),
            Err(_) => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_web::test]
    async fn test_context_is_attached() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddleware)
                .route("/api/v1/echo", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/echo")
            .insert_header(("Authorization", "Bearer tok-123"))
            .insert_header((DEVICE_ID_HEADER, "dev-9"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "tok-123|dev-9");
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddleware)
                .route("/api/v1/echo", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/echo")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_public_paths_pass_through() {
        let app = test::init_service(
            App::new()
                .wrap(RequestContextMiddleware)
                .route("/api/v1/health", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }
}
