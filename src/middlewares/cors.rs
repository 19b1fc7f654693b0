use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        // Read-only surface
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .allowed_header(crate::middlewares::DEVICE_ID_HEADER)
        .max_age(3600)
}
