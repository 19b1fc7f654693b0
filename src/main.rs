use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use tutordesk::{
    config::Config,
    external::BackendApi,
    handlers,
    middlewares::{RequestContextMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::{Clock, SystemClock},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;

    let api = BackendApi::new(config.upstream.clone()).context("failed to build upstream client")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings = ViewSettings::from(&config);

    let consultation_service = ConsultationService::new(api.clone(), clock.clone(), settings.clone());
    let subscription_service = SubscriptionService::new(api.clone(), clock.clone(), settings.clone());
    let payment_service = PaymentService::new(api.clone(), settings.clone());
    let dashboard_service = DashboardService::new(api, clock, settings);

    log::info!(
        "Starting HTTP server at {}:{}, upstream {}",
        config.server.host,
        config.server.port,
        config.upstream.base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestContextMiddleware)
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(handlers::query_config())
            .app_data(web::Data::new(consultation_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::health_config)
                    .configure(handlers::consultation_config)
                    .configure(handlers::subscription_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::dashboard_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
