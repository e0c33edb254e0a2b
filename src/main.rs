use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use otel_jaeger_bundle::telemetry::{
    init_subscriber, startup_subscriber, LogSettings, APP_VERSION_KEY,
};
use otel_jaeger_bundle::{
    AppContext, ConfigBundle, Container, ContainerError, LoggingBundle, MapConfig, OtelBundle,
    Tracing,
};
use serde::Deserialize;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

#[derive(Deserialize)]
struct HelloQuery {
    user: Option<String>,
}

#[get("/")]
#[tracing::instrument(skip(query), fields(user))]
async fn hello(query: web::Query<HelloQuery>) -> impl Responder {
    let user = query.user.as_deref().unwrap_or("anonymous");
    tracing::Span::current().record("user", user);
    info!(user = user, "Hello endpoint called");
    HttpResponse::Ok().body(format!("Hello, {}!", user))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

fn compose(config: MapConfig) -> Result<Container, ContainerError> {
    let context = AppContext::new().with_value(APP_VERSION_KEY, env!("CARGO_PKG_VERSION").to_string());
    let mut container = Container::new(context);
    container
        .apply(ConfigBundle::new(config))?
        .apply(LoggingBundle)?
        .apply(OtelBundle::new())?;
    Ok(container)
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // `APP_CONFIG` may point at a JSON file; environment variables override it.
    let file_config = match env::var("APP_CONFIG") {
        Ok(path) => MapConfig::from_json(&std::fs::read_to_string(path)?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
        Err(_) => MapConfig::new(),
    };
    let config = file_config.merge(MapConfig::from_env());

    let startup_settings = LogSettings::from_config(&config);
    let container = tracing::subscriber::with_default(startup_subscriber(&startup_settings), || {
        compose(config)
    })
    .map_err(io::Error::other)?;

    let tracing_state = container.get::<Tracing>().map_err(io::Error::other)?;
    let log_settings = container.get::<LogSettings>().map_err(io::Error::other)?;
    init_subscriber(&log_settings, &tracing_state).map_err(io::Error::other)?;

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    info!(tracing_enabled = tracing_state.is_enabled(), "Starting server on port {}", port);

    HttpServer::new(|| {
        App::new()
            .wrap(TracingLogger::default())
            .service(hello)
            .service(health)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    if let Err(e) = tracing_state.shutdown() {
        warn!(error = %e, "tracer provider shutdown failed");
    }
    Ok(())
}
