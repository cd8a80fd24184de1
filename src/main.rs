mod telemetry;

use actix_web::{get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;
use std::env;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use telemetry::{attrs, Logger};

#[derive(Deserialize)]
struct HelloQuery {
    user: Option<String>,
}

#[get("/")]
async fn hello(
    req: HttpRequest,
    query: web::Query<HelloQuery>,
    logger: web::Data<Logger>,
) -> impl Responder {
    let user = query.user.as_deref().unwrap_or("anonymous");

    logger.info(
        "Handled response",
        attrs(json!({
            "request": {
                "method": req.method().as_str(),
                "url": req.uri().to_string(),
            },
            "user": user,
            "source": "api/hello",
        })),
    );

    HttpResponse::Ok().body(format!("Hello, {}!", user))
}

#[get("/error")]
async fn fail(logger: web::Data<Logger>) -> impl Responder {
    let err = std::io::Error::other("Whoops!");

    logger.error(
        "API error",
        attrs(json!({
            "error": err.to_string(),
            "stack": std::backtrace::Backtrace::force_capture().to_string(),
            "source": "api/error",
        })),
    );

    HttpResponse::InternalServerError().json(json!({ "error": true }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Local diagnostics for the bridge's own warnings and errors.
fn init_diagnostics() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_diagnostics();

    // One facade for the whole process; the variant is picked here, once.
    let logger = web::Data::new(Logger::from_env());

    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a number");

    tracing::info!("Starting server on port {}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(logger.clone())
            .service(hello)
            .service(fail)
            .service(health)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    // Flush any batched records before the process exits.
    telemetry::global().shutdown();

    Ok(())
}
