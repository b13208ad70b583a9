use std::{future::IntoFuture as _, io, sync::OnceLock};

use application::{config, router, Args, Config};
use futures::TryFutureExt as _;
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::writer::MakeWriterExt as _,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// Level of logs, applied once the [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    // Warnings and errors go to stderr, everything else to stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(
                    io::stderr
                        .with_max_level(log::Level::WARN)
                        .or_else(io::stdout),
                )
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                            >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let mut postgres = Postgres::new(&postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;
    let report = migrations::runner()
        .run_async(&mut postgres)
        .await
        .map_err(|e| {
            log::error!("failed to run database migrations: {e}");
        })?;
    log::info!(
        "applied {} database migrations",
        report.applied_migrations().len(),
    );

    let app = router(
        Service::new(service.into(), postgres),
        cors(&server.cors)?,
    );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;
    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .into_future()
        .map_err(|e| log::error!("webserver failed: {e}"))
        .await
}

/// Builds a [`CorsLayer`] allowing GraphQL requests from the configured
/// origins.
fn cors(conf: &config::Cors) -> Result<CorsLayer, ()> {
    let layer = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ]);
    if conf.origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = conf
        .origins
        .iter()
        .map(|origin| {
            origin.parse::<http::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not a valid CORS origin: {e}");
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(origins))
}
