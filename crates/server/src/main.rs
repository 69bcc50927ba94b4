use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use genproto::comment::comment_service_server::CommentServiceServer;
use prometheus_client::encoding::text::encode;
use shared::{
    cache::CacheStore,
    config::{Config, ConnectionManager, RedisClient},
    state::AppState,
    utils::{Telemetry, init_logger},
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

mod service;

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    if let Err(e) = encode(&mut buffer, &state.registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

async fn shutdown_signal(server: &'static str) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl_c: {e}");
    }
    info!("{server} shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = config
        .otel_endpoint
        .as_deref()
        .map(|endpoint| Telemetry::new("comment-server", endpoint));
    let tracer_provider = telemetry
        .as_ref()
        .map(Telemetry::init_tracer)
        .transpose()?;
    let logger_provider = telemetry
        .as_ref()
        .map(Telemetry::init_logger)
        .transpose()?;

    init_logger(logger_provider.as_ref());

    let db_pool = ConnectionManager::new_pool(&config.database_url, config.run_migrations)
        .await
        .context("Failed to initialize database pool")?;

    let cache = match &config.redis_url {
        Some(url) => {
            let redis = RedisClient::new(url).context("Invalid Redis URL")?;
            redis
                .ping()
                .await
                .context("Failed to connect to Redis")?;
            info!("Connected to Redis");
            Some(CacheStore::new(redis.client))
        }
        None => None,
    };

    let state = Arc::new(AppState::new(
        db_pool,
        cache,
        Duration::from_secs(config.cache_ttl_secs),
    ));

    let service_comment =
        service::comment::CommentServiceImpl::new(state.di_container.comment_service.clone());

    let grpc_addr = config.grpc_addr;
    let grpc_server = tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(CommentServiceServer::new(service_comment))
            .serve_with_shutdown(grpc_addr, shutdown_signal("gRPC server"))
            .await
    });

    let app = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind(config.metrics_addr)
        .await
        .context("Failed to bind Axum metrics listener")?;

    info!("gRPC Server running on {grpc_addr}");
    info!("Metrics Server running on http://{}", config.metrics_addr);

    let axum_server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal("Metrics server"))
            .await
    });

    let (grpc_result, axum_result) = tokio::try_join!(grpc_server, axum_server)?;

    grpc_result.context("gRPC server failed")?;
    axum_result.context("Axum server failed")?;

    let mut shutdown_errors = Vec::new();

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            shutdown_errors.push(format!("tracer provider: {e}"));
        }
    }
    if let Some(provider) = logger_provider {
        if let Err(e) = provider.shutdown() {
            shutdown_errors.push(format!("logger provider: {e}"));
        }
    }

    if !shutdown_errors.is_empty() {
        anyhow::bail!(
            "Failed to shutdown providers:\n{}",
            shutdown_errors.join("\n")
        );
    }

    Ok(())
}
