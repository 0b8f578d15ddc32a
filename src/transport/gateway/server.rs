use super::handlers::{handle_callback, handle_health, handle_verify_url};
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS};

use crate::config::Config;
use crate::core::AnswerEngine;
use crate::core::tasks::create_task_store;
use crate::media::{AttachmentFetcher, HttpAttachmentFetcher};
use crate::security::{EnvelopeCodec, ThreadRngTokenSource, TokenSource};
use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
pub fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway using axum with proper HTTP/1.1 compliance.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the callback endpoint would be exposed to the internet.\n\
             Fix: use --host 127.0.0.1 (default) behind a reverse proxy, or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Wire the codec, task store, and attachment fetcher described by `config`.
pub async fn build_state(config: &Config) -> Result<AppState> {
    config.validate().context("invalid gateway configuration")?;

    let material = Arc::new(
        config
            .crypto_material()
            .context("load callback crypto material")?,
    );
    let random: Arc<dyn TokenSource> = Arc::new(ThreadRngTokenSource);

    let store = create_task_store(&config.engine, &config.workspace_dir, Arc::clone(&random))
        .await
        .context("create task store for gateway")?;
    let fetcher: Arc<dyn AttachmentFetcher> = Arc::new(
        HttpAttachmentFetcher::new(
            config.attachments.fetch_timeout(),
            config.attachments.max_bytes,
        )
        .context("build attachment fetcher")?,
    );

    Ok(AppState {
        codec: Arc::new(EnvelopeCodec::new(
            Arc::clone(&material),
            Arc::clone(&random),
        )),
        verify_codec: Arc::new(EnvelopeCodec::new(
            Arc::new(material.with_recipient("")),
            Arc::clone(&random),
        )),
        engine: Arc::new(AnswerEngine::new(store)),
        fetcher,
        ids: random,
        id_length: config.engine.id_length,
    })
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config).await?;
    let prefix = config.gateway.normalized_prefix();

    tracing::info!(
        addr = %display_addr,
        store = state.engine.store().name(),
        max_steps = config.engine.max_steps,
        "gateway starting"
    );
    print_gateway_banner(&display_addr, &prefix);

    let app = build_app(state, &prefix);
    axum::serve(listener, app)
        .await
        .context("serve HTTP gateway")?;

    Ok(())
}

fn print_gateway_banner(display_addr: &str, prefix: &str) {
    println!("Gateway listening on {display_addr}");
    println!("  GET  {prefix}/{{bot_id}}  -> URL verification");
    println!("  POST {prefix}/{{bot_id}}  -> encrypted callback");
    println!("  GET  /health");
}

/// Router with the callback routes mounted under `prefix`.
pub fn build_app(state: AppState, prefix: &str) -> Router {
    let callback_path = format!("{prefix}/{{bot_id}}");

    Router::new()
        .route("/health", get(handle_health))
        .route(&callback_path, get(handle_verify_url).post(handle_callback))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}
