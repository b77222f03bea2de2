//! # HTTP Server
//!
//! Router assembly, middleware, and the serve loop with graceful shutdown.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TCP accept                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  NormalizePath ── "/subscriptions/" → "/subscriptions"                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Router ── matched route                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  TraceLayer ── one log entry per request (method, uri, remote,          │
//! │     │           status, latency, error text)                            │
//! │     ▼                                                                   │
//! │  CorsLayer ── preflight + response headers                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  handler                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shutdown
//! On SIGINT or SIGTERM the listener stops accepting, in-flight requests get
//! `server.shutdown_timeout_secs` to finish, then the server task is aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderName, HeaderValue, Method, Response};
use axum::routing::get;
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Span};

use crate::config::{ConfigError, CorsConfig};
use crate::error::RequestError;
use crate::routes::{health, subscriptions};
use crate::AppState;

/// The fully assembled service handed to [`serve`].
pub type App = NormalizePath<Router>;

// =============================================================================
// Router
// =============================================================================

/// Builds the route table with CORS and request logging.
pub fn router(state: AppState, cors: &CorsConfig) -> Result<Router, ConfigError> {
    let router = Router::new()
        .route("/health", get(health::health))
        .route(
            "/subscriptions",
            get(subscriptions::list_by_user).post(subscriptions::create),
        )
        .route("/subscriptions/price", get(subscriptions::price_sum))
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get_by_id)
                .patch(subscriptions::update_by_id)
                .delete(subscriptions::delete_by_id),
        )
        .with_state(state)
        .layer(cors_layer(cors)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_request(())
                .on_response(log_response)
                .on_failure(()),
        );

    Ok(router)
}

/// Wraps the router so trailing slashes are ignored during matching.
pub fn app(state: AppState, cors: &CorsConfig) -> Result<App, ConfigError> {
    Ok(NormalizePath::trim_trailing_slash(router(state, cors)?))
}

fn request_span(request: &Request<Body>) -> Span {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        remote = %remote,
    )
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status().as_u16();
    let latency_ms = latency.as_millis() as u64;
    let detail = response
        .extensions()
        .get::<RequestError>()
        .map(|RequestError(text)| text.as_str())
        .unwrap_or_default();

    if response.status().is_server_error() {
        error!(status, latency_ms, error = detail, "Request failed");
    } else if response.status().is_client_error() {
        warn!(status, latency_ms, error = detail, "Request rejected");
    } else {
        info!(status, latency_ms, "Request completed");
    }
}

// =============================================================================
// CORS
// =============================================================================

fn invalid_cors(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue(format!("server.cors.{key}: {value}"))
}

fn is_wildcard(values: &[String]) -> bool {
    values.is_empty() || values.iter().any(|value| value == "*")
}

/// Translates the configured policy into a tower-http layer.
///
/// Wildcards combined with `allow_credentials` switch to mirroring the
/// request, since a literal `*` is not allowed alongside credentials.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let credentials = config.allow_credentials;

    let origins = if is_wildcard(&config.allow_origins) {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let values = config
            .allow_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| invalid_cors("allow_origins", origin))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    let methods = if is_wildcard(&config.allow_methods) {
        if credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        let values = config
            .allow_methods
            .iter()
            .map(|method| {
                let name = method.trim().to_ascii_uppercase();
                Method::from_bytes(name.as_bytes())
                    .map_err(|_| invalid_cors("allow_methods", method))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowMethods::list(values)
    };

    let headers = if is_wildcard(&config.allow_headers) {
        if credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        let values = config
            .allow_headers
            .iter()
            .map(|header| {
                HeaderName::from_bytes(header.trim().as_bytes())
                    .map_err(|_| invalid_cors("allow_headers", header))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowHeaders::list(values)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials);
    if config.max_age_secs > 0 {
        layer = layer.max_age(Duration::from_secs(config.max_age_secs));
    }

    Ok(layer)
}

// =============================================================================
// Serve Loop
// =============================================================================

/// Serves `app` until it fails or `signal` resolves.
///
/// After the signal, new connections are refused and in-flight requests have
/// `grace` to complete before the server task is aborted.
pub async fn serve<F>(
    listener: TcpListener,
    app: App,
    grace: Duration,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let service = ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, service)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return flatten(joined),
        _ = signal => {}
    }

    info!(grace_secs = grace.as_secs(), "Shutdown signal received, draining in-flight requests");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            warn!("Grace period elapsed, aborting remaining requests");
            server.abort();
            Ok(())
        }
    }
}

fn flatten(joined: Result<std::io::Result<()>, tokio::task::JoinError>) -> std::io::Result<()> {
    joined.map_err(std::io::Error::other)?
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
