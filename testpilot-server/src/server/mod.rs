use axum::{
    extract::FromRequest,
    response::IntoResponse,
    routing::{get, post, IntoMakeService},
    Router,
};
use derive_builder::Builder;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, future::IntoFuture, net::SocketAddr, sync::Arc};
use testpilot_core::{CompletionClient, RelayConfig};
use tower_http::trace::TraceLayer;
use tracing::{instrument, Instrument, Level};

use crate::handlers;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(crate::error::Error))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(new, Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub socket_addr: SocketAddr,
    pub relay: RelayConfig,
}

#[derive(Builder)]
pub struct HttpServer {
    #[builder(setter(into))]
    config: Arc<Config>,
    #[builder(setter(into))]
    context: Arc<Context>,
}

pub struct Context {
    pub client: CompletionClient,
}

impl Context {
    /// Build the shared handler state, reading the upstream credential from
    /// the environment.
    pub fn new(config: &Config) -> testpilot_core::Result<Self> {
        let client = CompletionClient::from_env(&config.relay)?;
        Ok(Context { client })
    }
}

#[instrument]
async fn health_check_handler() -> &'static str {
    tracing::debug!("health checked");
    "OK"
}

pub fn build_service(context: Arc<Context>) -> IntoMakeService<Router> {
    let router = Router::new()
        .route(&ServiceRoutes::Index.to_string(), get(handlers::index))
        .route(
            &ServiceRoutes::HealthCheck.to_string(),
            get(health_check_handler),
        )
        .route(&ServiceRoutes::Ask.to_string(), post(handlers::ask))
        .layer(TraceLayer::new_for_http())
        .with_state(context);

    router.into_make_service()
}

enum ServiceRoutes {
    Index,
    HealthCheck,
    Ask,
}

impl Display for ServiceRoutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceRoutes::Index => write!(f, "/"),
            ServiceRoutes::HealthCheck => write!(f, "/health-check"),
            ServiceRoutes::Ask => write!(f, "/api/ask"),
        }
    }
}

impl HttpServer {
    pub async fn start(self) -> anyhow::Result<()> {
        let context = self.context;
        let socket_addr = self.config.socket_addr;

        let listener = tokio::net::TcpListener::bind(&socket_addr).await?;

        let server_span = tracing::span!(Level::INFO, "server span");
        tracing::info!("starting server on {socket_addr}");

        axum::serve(listener, build_service(context))
            .into_future()
            .instrument(server_span)
            .await?;

        tracing::info!("HTTP server shutdown");

        Ok(())
    }
}
