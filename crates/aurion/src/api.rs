use std::net::IpAddr;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::advisor::Advisor;
use crate::advisor::Clock;
use crate::advisor::Hour;
use crate::error::AdvisorError;
use crate::model::Recommendation;
use crate::model::Snapshot;
use crate::summary::Summary;

/// Response for the /v1/ping endpoint
#[derive(Serialize)]
struct PingResponse {
    status: String,
}

/// Response for the /v1/info endpoint
#[derive(Serialize)]
struct InfoResponse {
    version: String,
    hostname: String,
}

#[derive(Debug, Deserialize)]
struct RecommendQuery {
    hour: Option<u8>,
}

/// Response for the /v1/recommendations endpoint
#[derive(Serialize)]
struct RecommendResponse {
    hour: Hour,
    recommendations: Vec<Recommendation>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Advisor(AdvisorError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!("Rejecting request: {}", self);
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Shared application state
struct AppState<C> {
    version: &'static str,
    advisor: Advisor<C>,
}

/// Handler for GET /v1/ping
#[tracing::instrument]
async fn ping() -> impl IntoResponse {
    tracing::debug!("Handling /v1/ping request");
    (
        StatusCode::OK,
        Json(PingResponse {
            status: "ok".to_string(),
        }),
    )
}

/// Handler for GET /v1/info
#[tracing::instrument(skip(state))]
async fn info<C>(State(state): State<Arc<AppState<C>>>) -> impl IntoResponse {
    tracing::debug!("Handling /v1/info request");

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    (
        StatusCode::OK,
        Json(InfoResponse {
            version: state.version.to_string(),
            hostname,
        }),
    )
}

/// Handler for POST /v1/recommendations
///
/// The body is a snapshot; `?hour=` pins the evaluation hour, otherwise the
/// advisor's clock decides.
#[tracing::instrument(skip(state, body))]
async fn recommendations<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(query): Query<RecommendQuery>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let snapshot = Snapshot::from_value(body)?;
    let hour = match query.hour {
        Some(h) => Hour::new(h)?,
        None => state.advisor.hour(),
    };

    let recommendations = state.advisor.recommend_at(&snapshot, hour);
    tracing::debug!(
        "Evaluated snapshot at {}: {} recommendation(s)",
        hour,
        recommendations.len()
    );

    Ok(Json(RecommendResponse {
        hour,
        recommendations,
    }))
}

/// Handler for POST /v1/summary
#[tracing::instrument(skip(body))]
async fn summary(Json(body): Json<serde_json::Value>) -> Result<Json<Summary>, ApiError> {
    let snapshot = Snapshot::from_value(body)?;
    Ok(Json(Summary::from_snapshot(&snapshot)))
}

/// Create the API router with all endpoints
fn create_router<C>(state: Arc<AppState<C>>) -> Router
where
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/v1/ping", get(ping))
        .route("/v1/info", get(info::<C>))
        .route("/v1/recommendations", post(recommendations::<C>))
        .route("/v1/summary", post(summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the router serving `advisor`.
pub fn router<C>(advisor: Advisor<C>) -> Router
where
    C: Clock + Send + Sync + 'static,
{
    create_router(Arc::new(AppState {
        version: env!("CARGO_PKG_VERSION"),
        advisor,
    }))
}

/// Start the HTTP API server
///
/// Binds to `listen:port` and serves until `shutdown_rx` fires.
pub async fn serve<C>(
    advisor: Advisor<C>,
    listen: IpAddr,
    port: u16,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<()>
where
    C: Clock + Send + Sync + 'static,
{
    let app = router(advisor);

    let addr = SocketAddr::new(listen, port);
    tracing::info!("Starting HTTP API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("HTTP API server shutting down gracefully");
        })
        .await?;

    Ok(())
}
