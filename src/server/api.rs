use crate::agent::PredictionAgent;
use crate::error::ChatError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use std::error::Error;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    http::HeaderValue,
    Json,
};
use serde_json::{ json, Value };
use tower_http::cors::{ AllowHeaders, AllowMethods, AllowOrigin, CorsLayer };
use log::{ info, warn, error };

#[derive(Clone)]
struct AppState {
    agent: Arc<PredictionAgent>,
}

/// Browsers may only call from the listed origins; any method or header, with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, Box<dyn Error + Send + Sync>> {
    let allowed = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| HeaderValue::from_str(o).map_err(|e| format!("Invalid CORS origin '{}': {}", o, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    )
}

pub fn router(
    agent: Arc<PredictionAgent>,
    cors_origins: &[String]
) -> Result<Router, Box<dyn Error + Send + Sync>> {
    Ok(
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/chat", post(chat_handler))
            .layer(cors_layer(cors_origins)?)
            .with_state(AppState { agent })
    )
}

pub async fn start_http_server(
    addr: &str,
    agent: Arc<PredictionAgent>,
    cors_origins: &[String]
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = router(agent, cors_origins)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
        e
    })?;
    info!("HTTP API server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn root_handler() -> Json<Value> {
    Json(
        json!({
        "message": "Crypto Prediction AI API",
        "status": "online",
        "endpoints": {
            "/chat": "POST - Chat with AI prediction agent",
            "/health": "GET - Health check"
        }
    })
    )
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Result<Json<ChatResponse>, ChatError> {
    let history = req.history.unwrap_or_default();
    match state.agent.chat(&req.message, &history).await {
        Ok(resp) => Ok(Json(resp)),
        Err(e) => {
            warn!("Chat request failed: {}", e);
            Err(e)
        }
    }
}
