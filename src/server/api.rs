use crate::error::RelayError;
use crate::models::chat::{ parse_messages, ChatReply };
use crate::relay::Relay;
use axum::{
    extract::{ rejection::JsonRejection, State },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use governor::{ clock::DefaultClock, state::{ InMemoryState, NotKeyed }, Quota, RateLimiter };
use log::{ info, warn };
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;

pub type ChatRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub limiter: Option<Arc<ChatRateLimiter>>,
}

impl AppState {
    pub fn new(relay: Arc<Relay>, rate_limit_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(rate_limit_per_minute).map(|n|
            Arc::new(RateLimiter::direct(Quota::per_minute(n)))
        );
        Self { relay, limiter }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    configured: bool,
    model: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>
) -> Response {
    let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();
    let started = Instant::now();

    match handle_chat(&state, &request_id, payload).await {
        Ok(reply) => {
            info!(
                "[{}] chat ok: {} chars in {} ms",
                request_id,
                reply.message.chars().count(),
                started.elapsed().as_millis()
            );
            Json(reply).into_response()
        }
        Err(err) => {
            warn!(
                "[{}] chat failed with {} in {} ms: {}",
                request_id,
                err.status().as_u16(),
                started.elapsed().as_millis(),
                err
            );
            err.into_response()
        }
    }
}

async fn handle_chat(
    state: &AppState,
    request_id: &str,
    payload: Result<Json<JsonValue>, JsonRejection>
) -> Result<ChatReply, RelayError> {
    let Json(body) = payload.map_err(|rejection|
        RelayError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    )?;
    let turns = parse_messages(&body)?;
    info!("[{}] chat request with {} turn(s)", request_id, turns.len());

    if let Some(limiter) = &state.limiter {
        if limiter.check().is_err() {
            return Err(RelayError::RateLimited);
        }
    }

    state.relay.relay(turns).await
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        configured: state.relay.is_configured(),
        model: state.relay.model(),
    })
}
