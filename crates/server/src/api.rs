//! # REST API
//!
//! Builds the axum router exposing the chain store. Each route maps to one
//! `ChainStore` operation.
//!
//! | Method | Path                          | Description                       |
//! |--------|-------------------------------|-----------------------------------|
//! | GET    | `/health`                     | Liveness probe                    |
//! | GET    | `/status`                     | Height and head hash              |
//! | POST   | `/challenges`                 | Issue a challenge for an identity |
//! | POST   | `/stars`                      | Submit a signed challenge + star  |
//! | GET    | `/blocks/height/:height`      | Block by height                   |
//! | GET    | `/blocks/hash/:hash`          | Block by hash                     |
//! | GET    | `/identities/:identity/stars` | Stars registered by an identity   |
//! | GET    | `/chain/validate`             | Full chain validation report      |

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use starchain_chain::ChainStore;
use starchain_core::{Block, Hash};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChainStore>,
}

impl AppState {
    pub fn new(store: ChainStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Builds the axum [`Router`] with all routes, CORS, and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/challenges", post(challenge_handler))
        .route("/stars", post(submit_star_handler))
        .route("/blocks/height/:height", get(block_by_height_handler))
        .route("/blocks/hash/:hash", get(block_by_hash_handler))
        .route("/identities/:identity/stars", get(stars_by_identity_handler))
        .route("/chain/validate", get(validate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub height: u64,
    pub head_hash: Option<Hash>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub identity: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitStarRequest {
    pub identity: String,
    pub challenge: String,
    pub signature: String,
    pub star: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        height: state.store.height(),
        head_hash: state.store.head().map(|block| block.hash),
    })
}

async fn challenge_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let Json(req) = payload?;
    if req.identity.is_empty() || req.identity.contains(':') {
        return Err(ApiError::BadRequest(
            "identity must be non-empty and must not contain ':'".into(),
        ));
    }
    Ok(Json(ChallengeResponse {
        challenge: state.store.request_challenge(&req.identity),
    }))
}

/// Signature verification and the exclusive append both block, so the whole
/// submission runs off the async executor.
async fn submit_star_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitStarRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let Json(req) = payload?;
    let store = Arc::clone(&state.store);
    let block = tokio::task::spawn_blocking(move || {
        store.submit_proof(&req.identity, &req.challenge, &req.signature, req.star)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("submission task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(block)))
}

async fn block_by_height_handler(
    Path(height): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<Block>, ApiError> {
    state
        .store
        .get_by_height(height)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no block at height {height}")))
}

async fn block_by_hash_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Block>, ApiError> {
    let parsed = Hash::from_hex(&hash)
        .map_err(|e| ApiError::BadRequest(format!("invalid block hash {hash:?}: {e}")))?;
    state
        .store
        .get_by_hash(&parsed)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no block with hash {parsed}")))
}

async fn stars_by_identity_handler(
    Path(identity): Path<String>,
    State(state): State<AppState>,
) -> Json<Vec<serde_json::Value>> {
    Json(state.store.get_payloads_by_identity(&identity))
}

async fn validate_handler(State(state): State<AppState>) -> Json<ValidationReport> {
    let errors: Vec<String> = state
        .store
        .validate()
        .iter()
        .map(ToString::to_string)
        .collect();
    Json(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
