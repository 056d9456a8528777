use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hashledger_core::{
    constants::MINING_FAILED_MESSAGE, ChainSnapshot, LedgerService, MineReport, Submission,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::constants::{CHAIN_PATH, HEALTH_PATH, MINE_PATH, TX_PATH};

#[derive(Clone)]
struct AppState {
    service: Arc<LedgerService>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Deserialize)]
struct TxIn {
    sender: String,
    recipient: String,
    amount: u64,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Opaque mining error. The cause is logged, never sent to the client.
struct MiningFailed;

impl IntoResponse for MiningFailed {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: MINING_FAILED_MESSAGE,
            }),
        )
            .into_response()
    }
}

pub(crate) fn router(service: Arc<LedgerService>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(|| async { Json(Health { status: "ok" }) }))
        .route(TX_PATH, post(new_transaction))
        .route(MINE_PATH, get(mine))
        .route(CHAIN_PATH, get(chain))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn new_transaction(State(state): State<AppState>, Json(tx): Json<TxIn>) -> Json<Submission> {
    Json(
        state
            .service
            .submit_transaction(&tx.sender, &tx.recipient, tx.amount),
    )
}

async fn mine(State(state): State<AppState>) -> Result<Json<MineReport>, MiningFailed> {
    // proof-of-work is CPU bound
    let service = Arc::clone(&state.service);
    match tokio::task::spawn_blocking(move || service.mine()).await {
        Ok(Ok(report)) => Ok(Json(report)),
        Ok(Err(err)) => {
            error!(error = %err, "mine request failed");
            Err(MiningFailed)
        }
        Err(err) => {
            error!(error = %err, "mining task aborted");
            Err(MiningFailed)
        }
    }
}

async fn chain(State(state): State<AppState>) -> Json<ChainSnapshot> {
    Json(state.service.chain())
}
