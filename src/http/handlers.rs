//! Endpoint handlers.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::{MultisigCall, SubmitError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Latest block height.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockNumberResponse {
    pub block_number: u64,
}

/// Body of `POST /submit-transaction`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitTransactionRequest {
    /// Destination the multisig should call.
    #[schema(example = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8")]
    pub to: String,
    /// Value in wei, base-10.
    #[schema(example = "1000000000000000000")]
    pub value: String,
    /// Optional hex calldata.
    #[serde(default)]
    #[schema(example = "0x")]
    pub data: String,
}

/// A broadcast multisig submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTransactionResponse {
    /// Transaction hash, `0x` + 64 hex digits.
    pub tx_hash: String,
    /// Owner address that signed the transaction.
    pub signer: String,
    /// Nonce the transaction was sent with.
    pub nonce: u64,
}

/// Liveness.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "UP")]
    pub status: String,
}

/// GET /block-number
///
/// Latest block number of the connected chain.
#[utoipa::path(
    get,
    path = "/block-number",
    tag = "chain",
    responses(
        (status = 200, description = "Latest block number", body = BlockNumberResponse),
        (status = 500, description = "RPC endpoint unreachable or returned garbage", body = String)
    )
)]
pub async fn get_block_number(State(state): State<AppState>) -> Response {
    let start = Instant::now();

    let response = match state.chain.block_number().await {
        Ok(block_number) => (StatusCode::OK, Json(BlockNumberResponse { block_number })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching block number");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch block number").into_response()
        }
    };

    metrics::record_request("block_number", response.status().as_u16(), start);
    response
}

/// POST /submit-transaction
///
/// Queue `submitTransaction(to, value, data)` on the multisig, signed by the
/// gateway's owner key.
#[utoipa::path(
    post,
    path = "/submit-transaction",
    tag = "multisig",
    request_body = SubmitTransactionRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = SubmitTransactionResponse),
        (status = 400, description = "Malformed body or field", body = String),
        (status = 403, description = "Signer is not a multisig owner", body = String),
        (status = 500, description = "Chain interaction failed", body = String)
    )
)]
pub async fn submit_transaction(
    State(state): State<AppState>,
    payload: Result<Json<SubmitTransactionRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let response = submit(&state, payload).await;
    metrics::record_request("submit_transaction", response.status().as_u16(), start);
    response
}

async fn submit(
    state: &AppState,
    payload: Result<Json<SubmitTransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
        }
    };

    let call = match MultisigCall::parse(&request.to, &request.value, &request.data) {
        Ok(call) => call,
        Err(e) => return submit_error_response(e),
    };

    match state.submitter.submit(call).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(SubmitTransactionResponse {
                tx_hash: format!("{:#x}", receipt.tx_hash),
                signer: receipt.signer.to_string(),
                nonce: receipt.nonce,
            }),
        )
            .into_response(),
        Err(e) => submit_error_response(e),
    }
}

fn submit_error_response(error: SubmitError) -> Response {
    match error {
        SubmitError::Validation { .. } => {
            (StatusCode::BAD_REQUEST, format!("Invalid request: {error}")).into_response()
        }
        SubmitError::NotOwner(_) => {
            (StatusCode::FORBIDDEN, "Signer is not an owner of the multisig").into_response()
        }
        SubmitError::Step { .. } => {
            tracing::error!(error = %error, "Error submitting transaction");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to submit transaction").into_response()
        }
    }
}

/// GET /health
///
/// Always UP while the process serves requests; does not touch the chain.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Gateway is running", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
    })
}
