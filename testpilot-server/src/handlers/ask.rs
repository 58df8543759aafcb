use std::sync::Arc;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::server::{Context, Json};

#[derive(Serialize, Deserialize, Debug)]
pub struct AskRequest {
    prompt: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AskResponse {
    reply: String,
}

/// Relay endpoint: forward the prompt upstream and return the first
/// completion choice. Stateless and reentrant; one outbound call per
/// invocation.
#[instrument(skip(context, payload))]
pub async fn ask(
    State(context): State<Arc<Context>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    tracing::debug!(prompt_chars = payload.prompt.len(), "relaying prompt");

    let reply = context.client.complete(&payload.prompt).await?;

    tracing::info!(reply_chars = reply.len(), "sending reply");

    Ok(Json(AskResponse { reply }))
}
