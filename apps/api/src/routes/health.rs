use axum::Json;

use super::MessageBody;

/// Liveness check. Does not touch the store.
pub async fn health() -> Json<MessageBody> {
    Json(MessageBody { message: "ok" })
}
